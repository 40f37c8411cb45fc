//! Parse runs over one or more sources
//!
//! Sources are parsed strictly in order. Each one is tokenized, scope
//! matched and walked to completion before the next begins, and its
//! outcome is folded into a single [`ParseResult`].

mod error;
mod result;

pub use error::PipelineError;
pub use result::ParseResult;

use crate::file_processor::{FileProcessingResult, FileProcessor};
use crate::logging::{self, codes};
use crate::syntax::{parse_source, ParseOptions, SourceOutcome};
use crate::utils::Source;
use crate::{log_info, log_success};
use std::path::PathBuf;

/// Sequential parser over a fixed list of sources
pub struct Parser {
    sources: Vec<Source>,
    options: ParseOptions,
}

impl Parser {
    pub fn new(sources: Vec<Source>) -> Self {
        Self {
            sources,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Parse every source into `result`.
    ///
    /// A source whose name is already in `result` continues from its
    /// existing context.
    pub fn start(&self, result: &mut ParseResult) {
        log_info!("Starting parse run", "sources" => self.sources.len());

        for (file_id, source) in self.sources.iter().enumerate() {
            let context = result.take_context(&source.filename);
            let outcome = parse_one(source, context, &self.options, file_id);
            result.absorb(outcome);
        }
    }
}

/// Parse one source with the thread's file context set to it
pub(crate) fn parse_one(
    source: &Source,
    context: crate::symbols::SourceParseContext,
    options: &ParseOptions,
    file_id: usize,
) -> SourceOutcome {
    logging::with_file_context(PathBuf::from(&source.filename), file_id, || {
        let outcome = parse_source(source, context, options);

        log_success!(codes::success::SOURCE_PARSED, "Source parsed",
            "file" => source.filename.as_str(),
            "tokens" => outcome.token_count,
            "classes" => outcome.context.classes.len(),
            "errors" => outcome.errors.len()
        );

        outcome
    })
}

/// Parse `sources` in order into a fresh result
pub fn parse_sources(sources: &[Source], options: &ParseOptions) -> ParseResult {
    let mut result = ParseResult::new();
    Parser::new(sources.to_vec())
        .with_options(options.clone())
        .start(&mut result);
    result
}

/// Load one `.mrk` file and parse it with default options
pub fn process_file(file_path: &str) -> Result<ParseResult, PipelineError> {
    process_file_with(file_path, &FileProcessor::new(), &ParseOptions::default())
}

pub fn process_file_with(
    file_path: &str,
    processor: &FileProcessor,
    options: &ParseOptions,
) -> Result<ParseResult, PipelineError> {
    let FileProcessingResult { source, .. } = processor.process_file(file_path)?;
    Ok(parse_sources(&[source], options))
}

/// Options that keep parser events out of the global logger
#[cfg(test)]
pub(crate) fn quiet_options() -> ParseOptions {
    ParseOptions {
        lexical: crate::config::runtime::LexicalPreferences::default(),
        parser: crate::config::runtime::ParserPreferences {
            forward_events_to_logger: false,
            warn_on_malformed_literals: true,
        },
    }
}
