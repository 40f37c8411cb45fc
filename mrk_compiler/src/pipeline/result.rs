//! Accumulated outcome of a parse run

use crate::logging::collector::format_cargo_style;
use crate::logging::LogEvent;
use crate::symbols::SourceParseContext;
use crate::syntax::{ParseError, SourceOutcome};
use std::collections::BTreeMap;

/// Errors, registration logs and one context per distinct source name.
///
/// Contexts keep the order in which their sources were first parsed.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub errors: Vec<ParseError>,
    pub logs: Vec<LogEvent>,
    pub contexts: Vec<SourceParseContext>,
    pub token_count: usize,
}

impl ParseResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self, source_name: &str) -> Option<&SourceParseContext> {
        self.contexts.iter().find(|c| c.source_name == source_name)
    }

    /// Hand out the context for `source_name` to a parser, leaving a
    /// placeholder that [`Self::absorb`] fills back in
    pub fn take_context(&mut self, source_name: &str) -> SourceParseContext {
        match self.contexts.iter_mut().find(|c| c.source_name == source_name) {
            Some(slot) => std::mem::replace(slot, SourceParseContext::new(source_name)),
            None => SourceParseContext::new(source_name),
        }
    }

    /// Append one source's errors and logs and store its context
    pub fn absorb(&mut self, outcome: SourceOutcome) {
        self.errors.extend(outcome.errors);
        self.logs.extend(outcome.logs);
        self.token_count += outcome.token_count;

        let context = outcome.context;
        match self
            .contexts
            .iter_mut()
            .find(|c| c.source_name == context.source_name)
        {
            Some(slot) => *slot = context,
            None => self.contexts.push(context),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_fatal_errors(&self) -> bool {
        self.errors.iter().any(|e| e.fatal)
    }

    pub fn errors_for<'a>(&'a self, source_name: &'a str) -> impl Iterator<Item = &'a ParseError> {
        self.errors.iter().filter(move |e| e.source_name == source_name)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEvent> {
        self.logs.iter().filter(|e| e.is_warning())
    }

    pub fn class_count(&self) -> usize {
        self.contexts.iter().map(|c| c.classes.len()).sum()
    }

    pub fn method_count(&self) -> usize {
        self.contexts.iter().map(|c| c.method_count()).sum()
    }

    pub fn include_count(&self) -> usize {
        self.contexts.iter().map(|c| c.includes.len()).sum()
    }

    /// Cargo-style diagnostics per file, then totals and a skeleton count
    pub fn format_report(&self) -> String {
        let mut events_by_file: BTreeMap<String, Vec<LogEvent>> = BTreeMap::new();

        for error in &self.errors {
            let mut event = LogEvent::error(error.error_code(), error.message());
            if let Some(span) = error.span {
                event = event.with_span(span);
            }
            if error.fatal {
                event = event.with_context("note", "parsing of this source stopped here");
            }
            events_by_file
                .entry(error.source_name.clone())
                .or_default()
                .push(event);
        }

        for warning in self.warnings() {
            let file = warning.context.get("file").cloned().unwrap_or_default();
            events_by_file.entry(file).or_default().push(warning.clone());
        }

        let mut report = format_cargo_style(&events_by_file);
        report.push_str(&format!(
            "Parsed {} source(s): {} include(s), {} class(es), {} method(s)\n",
            self.contexts.len(),
            self.include_count(),
            self.class_count(),
            self.method_count()
        ));
        report
    }

    /// Contexts, errors and logs as one JSON document
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let errors: Vec<serde_json::Value> = self
            .errors
            .iter()
            .map(|e| {
                serde_json::json!({
                    "source": e.source_name,
                    "message": e.message(),
                    "code": e.error_code().as_str(),
                    "fatal": e.fatal,
                    "span": e.span,
                })
            })
            .collect();

        serde_json::to_string_pretty(&serde_json::json!({
            "contexts": self.contexts,
            "errors": errors,
            "logs": self.logs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{parse_sources, quiet_options};
    use crate::utils::Source;

    #[test]
    fn test_contexts_keyed_by_source() {
        let result = parse_sources(
            &[
                Source::new("a.mrk", "c A { }"),
                Source::new("b.mrk", "i mrk; c B { } c C { }"),
            ],
            &quiet_options(),
        );

        assert!(!result.has_errors());
        assert_eq!(result.contexts.len(), 2);
        assert_eq!(result.context("b.mrk").unwrap().classes.len(), 2);
        assert_eq!(result.class_count(), 3);
        assert_eq!(result.include_count(), 1);
        assert!(result.context("c.mrk").is_none());
    }

    #[test]
    fn test_report_lists_errors_with_positions() {
        let result = parse_sources(
            &[
                Source::new("good.mrk", "c A { }"),
                Source::new("bad.mrk", "c A {\n  oops\n}"),
            ],
            &quiet_options(),
        );

        let report = result.format_report();
        assert!(report.contains("Checking bad.mrk...\n"));
        assert!(report.contains("error[E042]: Unexpected symbol\n  --> bad.mrk:2:3\n"));
        assert!(report.contains("= note: parsing of this source stopped here"));
        assert!(!report.contains("Checking good.mrk"));
        assert!(report.contains("Total errors: 1\n"));
        assert!(report.ends_with("Parsed 2 source(s): 0 include(s), 2 class(es), 0 method(s)\n"));
    }

    #[test]
    fn test_report_includes_literal_warnings() {
        let result = parse_sources(
            &[Source::new("w.mrk", "c A { v x = 99999999999; }")],
            &quiet_options(),
        );

        assert!(!result.has_errors());
        let report = result.format_report();
        assert!(report.contains("warning[E021]: Malformed literal"));
        assert!(report.contains("Total warnings: 1\n"));
    }

    #[test]
    fn test_json_skeleton() {
        let result = parse_sources(
            &[Source::new("a.mrk", "i mrk.math; c A { m int f { } } x")],
            &quiet_options(),
        );

        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        let context = &json["contexts"][0];
        assert_eq!(context["source_name"], "a.mrk");
        assert_eq!(context["includes"][0], "mrk.math");
        assert_eq!(context["classes"][0]["methods"][0]["name"], "f");
        assert_eq!(json["errors"][0]["message"], "Unexpected symbol");
        assert_eq!(json["errors"][0]["fatal"], true);
        assert_eq!(json["logs"].as_array().unwrap().len(), 3);
    }
}
