// Internal modules
pub mod batch;
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod symbols;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use pipeline::{parse_sources, ParseResult, Parser, PipelineError};
pub use symbols::SourceParseContext;
pub use syntax::{ParseError, ParseErrorKind, ParseOptions};
pub use tokens::Token;
pub use utils::Source;
