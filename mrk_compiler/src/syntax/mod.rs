//! Declaration parsing
//!
//! Two passes per source over one token sequence:
//!
//! 1. [`match_scopes`] pairs every brace into the scope table.
//! 2. [`SourceParser`] walks top-level tokens, dispatching on leading
//!    keywords. Class and method handlers jump the cursor into their body
//!    and register the closing brace as a skip target, so nested
//!    declarations are reached by the same flat loop.

mod cursor;
mod error;
mod handlers;
mod parser;
mod scopes;

pub use cursor::Cursor;
pub use error::{ParseError, ParseErrorKind};
pub use parser::{parse_source, ParseOptions, SourceOutcome, SourceParser};
pub use scopes::{match_scopes, ScopeMatch};
