//! Shared primitives used by the lexer and the declaration parser.

pub mod source;
pub mod span;

pub use source::Source;
pub use span::{Position, Span};
