//! Source buffers handed to the lexer and parser

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named unit of mrk source text.
///
/// Sources are immutable once built; the parser identifies them by
/// `filename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub filename: String,
    pub text: String,
}

impl Source {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.filename, self.text.len())
    }
}
