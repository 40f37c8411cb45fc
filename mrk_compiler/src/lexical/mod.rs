//! Lexical analysis for mrk source text
//!
//! [`collect`] is the pure tokenizer. [`LexicalAnalyzer`] wraps it with the
//! compile-time token limit, runtime preferences and per-source metrics.

pub mod analyzer;
pub mod tokenizer;

use crate::config::runtime::LexicalPreferences;
use crate::tokens::Token;
use crate::utils::Source;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};
pub use tokenizer::{collect, is_identifier_char, is_valid_escape};

/// Tokenize a source with default preferences
pub fn tokenize_source(source: &Source) -> Result<Vec<Token>, LexerError> {
    LexicalAnalyzer::new().tokenize(source)
}

/// Tokenize a source with explicit preferences
pub fn tokenize_source_with_preferences(
    source: &Source,
    preferences: LexicalPreferences,
) -> Result<Vec<Token>, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(source)
}
