//! Lexical analyzer wrapping the tokenizer with limits and metrics

use crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenValue};
use crate::utils::Source;
use crate::{log_debug, log_error};

use super::tokenizer::collect;

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Too many tokens: {count} (max {limit})")]
    TooManyTokens { count: usize, limit: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }
}

/// Per-source token statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub identifier_tokens: usize,
    pub number_tokens: usize,
    pub string_tokens: usize,
    pub char_tokens: usize,
    pub flagged_tokens: usize,
    pub max_string_length: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;

        match &token.value {
            TokenValue::Identifier(_) => self.identifier_tokens += 1,
            TokenValue::String(text) => {
                self.string_tokens += 1;
                self.max_string_length = self.max_string_length.max(text.len());
            }
            TokenValue::Char(_) => self.char_tokens += 1,
            TokenValue::None => {}
            _ => self.number_tokens += 1,
        }

        if token.has_error {
            self.flagged_tokens += 1;
        }
    }
}

/// Tokenizes sources under the configured token limit
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    token_limit: usize,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
            token_limit: MAX_TOKEN_COUNT,
        }
    }

    /// Override the compile-time token limit (only ever lowered)
    pub fn with_token_limit(mut self, limit: usize) -> Self {
        self.token_limit = limit.min(MAX_TOKEN_COUNT);
        self
    }

    /// Tokenize one source, resetting metrics first
    pub fn tokenize(&mut self, source: &Source) -> Result<Vec<Token>, LexerError> {
        self.metrics = LexicalMetrics::default();

        let tokens = collect(&source.text, self.preferences.include_spaces);

        if tokens.len() > self.token_limit {
            let error = LexerError::TooManyTokens {
                count: tokens.len(),
                limit: self.token_limit,
            };
            log_error!(error.error_code(), "Token limit exceeded",
                "file" => source.filename.as_str(),
                "count" => tokens.len(),
                "limit" => self.token_limit
            );
            return Err(error);
        }

        if self.preferences.collect_detailed_metrics {
            for token in &tokens {
                self.metrics.record_token(token);
            }
        } else {
            self.metrics.total_tokens = tokens.len();
        }

        log_debug!("Lexical analysis completed",
            "file" => source.filename.as_str(),
            "tokens" => self.metrics.total_tokens,
            "flagged" => self.metrics.flagged_tokens
        );

        Ok(tokens)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn detailed() -> LexicalPreferences {
        LexicalPreferences {
            include_spaces: false,
            collect_detailed_metrics: true,
        }
    }

    #[test]
    fn test_metrics_count_token_classes() {
        let mut analyzer = LexicalAnalyzer::with_preferences(detailed());
        let source = Source::new("a.mrk", "c A { \"str\" 1 2l 99999999999 }");

        let tokens = analyzer.tokenize(&source).unwrap();
        let metrics = analyzer.metrics();

        assert_eq!(metrics.total_tokens, tokens.len());
        assert_eq!(metrics.identifier_tokens, 2);
        assert_eq!(metrics.char_tokens, 2);
        assert_eq!(metrics.string_tokens, 1);
        assert_eq!(metrics.number_tokens, 3);
        assert_eq!(metrics.flagged_tokens, 1);
        assert_eq!(metrics.max_string_length, 3);
    }

    #[test]
    fn test_token_limit() {
        let mut analyzer = LexicalAnalyzer::with_preferences(detailed()).with_token_limit(3);
        let source = Source::new("big.mrk", "a b c d");

        let result = analyzer.tokenize(&source);
        assert_matches!(result, Err(LexerError::TooManyTokens { count: 4, limit: 3 }));
        assert_eq!(
            LexerError::TooManyTokens { count: 4, limit: 3 }.error_code(),
            codes::lexical::TOO_MANY_TOKENS
        );
    }

    #[test]
    fn test_include_spaces_preference() {
        let mut analyzer = LexicalAnalyzer::with_preferences(LexicalPreferences {
            include_spaces: true,
            collect_detailed_metrics: false,
        });
        let tokens = analyzer.tokenize(&Source::new("s.mrk", "a b")).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(analyzer.metrics().total_tokens, 3);
    }
}
