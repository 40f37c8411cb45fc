//! Parse error records
//!
//! Messages are fixed strings; where the failure happened is carried
//! separately as the source name and an optional token span.

use crate::logging::{codes, Code};
use crate::utils::Span;
use serde::Serialize;

/// Failure kinds reported by the scope matcher and declaration parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("Expected identifier")]
    ExpectedIdentifier,

    #[error("Expected ';'")]
    ExpectedSemicolon,

    #[error("Unexpected symbol")]
    UnexpectedSymbol,

    #[error("Expected '{{'")]
    ExpectedOpenBrace,

    #[error("Expected '}}'")]
    ExpectedCloseBrace,

    #[error("Expected typename or identifier")]
    ExpectedTypenameOrIdentifier,

    #[error("Expected typename")]
    ExpectedTypename,

    #[error("No class context found")]
    NoClassContext,

    #[error("Token limit exceeded")]
    TokenLimitExceeded,
}

impl ParseErrorKind {
    /// The static message for this kind
    pub const fn message(self) -> &'static str {
        match self {
            Self::ExpectedIdentifier => "Expected identifier",
            Self::ExpectedSemicolon => "Expected ';'",
            Self::UnexpectedSymbol => "Unexpected symbol",
            Self::ExpectedOpenBrace => "Expected '{'",
            Self::ExpectedCloseBrace => "Expected '}'",
            Self::ExpectedTypenameOrIdentifier => "Expected typename or identifier",
            Self::ExpectedTypename => "Expected typename",
            Self::NoClassContext => "No class context found",
            Self::TokenLimitExceeded => "Token limit exceeded",
        }
    }

    pub fn error_code(self) -> Code {
        match self {
            Self::ExpectedIdentifier => codes::syntax::EXPECTED_IDENTIFIER,
            Self::ExpectedSemicolon => codes::syntax::EXPECTED_SEMICOLON,
            Self::UnexpectedSymbol => codes::syntax::UNEXPECTED_SYMBOL,
            Self::ExpectedOpenBrace => codes::syntax::EXPECTED_OPEN_BRACE,
            Self::ExpectedCloseBrace => codes::syntax::EXPECTED_CLOSE_BRACE,
            Self::ExpectedTypenameOrIdentifier => codes::syntax::EXPECTED_TYPENAME_OR_IDENTIFIER,
            Self::ExpectedTypename => codes::syntax::EXPECTED_TYPENAME,
            Self::NoClassContext => codes::syntax::NO_CLASS_CONTEXT,
            Self::TokenLimitExceeded => codes::lexical::TOO_MANY_TOKENS,
        }
    }
}

/// One recorded parse failure.
///
/// Fatal errors stop the declaration walk for their source; later sources
/// are still parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{source_name}: {kind}")]
pub struct ParseError {
    pub source_name: String,
    pub kind: ParseErrorKind,
    pub fatal: bool,
    pub span: Option<Span>,
}

impl ParseError {
    pub fn new(source_name: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            source_name: source_name.into(),
            kind,
            fatal: false,
            span: None,
        }
    }

    pub fn fatal(mut self, fatal: bool) -> Self {
        self.fatal = fatal;
        self
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    pub fn error_code(&self) -> Code {
        self.kind.error_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [ParseErrorKind; 9] = [
        ParseErrorKind::ExpectedIdentifier,
        ParseErrorKind::ExpectedSemicolon,
        ParseErrorKind::UnexpectedSymbol,
        ParseErrorKind::ExpectedOpenBrace,
        ParseErrorKind::ExpectedCloseBrace,
        ParseErrorKind::ExpectedTypenameOrIdentifier,
        ParseErrorKind::ExpectedTypename,
        ParseErrorKind::NoClassContext,
        ParseErrorKind::TokenLimitExceeded,
    ];

    #[test]
    fn test_display_matches_static_message() {
        for kind in ALL_KINDS {
            assert_eq!(kind.to_string(), kind.message());
        }
        assert_eq!(ParseErrorKind::ExpectedOpenBrace.message(), "Expected '{'");
        assert_eq!(ParseErrorKind::ExpectedCloseBrace.message(), "Expected '}'");
    }

    #[test]
    fn test_every_kind_has_registered_code() {
        for kind in ALL_KINDS {
            let code = kind.error_code();
            assert_ne!(codes::get_description(code.as_str()), "Unknown error");
        }
    }

    #[test]
    fn test_error_record() {
        let error = ParseError::new("a.mrk", ParseErrorKind::NoClassContext).fatal(true);
        assert!(error.fatal);
        assert_eq!(error.message(), "No class context found");
        assert_eq!(error.to_string(), "a.mrk: No class context found");
        assert_eq!(error.span, None);
    }
}
