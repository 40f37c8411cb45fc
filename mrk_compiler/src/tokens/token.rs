//! Token and literal value types
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse lexer classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Word,
    Number,
    Symbol,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Number => "number",
            Self::Symbol => "symbol",
        }
    }
}

/// Fine classification of a token, derived from its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextualKind {
    None,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    String,
    Identifier,
    Char,
}

impl ContextualKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::String => "string",
            Self::Identifier => "identifier",
            Self::Char => "char",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Short | Self::UShort | Self::Int | Self::UInt | Self::Long | Self::ULong
        )
    }
}

/// Literal payload of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenValue {
    None,
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Identifier(String),
    String(String),
    Char(char),
}

impl TokenValue {
    pub fn contextual_kind(&self) -> ContextualKind {
        match self {
            Self::None => ContextualKind::None,
            Self::Short(_) => ContextualKind::Short,
            Self::UShort(_) => ContextualKind::UShort,
            Self::Int(_) => ContextualKind::Int,
            Self::UInt(_) => ContextualKind::UInt,
            Self::Long(_) => ContextualKind::Long,
            Self::ULong(_) => ContextualKind::ULong,
            Self::Identifier(_) => ContextualKind::Identifier,
            Self::String(_) => ContextualKind::String,
            Self::Char(_) => ContextualKind::Char,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Short(v) => write!(f, "{}", v),
            Self::UShort(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::ULong(v) => write!(f, "{}", v),
            Self::Identifier(s) => write!(f, "{}", s),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Char(c) => write!(f, "{}", c),
        }
    }
}

/// A single lexeme with its literal value and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub has_error: bool,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, span: Span) -> Self {
        Self {
            kind,
            value,
            has_error: false,
            span,
        }
    }

    pub fn with_error(mut self, has_error: bool) -> Self {
        self.has_error = has_error;
        self
    }

    pub fn contextual_kind(&self) -> ContextualKind {
        self.value.contextual_kind()
    }

    /// Identifier text, if this token is an identifier
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Character payload, if this token is a single-character symbol
    pub fn as_char(&self) -> Option<char> {
        match self.value {
            TokenValue::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.value, TokenValue::Identifier(_))
    }

    /// True for the single-character symbol `c`
    pub fn is_char(&self, c: char) -> bool {
        self.as_char() == Some(c)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
