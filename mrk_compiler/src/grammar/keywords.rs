//! Leading keywords recognized by the declaration parser
//!
//! Keywords are matched by exact text against identifier tokens. The table
//! is a compile-time constant, so concurrent parsers share it freely.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Include,
    Class,
    Method,
    Var,
    Return,
    Cpp,
    CSharp,
    Java,
}

/// Keyword table in declaration order
pub const KEYWORDS: [Keyword; 8] = [
    Keyword::Include,
    Keyword::Class,
    Keyword::Method,
    Keyword::Var,
    Keyword::Return,
    Keyword::Cpp,
    Keyword::CSharp,
    Keyword::Java,
];

impl Keyword {
    /// Exact source spelling
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Include => "i",
            Self::Class => "c",
            Self::Method => "m",
            Self::Var => "v",
            Self::Return => "r",
            Self::Cpp => "__cpp",
            Self::CSharp => "__cs",
            Self::Java => "__java",
        }
    }

    /// Look up a keyword by exact, case-sensitive text
    pub fn lookup(s: &str) -> Option<Self> {
        KEYWORDS.iter().copied().find(|kw| kw.as_str() == s)
    }

    /// Host language of a verbatim block keyword
    pub fn host_language(self) -> Option<HostLanguage> {
        match self {
            Self::Cpp => Some(HostLanguage::Cpp),
            Self::CSharp => Some(HostLanguage::CSharp),
            Self::Java => Some(HostLanguage::Java),
            _ => None,
        }
    }

    /// Statements whose body is left unparsed
    pub fn is_statement(self) -> bool {
        matches!(self, Self::Var | Self::Return)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target language of a verbatim block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostLanguage {
    Cpp,
    CSharp,
    Java,
}

impl HostLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::CSharp => "cs",
            Self::Java => "java",
        }
    }
}

/// Check if a word is a reserved keyword
pub fn is_reserved_keyword(word: &str) -> bool {
    Keyword::lookup(word).is_some()
}
