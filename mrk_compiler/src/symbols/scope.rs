//! Brace-delimited scopes addressed by token position

use serde::{Deserialize, Serialize};

/// Declaration entity that claimed a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScopeOwner {
    #[default]
    None,
    Class(usize),
    /// Class index, method index within that class
    Method(usize, usize),
    /// Reserved for parameter lists; no handler claims it yet
    Param(usize, usize, usize),
}

impl ScopeOwner {
    pub fn is_owned(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Class(_) => "class",
            Self::Method(..) => "method",
            Self::Param(..) => "param",
        }
    }
}

/// A matched `{ ... }` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralScope {
    /// Position in the owning context's scope table (closing order)
    pub index: usize,
    /// Token position of `{` in the pass that produced this scope
    pub open: usize,
    /// Token position of the matching `}`
    pub close: usize,
    pub owner: ScopeOwner,
}

impl StructuralScope {
    pub fn new(index: usize, open: usize, close: usize) -> Self {
        debug_assert!(close >= open, "scope closes before it opens");
        Self {
            index,
            open,
            close,
            owner: ScopeOwner::None,
        }
    }

    /// Whether `position` has not yet passed this scope's closing brace
    pub fn is_open_at(&self, position: usize) -> bool {
        self.close >= position
    }

    /// Number of tokens strictly between the braces
    pub fn body_len(&self) -> usize {
        self.close - self.open - 1
    }
}
