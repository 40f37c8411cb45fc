//! Brace matching pre-pass

use crate::symbols::StructuralScope;
use crate::tokens::Token;

/// Output of [`match_scopes`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeMatch {
    /// Matched pairs in closing order
    pub scopes: Vec<StructuralScope>,
    /// Positions of `}` with no pending `{`
    pub stray_closes: Vec<usize>,
    /// Positions of `{` never closed, left to right
    pub unclosed_opens: Vec<usize>,
}

impl ScopeMatch {
    pub fn is_balanced(&self) -> bool {
        self.stray_closes.is_empty() && self.unclosed_opens.is_empty()
    }
}

/// Pair every `{` with its `}` using a stack of pending opens.
///
/// Scope indices follow closing order, so an inner scope always has a lower
/// index than the scope enclosing it.
pub fn match_scopes(tokens: &[Token]) -> ScopeMatch {
    let mut result = ScopeMatch::default();
    let mut pending: Vec<usize> = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        if token.is_char('{') {
            pending.push(position);
        } else if token.is_char('}') {
            match pending.pop() {
                Some(open) => {
                    let index = result.scopes.len();
                    result
                        .scopes
                        .push(StructuralScope::new(index, open, position));
                }
                None => result.stray_closes.push(position),
            }
        }
    }

    result.unclosed_opens = pending;
    result
}
