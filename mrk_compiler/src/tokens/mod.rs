//! Token model for mrk lexical analysis
//!
//! A token is produced once by the lexer and never mutated afterwards. Each
//! token records:
//!
//! - **kind**: the coarse lexer class (`Word`, `Number`, `Symbol`)
//! - **value**: a tagged literal value owning any text it carries
//! - **has_error**: set when the literal text could not be converted to the
//!   numeric width its suffix asked for, or a string held a bad escape
//! - **span**: where the lexeme sits in the source
//!
//! The contextual kind (`Int`, `ULong`, `Identifier`, ...) is derived from the
//! value rather than stored separately, so the two can never disagree.

pub mod token;

pub use token::{ContextualKind, Token, TokenKind, TokenValue};

pub use crate::utils::{Position, Span};
