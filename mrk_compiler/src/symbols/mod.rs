//! Declaration skeleton built by the parser
//!
//! One [`SourceParseContext`] per source holds its includes, its scope
//! table and the class/method/param tree. Nesting is recovered from token
//! positions and the scope table rather than from a live parse stack.

pub mod context;
pub mod scope;

pub use context::{
    LanguageBlock, ParseClass, ParseMethod, ParseParam, SourceParseContext, CONSTRUCTOR_NAME,
};
pub use scope::{ScopeOwner, StructuralScope};
