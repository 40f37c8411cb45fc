//! Grammar tables for mrk

pub mod keywords;

pub use keywords::{is_reserved_keyword, HostLanguage, Keyword, KEYWORDS};
