//! Keyword handlers for the declaration parser

use super::error::ParseErrorKind;
use super::parser::{ParserState, SourceParser};
use crate::grammar::Keyword;
use crate::lexical::is_identifier_char;
use crate::logging::codes;
use crate::log_debug;
use crate::symbols::CONSTRUCTOR_NAME;
use crate::tokens::{Token, TokenValue};

/// Error for a dotted path that stopped early
fn incomplete_path(path: &str) -> ParseErrorKind {
    if path.is_empty() {
        ParseErrorKind::ExpectedIdentifier
    } else {
        ParseErrorKind::ExpectedSemicolon
    }
}

/// Text of a token usable as a type or member name
fn declared_name(token: &Token) -> Option<String> {
    match &token.value {
        TokenValue::Identifier(name) => Some(name.clone()),
        TokenValue::Char(c) if is_identifier_char(*c) => Some(c.to_string()),
        _ => None,
    }
}

impl SourceParser<'_> {
    /// `i a.b.c;`
    ///
    /// Every failure is fatal: there is no safe place to resume inside a
    /// broken path.
    pub(super) fn handle_include(&mut self) {
        let mut path = String::new();

        loop {
            let Some(position) = self.cursor.advance() else {
                self.report(incomplete_path(&path), true);
                return;
            };

            match self.tokens[position].value.clone() {
                TokenValue::Identifier(segment) => path.push_str(&segment),
                TokenValue::Char('.') => {
                    if path.is_empty() || path.ends_with('.') {
                        self.report(ParseErrorKind::ExpectedIdentifier, true);
                        return;
                    }
                    path.push('.');
                }
                TokenValue::Char(';') => {
                    if path.is_empty() || path.ends_with('.') {
                        self.report(ParseErrorKind::ExpectedIdentifier, true);
                        return;
                    }
                    self.cursor.advance();
                    let message = format!("Included {}", path);
                    self.context.add_include(path);
                    self.record_declaration(codes::success::INCLUDE_REGISTERED, &message);
                    return;
                }
                _ => {
                    self.report(incomplete_path(&path), true);
                    return;
                }
            }
        }
    }

    /// `c Name { ... }`
    pub(super) fn handle_class(&mut self) {
        let Some(position) = self.expect_next(ParseErrorKind::ExpectedIdentifier) else {
            return;
        };
        let Some(name) = self.tokens[position].as_identifier().map(str::to_owned) else {
            self.report(ParseErrorKind::ExpectedIdentifier, false);
            return;
        };

        let Some(open) = self.expect_next(ParseErrorKind::ExpectedOpenBrace) else {
            return;
        };
        let Some(scope_index) = self.context.scope_opening_at(open) else {
            self.report(ParseErrorKind::ExpectedOpenBrace, false);
            return;
        };

        // Evaluated at the new class's own brace, whose scope is still unowned
        let parent_index = self.context.current_class(open);
        let class_index = self.context.add_class(name, parent_index, scope_index);
        self.enter_scope(scope_index);

        let message = format!(
            "Added class '{}' scope={}",
            self.context.qualified_class_name(class_index),
            scope_index
        );
        self.record_declaration(codes::success::CLASS_REGISTERED, &message);
    }

    /// `m type name { ... }` or the constructor form `m .{ ... }`
    pub(super) fn handle_method(&mut self) {
        let Some(position) = self.expect_next(ParseErrorKind::ExpectedTypenameOrIdentifier) else {
            return;
        };

        let (name, type_name) = if self.tokens[position].is_char('.') {
            (CONSTRUCTOR_NAME.to_string(), String::new())
        } else {
            let Some(type_name) = declared_name(&self.tokens[position]) else {
                self.report(ParseErrorKind::ExpectedTypename, false);
                return;
            };
            let Some(position) = self.expect_next(ParseErrorKind::ExpectedIdentifier) else {
                return;
            };
            let Some(name) = declared_name(&self.tokens[position]) else {
                self.report(ParseErrorKind::ExpectedIdentifier, false);
                return;
            };
            (name, type_name)
        };

        let Some(open) = self.expect_next(ParseErrorKind::ExpectedOpenBrace) else {
            return;
        };
        let Some(scope_index) = self.context.scope_opening_at(open) else {
            self.report(ParseErrorKind::ExpectedOpenBrace, false);
            return;
        };

        let Some(class_index) = self.context.current_class(open) else {
            self.report(ParseErrorKind::NoClassContext, true);
            return;
        };
        let Some(_) = self
            .context
            .add_method(class_index, name.as_str(), type_name, scope_index)
        else {
            self.report(ParseErrorKind::NoClassContext, true);
            return;
        };
        self.enter_scope(scope_index);

        let message = format!(
            "Added method '{}::{}' scope={}",
            self.context.qualified_class_name(class_index),
            name,
            scope_index
        );
        self.record_declaration(codes::success::METHOD_REGISTERED, &message);
    }

    /// `v ...;` and `r ...;` bodies are consumed without being parsed.
    ///
    /// Stops after `;`, or before a brace so scope structure is untouched.
    pub(super) fn handle_statement(&mut self, keyword: Keyword) {
        loop {
            let Some(position) = self.cursor.advance() else {
                self.state = ParserState::Exit;
                return;
            };

            let token = &self.tokens[position];
            if token.is_char(';') {
                self.cursor.advance();
                return;
            }
            if token.is_char('{') || token.is_char('}') {
                log_debug!("Statement ended at brace",
                    "keyword" => keyword,
                    "file" => self.source.filename.as_str()
                );
                return;
            }
        }
    }

    /// `__cpp { ... }`: record the block and resume at its closing brace
    pub(super) fn handle_language_block(&mut self, keyword: Keyword) {
        let Some(language) = keyword.host_language() else {
            return;
        };
        let Some(open) = self.expect_next(ParseErrorKind::ExpectedOpenBrace) else {
            return;
        };
        let Some(scope_index) = self.context.scope_opening_at(open) else {
            self.report(ParseErrorKind::ExpectedOpenBrace, false);
            return;
        };

        self.context.add_language_block(language, scope_index);
        if let Some(close) = self.context.scope(scope_index).map(|s| s.close) {
            self.cursor.jump_to(close);
        }

        log_debug!("Recorded verbatim block",
            "language" => language.as_str(),
            "scope" => scope_index,
            "file" => self.source.filename.as_str()
        );
    }
}
