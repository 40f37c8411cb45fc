//! Character-level tokenizer state machine
//!
//! A single forward pass over the source characters. The machine has five
//! states; a character that ends a token without belonging to it is left
//! unconsumed and examined again from the `None` state.

use crate::tokens::{Token, TokenKind, TokenValue};
use crate::utils::{Position, Span};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    None,
    Word,
    Number,
    Symbol,
    String,
}

/// Width requested by a numeric literal's suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberSuffix {
    Int,
    UInt,
    Long,
    ULong,
}

/// Tokenize `text` into a flat token sequence.
///
/// Newlines, tabs and carriage returns always separate tokens and are never
/// emitted. Spaces behave the same unless `include_spaces` is set, in which
/// case each space becomes a single-character symbol token.
pub fn collect(text: &str, include_spaces: bool) -> Vec<Token> {
    Tokenizer::new(text, include_spaces).run()
}

/// Characters accepted after a backslash inside a string literal
pub fn is_valid_escape(ch: char) -> bool {
    matches!(ch, '\\' | '"' | 't' | 'n' | 'r' | 'b' | 'f')
}

/// Letters and underscore
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

struct Tokenizer {
    chars: Vec<(Position, char)>,
    end: Position,
    include_spaces: bool,
    state: LexState,
    buffer: String,
    start: Position,
    escaped: bool,
    string_error: bool,
    tokens: Vec<Token>,
}

impl Tokenizer {
    fn new(text: &str, include_spaces: bool) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut pos = Position::start();
        for ch in text.chars() {
            chars.push((pos, ch));
            pos = pos.advance(ch);
        }

        Self {
            chars,
            end: pos,
            include_spaces,
            state: LexState::None,
            buffer: String::new(),
            start: Position::start(),
            escaped: false,
            string_error: false,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        let mut index = 0;

        while index < self.chars.len() {
            let (pos, ch) = self.chars[index];

            if self.state != LexState::String && self.is_separator(ch) {
                self.flush(pos);
                index += 1;
                continue;
            }

            index += match self.state {
                LexState::None => self.step_none(pos, ch),
                LexState::Word => self.step_word(pos, ch),
                LexState::Number => self.step_number(index),
                LexState::Symbol => self.step_symbol(index),
                LexState::String => self.step_string(index),
            };
        }

        // Unterminated strings are dropped; words and numbers close as if
        // followed by whitespace.
        let end = self.end;
        self.flush(end);
        self.tokens
    }

    fn is_separator(&self, ch: char) -> bool {
        match ch {
            '\n' | '\t' | '\r' => true,
            ' ' => !self.include_spaces,
            _ => false,
        }
    }

    fn position_at(&self, index: usize) -> Position {
        self.chars
            .get(index)
            .map(|(pos, _)| *pos)
            .unwrap_or(self.end)
    }

    fn begin(&mut self, state: LexState, pos: Position) {
        self.state = state;
        self.start = pos;
        self.buffer.clear();
    }

    /// Close a pending word or number ending right before `end`
    fn flush(&mut self, end: Position) {
        match self.state {
            LexState::Word => self.emit_identifier(end),
            LexState::Number => self.emit_number(NumberSuffix::Int, end),
            LexState::String => return,
            LexState::None | LexState::Symbol => {}
        }
        self.state = LexState::None;
    }

    fn step_none(&mut self, pos: Position, ch: char) -> usize {
        if ch.is_ascii_digit() {
            self.begin(LexState::Number, pos);
            self.buffer.push(ch);
            1
        } else if ch.is_ascii_alphabetic() {
            self.begin(LexState::Word, pos);
            self.buffer.push(ch);
            1
        } else {
            self.begin(LexState::Symbol, pos);
            0
        }
    }

    fn step_word(&mut self, pos: Position, ch: char) -> usize {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            self.buffer.push(ch);
            return 1;
        }

        self.emit_identifier(pos);
        self.state = LexState::None;
        0
    }

    fn step_number(&mut self, index: usize) -> usize {
        let (pos, ch) = self.chars[index];

        if ch.is_ascii_digit() {
            self.buffer.push(ch);
            return 1;
        }

        let consumed = match ch {
            'u' | 'U' => {
                let long = matches!(self.chars.get(index + 1), Some((_, 'l' | 'L')));
                if long {
                    self.emit_number(NumberSuffix::ULong, self.position_at(index + 2));
                    2
                } else {
                    self.emit_number(NumberSuffix::UInt, self.position_at(index + 1));
                    1
                }
            }
            'l' | 'L' => {
                self.emit_number(NumberSuffix::Long, self.position_at(index + 1));
                1
            }
            _ => {
                self.emit_number(NumberSuffix::Int, pos);
                0
            }
        };

        self.state = LexState::None;
        consumed
    }

    fn step_symbol(&mut self, index: usize) -> usize {
        let (pos, ch) = self.chars[index];

        match ch {
            '"' => {
                self.begin(LexState::String, pos);
                self.escaped = false;
                self.string_error = false;
            }
            '_' => {
                self.begin(LexState::Word, pos);
                self.buffer.push(ch);
            }
            _ => {
                let span = Span::new(pos, self.position_at(index + 1));
                self.tokens
                    .push(Token::new(TokenKind::Symbol, TokenValue::Char(ch), span));
                self.state = LexState::None;
            }
        }
        1
    }

    fn step_string(&mut self, index: usize) -> usize {
        let ch = self.chars[index].1;

        if self.escaped {
            if is_valid_escape(ch) {
                self.buffer.push('\\');
                self.buffer.push(ch);
            } else {
                self.string_error = true;
            }
            self.escaped = false;
        } else if ch == '\\' {
            self.escaped = true;
        } else if ch == '"' {
            let span = Span::new(self.start, self.position_at(index + 1));
            let value = TokenValue::String(std::mem::take(&mut self.buffer));
            self.tokens.push(
                Token::new(TokenKind::Symbol, value, span).with_error(self.string_error),
            );
            self.state = LexState::None;
        } else {
            self.buffer.push(ch);
        }
        1
    }

    fn emit_identifier(&mut self, end: Position) {
        let value = TokenValue::Identifier(std::mem::take(&mut self.buffer));
        let span = Span::new(self.start, end);
        self.tokens.push(Token::new(TokenKind::Word, value, span));
    }

    fn emit_number(&mut self, suffix: NumberSuffix, end: Position) {
        let text = std::mem::take(&mut self.buffer);
        let (value, has_error) = match suffix {
            NumberSuffix::Int => convert(&text, TokenValue::Int),
            NumberSuffix::UInt => convert(&text, TokenValue::UInt),
            NumberSuffix::Long => convert(&text, TokenValue::Long),
            NumberSuffix::ULong => convert(&text, TokenValue::ULong),
        };
        let span = Span::new(self.start, end);
        self.tokens
            .push(Token::new(TokenKind::Number, value, span).with_error(has_error));
    }
}

/// Parse `text` at the requested width; out-of-range text yields a zero
/// value and the error flag.
fn convert<T>(text: &str, wrap: fn(T) -> TokenValue) -> (TokenValue, bool)
where
    T: FromStr + Default,
{
    match text.parse::<T>() {
        Ok(value) => (wrap(value), false),
        Err(_) => (wrap(T::default()), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::ContextualKind;

    fn values(text: &str) -> Vec<TokenValue> {
        collect(text, false).into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_collect_is_deterministic() {
        let text = "i mrk.math; c Int32 { m int Foo { } m .{ } } \"s\\n\" 42ul";
        assert_eq!(collect(text, false), collect(text, false));
        assert_eq!(collect(text, true), collect(text, true));
    }

    #[test]
    fn test_words_and_symbols() {
        assert_eq!(
            values("c Int32 {}"),
            vec![
                TokenValue::Identifier("c".into()),
                TokenValue::Identifier("Int32".into()),
                TokenValue::Char('{'),
                TokenValue::Char('}'),
            ]
        );
    }

    #[test]
    fn test_underscore_led_identifier() {
        let tokens = collect("__cpp _x a_b", false);
        let names: Vec<_> = tokens.iter().filter_map(|t| t.as_identifier()).collect();
        assert_eq!(names, vec!["__cpp", "_x", "a_b"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Word));
    }

    #[test]
    fn test_numeric_suffixes() {
        let tokens = collect("123 123u 123l 123ul 7UL 9U 5L", false);
        let kinds: Vec<_> = tokens.iter().map(|t| t.contextual_kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ContextualKind::Int,
                ContextualKind::UInt,
                ContextualKind::Long,
                ContextualKind::ULong,
                ContextualKind::ULong,
                ContextualKind::UInt,
                ContextualKind::Long,
            ]
        );
        assert_eq!(tokens[0].value, TokenValue::Int(123));
        assert_eq!(tokens[1].value, TokenValue::UInt(123));
        assert_eq!(tokens[2].value, TokenValue::Long(123));
        assert_eq!(tokens[3].value, TokenValue::ULong(123));
        assert!(tokens.iter().all(|t| !t.has_error && t.kind == TokenKind::Number));
    }

    #[test]
    fn test_numeric_overflow_sets_error_flag() {
        let tokens = collect("2147483647 2147483648 4294967296u 9223372036854775808l 18446744073709551615ul 18446744073709551616ul", false);
        assert_eq!(tokens.len(), 6);
        assert!(!tokens[0].has_error);
        assert!(tokens[1].has_error);
        assert_eq!(tokens[1].contextual_kind(), ContextualKind::Int);
        assert!(tokens[2].has_error);
        assert!(tokens[3].has_error);
        assert_eq!(tokens[4].value, TokenValue::ULong(u64::MAX));
        assert!(!tokens[4].has_error);
        assert!(tokens[5].has_error);
    }

    #[test]
    fn test_number_terminator_is_reprocessed() {
        assert_eq!(
            values("12;34{"),
            vec![
                TokenValue::Int(12),
                TokenValue::Char(';'),
                TokenValue::Int(34),
                TokenValue::Char('{'),
            ]
        );
        // A letter that is not a suffix starts a new word
        assert_eq!(
            values("12ab"),
            vec![TokenValue::Int(12), TokenValue::Identifier("ab".into())]
        );
        // Only one suffix is consumed
        assert_eq!(
            values("3lu"),
            vec![TokenValue::Long(3), TokenValue::Identifier("u".into())]
        );
    }

    #[test]
    fn test_escaped_quote_does_not_close_string() {
        let tokens = collect(r#""a\"b""#, false);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, TokenValue::String(r#"a\"b"#.into()));
        assert_eq!(tokens[0].contextual_kind(), ContextualKind::String);
        assert!(!tokens[0].has_error);
    }

    #[test]
    fn test_supported_escapes_kept_verbatim() {
        let tokens = collect(r#""\t\n\r\b\f\\""#, false);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, TokenValue::String(r#"\t\n\r\b\f\\"#.into()));
        assert!(!tokens[0].has_error);
    }

    #[test]
    fn test_unsupported_escape_sets_error_flag() {
        let tokens = collect(r#""a\xb" c"#, false);
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].has_error);
        assert_eq!(tokens[0].value, TokenValue::String("ab".into()));
        assert_eq!(tokens[1].value, TokenValue::Identifier("c".into()));
    }

    #[test]
    fn test_whitespace_inside_string_is_kept() {
        let tokens = collect("\"a b\tc\"", false);
        assert_eq!(tokens[0].value, TokenValue::String("a b\tc".into()));
    }

    #[test]
    fn test_end_of_input_flushes_word_and_number() {
        assert_eq!(values("abc"), vec![TokenValue::Identifier("abc".into())]);
        assert_eq!(values("99"), vec![TokenValue::Int(99)]);
    }

    #[test]
    fn test_unterminated_string_is_dropped() {
        assert_eq!(values("x \"never closed"), vec![TokenValue::Identifier("x".into())]);
        assert!(collect("\"abc\\", false).is_empty());
    }

    #[test]
    fn test_include_spaces() {
        assert_eq!(values("a b").len(), 2);
        assert_eq!(
            values_with_spaces("a b"),
            vec![
                TokenValue::Identifier("a".into()),
                TokenValue::Char(' '),
                TokenValue::Identifier("b".into()),
            ]
        );
        // Newlines and tabs are never tokens
        assert_eq!(values_with_spaces("a\n\tb").len(), 2);
    }

    fn values_with_spaces(text: &str) -> Vec<TokenValue> {
        collect(text, true).into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_token_spans() {
        let tokens = collect("c Foo\n  {", false);
        assert_eq!(tokens[1].span.start, Position::new(2, 1, 3));
        assert_eq!(tokens[1].span.end, Position::new(5, 1, 6));
        assert_eq!(tokens[2].span.start.line, 2);
        assert_eq!(tokens[2].span.start.column, 3);

        let number = &collect("10ul", false)[0];
        assert_eq!(number.span.len(), 4);
    }

    #[test]
    fn test_non_ascii_is_symbol() {
        let tokens = collect("é", false);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, TokenValue::Char('é'));
        assert_eq!(tokens[0].kind, TokenKind::Symbol);
    }

    #[test]
    fn test_identifier_char_predicate() {
        assert!(is_identifier_char('a'));
        assert!(is_identifier_char('_'));
        assert!(!is_identifier_char('1'));
        assert!(!is_identifier_char('.'));
    }
}
