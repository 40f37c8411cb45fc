//! Declaration parser driver
//!
//! Per source: tokenize, match scopes, reset the cursor, then walk tokens
//! dispatching on leading keywords until the tokens run out or a fatal
//! error occurs.

use super::cursor::Cursor;
use super::error::{ParseError, ParseErrorKind};
use super::scopes::match_scopes;
use crate::config::runtime::{LexicalPreferences, ParserPreferences};
use crate::grammar::Keyword;
use crate::lexical::{LexerError, LexicalAnalyzer};
use crate::logging::{self, codes, Code, LogEvent};
use crate::symbols::SourceParseContext;
use crate::tokens::Token;
use crate::utils::{Source, Span};
use crate::{log_debug, log_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParserState {
    Scanning,
    Exit,
}

/// Preferences consulted while parsing one source
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub lexical: LexicalPreferences,
    pub parser: ParserPreferences,
}

/// What parsing one source produced
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub context: SourceParseContext,
    pub errors: Vec<ParseError>,
    pub logs: Vec<LogEvent>,
    pub token_count: usize,
}

impl SourceOutcome {
    pub fn has_fatal_error(&self) -> bool {
        self.errors.iter().any(|e| e.fatal)
    }
}

/// Single-source declaration parser
pub struct SourceParser<'a> {
    pub(super) source: &'a Source,
    pub(super) options: &'a ParseOptions,
    pub(super) tokens: Vec<Token>,
    pub(super) cursor: Cursor,
    pub(super) state: ParserState,
    pub(super) context: SourceParseContext,
    pub(super) errors: Vec<ParseError>,
    pub(super) logs: Vec<LogEvent>,
}

impl<'a> SourceParser<'a> {
    /// `context` is the source's existing context, or a fresh one
    pub fn new(source: &'a Source, context: SourceParseContext, options: &'a ParseOptions) -> Self {
        Self {
            source,
            options,
            tokens: Vec::new(),
            cursor: Cursor::new(0),
            state: ParserState::Scanning,
            context,
            errors: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn run(mut self) -> SourceOutcome {
        log_debug!("Set source", "file" => self.source.filename.as_str());

        match self.tokenize() {
            Ok(tokens) => {
                self.tokens = tokens;
                self.report_flagged_tokens();
                self.assign_structural_scopes();
                self.drive();
            }
            Err(error) => {
                log_debug!("Skipping declarations", "reason" => error);
                self.report_at(ParseErrorKind::TokenLimitExceeded, None, true);
            }
        }

        SourceOutcome {
            token_count: self.tokens.len(),
            context: self.context,
            errors: self.errors,
            logs: self.logs,
        }
    }

    /// Whitespace always separates tokens here; `include_spaces` only
    /// affects direct token dumps.
    fn tokenize(&self) -> Result<Vec<Token>, LexerError> {
        let preferences = LexicalPreferences {
            include_spaces: false,
            ..self.options.lexical.clone()
        };
        LexicalAnalyzer::with_preferences(preferences).tokenize(self.source)
    }

    fn report_flagged_tokens(&mut self) {
        if !self.options.parser.warn_on_malformed_literals {
            return;
        }

        let flagged: Vec<(Span, String)> = self
            .tokens
            .iter()
            .filter(|t| t.has_error)
            .map(|t| (t.span, t.to_string()))
            .collect();

        for (span, text) in flagged {
            let event = LogEvent::warning_with_code(codes::lexical::MALFORMED_LITERAL, "Malformed literal")
                .with_span(span)
                .with_context("token", &text);
            self.record_event(event);
        }
    }

    /// Build the scope table, report unbalanced braces, and rewind
    fn assign_structural_scopes(&mut self) {
        let matched = match_scopes(&self.tokens);

        for &position in &matched.stray_closes {
            let span = self.tokens.get(position).map(|t| t.span);
            self.report_at(ParseErrorKind::ExpectedOpenBrace, span, false);
        }
        for &position in &matched.unclosed_opens {
            let span = self.tokens.get(position).map(|t| t.span);
            self.report_at(ParseErrorKind::ExpectedCloseBrace, span, false);
        }

        self.context.append_scopes(matched.scopes);
        self.cursor = Cursor::new(self.tokens.len());
        self.cursor.reset();
        self.cursor.enable_skipping();
    }

    fn drive(&mut self) {
        while self.state == ParserState::Scanning {
            self.step();
        }
    }

    fn step(&mut self) {
        let Some(position) = self.cursor.current() else {
            self.state = ParserState::Exit;
            return;
        };

        let keyword = match self.tokens[position].as_identifier() {
            Some(text) => Keyword::lookup(text),
            None => {
                if self.cursor.advance().is_none() {
                    self.state = ParserState::Exit;
                }
                return;
            }
        };

        match keyword {
            Some(Keyword::Include) => self.handle_include(),
            Some(Keyword::Class) => self.handle_class(),
            Some(Keyword::Method) => self.handle_method(),
            Some(keyword @ (Keyword::Var | Keyword::Return)) => self.handle_statement(keyword),
            Some(keyword @ (Keyword::Cpp | Keyword::CSharp | Keyword::Java)) => {
                self.handle_language_block(keyword)
            }
            None => self.report(ParseErrorKind::UnexpectedSymbol, true),
        }
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    /// Record an error at the token under the cursor
    pub(super) fn report(&mut self, kind: ParseErrorKind, fatal: bool) {
        let span = self
            .cursor
            .current()
            .and_then(|p| self.tokens.get(p))
            .map(|t| t.span);
        self.report_at(kind, span, fatal);
    }

    fn report_at(&mut self, kind: ParseErrorKind, span: Option<Span>, fatal: bool) {
        if self.options.parser.forward_events_to_logger {
            let location = span.map(|s| s.start.to_string()).unwrap_or_default();
            log_error!(kind.error_code(), kind.message(),
                "file" => self.source.filename.as_str(),
                "position" => location,
                "fatal" => fatal
            );
        }

        self.errors.push(
            ParseError::new(&self.source.filename, kind)
                .fatal(fatal)
                .with_span(span),
        );

        if fatal {
            self.state = ParserState::Exit;
        }
    }

    /// Append a registration event to the result log
    pub(super) fn record_declaration(&mut self, code: Code, message: &str) {
        self.record_event(LogEvent::success(code, message));
    }

    fn record_event(&mut self, event: LogEvent) {
        let event = event.with_context("file", &self.source.filename);
        if self.options.parser.forward_events_to_logger {
            logging::forward_event(&event);
        }
        self.logs.push(event);
    }

    /// Step forward; running out of tokens is a fatal `kind` error
    pub(super) fn expect_next(&mut self, kind: ParseErrorKind) -> Option<usize> {
        match self.cursor.advance() {
            Some(position) => Some(position),
            None => {
                self.report(kind, true);
                None
            }
        }
    }

    /// Move into a claimed scope's body and suppress its closing brace
    pub(super) fn enter_scope(&mut self, scope_index: usize) {
        if let Some(scope) = self.context.scope(scope_index) {
            let (open, close) = (scope.open, scope.close);
            self.cursor.jump_to(open + 1);
            self.cursor.register_skip_target(close);
        }
    }
}

/// Parse one source into `context`
pub fn parse_source(
    source: &Source,
    context: SourceParseContext,
    options: &ParseOptions,
) -> SourceOutcome {
    SourceParser::new(source, context, options).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::ScopeOwner;

    fn parse(text: &str) -> SourceOutcome {
        let source = Source::new("test.mrk", text);
        parse_source(&source, SourceParseContext::new("test.mrk"), &quiet())
    }

    fn quiet() -> ParseOptions {
        ParseOptions {
            lexical: LexicalPreferences::default(),
            parser: ParserPreferences {
                forward_events_to_logger: false,
                warn_on_malformed_literals: true,
            },
        }
    }

    fn messages(outcome: &SourceOutcome) -> Vec<&'static str> {
        outcome.errors.iter().map(|e| e.message()).collect()
    }

    #[test]
    fn test_spaces_always_separate_declarations() {
        let mut options = quiet();
        options.lexical.include_spaces = true;
        let source = Source::new("test.mrk", "i mrk; c A { m int f { } }");

        let outcome = parse_source(&source, SourceParseContext::new("test.mrk"), &options);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.context.includes, vec!["mrk"]);
        assert_eq!(outcome.context.classes.len(), 1);
        assert_eq!(outcome.context.method_count(), 1);
    }

    #[test]
    fn test_nested_classes() {
        let outcome = parse("c A { c B { } }");
        assert!(outcome.errors.is_empty());

        let classes = &outcome.context.classes;
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "A");
        assert_eq!(classes[0].parent_index, None);
        assert_eq!(classes[1].name, "B");
        assert_eq!(classes[1].parent_index, Some(classes[0].index));
    }

    #[test]
    fn test_include_path() {
        let outcome = parse("i mrk.math;");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.context.includes, vec!["mrk.math".to_string()]);
        assert_eq!(outcome.logs.len(), 1);
        assert_eq!(outcome.logs[0].message, "Included mrk.math");
    }

    #[test]
    fn test_include_double_dot() {
        let outcome = parse("i mrk..math;");
        assert!(outcome.context.includes.is_empty());
        assert_eq!(messages(&outcome), vec!["Expected identifier"]);
        assert!(outcome.errors[0].fatal);
    }

    #[test]
    fn test_include_errors() {
        assert_eq!(messages(&parse("i ;")), vec!["Expected identifier"]);
        assert_eq!(messages(&parse("i .mrk;")), vec!["Expected identifier"]);
        assert_eq!(messages(&parse("i mrk.;")), vec!["Expected identifier"]);
        assert_eq!(messages(&parse("i mrk")), vec!["Expected ';'"]);
        assert_eq!(messages(&parse("i")), vec!["Expected identifier"]);
        assert_eq!(messages(&parse("i mrk,")), vec!["Expected ';'"]);
        assert_eq!(messages(&parse("i 5;")), vec!["Expected identifier"]);
    }

    #[test]
    fn test_adjacent_include_segments_join() {
        let outcome = parse("i mrk math;");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.context.includes, vec!["mrkmath"]);
    }

    #[test]
    fn test_multiple_includes_keep_order() {
        let outcome = parse("i mrk; i mrk.math; i a.b.c;");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.context.includes, vec!["mrk", "mrk.math", "a.b.c"]);
    }

    #[test]
    fn test_methods_and_constructor() {
        let outcome = parse("c Int32 { m int Foo { } m .{ } }");
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

        let classes = &outcome.context.classes;
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Int32");

        let methods = &classes[0].methods;
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].name, "Foo");
        assert_eq!(methods[0].type_name, "int");
        assert_eq!(methods[1].name, "cx");
        assert_eq!(methods[1].type_name, "");
        assert!(methods[1].is_constructor());
    }

    #[test]
    fn test_method_without_class() {
        let outcome = parse("m int Foo { } c A { }");
        assert_eq!(messages(&outcome), vec!["No class context found"]);
        assert!(outcome.errors[0].fatal);
        assert!(outcome.context.classes.is_empty());
        assert_eq!(outcome.context.method_count(), 0);
    }

    #[test]
    fn test_sample_program() {
        let text = "i mrk; i mrk.math; c Int32 { c IntByteUnion { m int MRKConvertToInt { } m .{} m long DieLen { } c XyzIzter {  } } } c Int64 { } c Int128 { }";
        let outcome = parse(text);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

        let context = &outcome.context;
        assert_eq!(context.includes, vec!["mrk", "mrk.math"]);

        let names: Vec<_> = context.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Int32", "IntByteUnion", "XyzIzter", "Int64", "Int128"]
        );
        assert_eq!(context.classes[1].parent_index, Some(0));
        assert_eq!(context.classes[2].parent_index, Some(1));
        assert_eq!(context.classes[3].parent_index, None);
        assert_eq!(context.classes[4].parent_index, None);

        let methods: Vec<_> = context.classes[1]
            .methods
            .iter()
            .map(|m| (m.name.as_str(), m.type_name.as_str()))
            .collect();
        assert_eq!(
            methods,
            vec![("MRKConvertToInt", "int"), ("cx", ""), ("DieLen", "long")]
        );
        assert_eq!(context.qualified_class_name(2), "Int32::IntByteUnion::XyzIzter");

        // 2 includes + 5 classes + 3 methods
        assert_eq!(outcome.logs.len(), 10);
    }

    #[test]
    fn test_claimed_scope_owners() {
        let outcome = parse("c A { m int f { } }");
        let context = &outcome.context;
        let class_scope = context.classes[0].scope_index;
        let method_scope = context.classes[0].methods[0].scope_index;

        assert_eq!(context.scopes[class_scope].owner, ScopeOwner::Class(0));
        assert_eq!(context.scopes[method_scope].owner, ScopeOwner::Method(0, 0));
        assert_eq!(outcome.logs[0].message, "Added class 'A' scope=1");
        assert_eq!(outcome.logs[1].message, "Added method 'A::f' scope=0");
    }

    #[test]
    fn test_unknown_leading_identifier_is_fatal() {
        let outcome = parse("foo c A { }");
        assert_eq!(messages(&outcome), vec!["Unexpected symbol"]);
        assert!(outcome.errors[0].fatal);
        assert!(outcome.context.classes.is_empty());
    }

    #[test]
    fn test_unbalanced_braces_are_not_fatal() {
        let outcome = parse("} c A { }");
        assert_eq!(messages(&outcome), vec!["Expected '{'"]);
        assert!(!outcome.errors[0].fatal);
        assert_eq!(outcome.context.classes.len(), 1);

        let outcome = parse("c A { c B { }");
        assert_eq!(messages(&outcome), vec!["Expected '}'", "Expected '{'"]);
        assert_eq!(outcome.context.classes.len(), 1);
        assert_eq!(outcome.context.classes[0].name, "B");
    }

    #[test]
    fn test_class_errors() {
        let outcome = parse("c { }");
        assert_eq!(messages(&outcome), vec!["Expected identifier"]);
        assert!(!outcome.errors[0].fatal);

        let outcome = parse("c A x { }");
        assert_eq!(messages(&outcome), vec!["Expected '{'", "Unexpected symbol"]);

        let outcome = parse("c");
        assert_eq!(messages(&outcome), vec!["Expected identifier"]);
        assert!(outcome.errors[0].fatal);
    }

    #[test]
    fn test_method_errors() {
        let outcome = parse("c A { m 5 f { } }");
        assert_eq!(messages(&outcome)[0], "Expected typename");

        let outcome = parse("c A { m int 5 { } }");
        assert_eq!(messages(&outcome)[0], "Expected identifier");

        // The class body's closing brace is passed over, leaving nothing
        let outcome = parse("c A { m }");
        assert_eq!(messages(&outcome), vec!["Expected typename or identifier"]);
        assert!(outcome.errors[0].fatal);
    }

    #[test]
    fn test_statements_are_skipped() {
        let outcome = parse("c A { v int x = 5; m int f { r x; } }");
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert_eq!(outcome.context.classes[0].methods.len(), 1);
    }

    #[test]
    fn test_language_block_is_recorded_and_skipped() {
        let outcome = parse("c A { __cpp { int x = 5; foo(); } m int f { } }");
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

        let context = &outcome.context;
        assert_eq!(context.language_blocks.len(), 1);
        assert_eq!(
            context.language_blocks[0].language,
            crate::grammar::HostLanguage::Cpp
        );
        assert_eq!(context.classes[0].methods.len(), 1);
    }

    #[test]
    fn test_language_block_requires_brace() {
        let outcome = parse("__java x");
        assert_eq!(messages(&outcome), vec!["Expected '{'", "Unexpected symbol"]);
    }

    #[test]
    fn test_malformed_literal_warning() {
        let outcome = parse("c A { v x = 99999999999; }");
        assert!(outcome.errors.is_empty());
        let warnings: Vec<_> = outcome.logs.iter().filter(|e| e.is_warning()).collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "Malformed literal");
        assert_eq!(warnings[0].context.get("file").map(String::as_str), Some("test.mrk"));
    }

    #[test]
    fn test_error_spans_point_at_token() {
        let outcome = parse("c A {\n  foo\n}");
        let span = outcome.errors[0].span.unwrap();
        assert_eq!(span.start.line, 2);
        assert_eq!(span.start.column, 3);
    }

    #[test]
    fn test_empty_source() {
        let outcome = parse("");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.token_count, 0);
        assert!(outcome.context.is_structurally_validated());
    }
}
