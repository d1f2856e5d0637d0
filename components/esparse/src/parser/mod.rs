//! Recursive-descent parser producing an ESTree-shaped [`Program`].
//!
//! # Overview
//!
//! The parser keeps one token of lookahead. Every node is started at the
//! lookahead position and finished by [`Parser::finalize`], which stamps the
//! span and, when requested, `range` and `loc`. Grammar ambiguities are
//! handled the usual way for ECMAScript:
//!
//! - `/` is lexed as a punctuator and rescanned as a regular expression when a
//!   primary expression is expected.
//! - Destructuring patterns and arrow parameters are parsed as expressions
//!   and reinterpreted once `=` or `=>` is seen (cover grammar).
//! - JSX re-enters the scanner from the saved lookahead checkpoint.
//!
//! In tolerant mode errors are collected and each statement list resumes at
//! the next statement boundary.

mod expression;
mod function;
mod jsx;
mod module;
mod statement;

use crate::ast::{Comment, CommentKind, NodeMeta, Program, Statement};
use crate::delegate::{deliver_program, deliver_statement, Delegate};
use crate::error_handler::ErrorHandler;
use crate::messages;
use crate::options::{Options, SourceType};
use crate::scanner::{Checkpoint, ScannedComment, Scanner};
use crate::token::{RawToken, Token, TokenKind};
use core_types::{ParseError, SourcePosition, Span};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Result type used by every production.
pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Grammar context threaded through the productions.
#[derive(Debug, Clone, Default)]
pub(crate) struct Context {
    /// Parsing module code
    pub is_module: bool,
    /// Inside an async function: `await` is an operator
    pub is_async: bool,
    /// `in` is a binary operator here (false in a `for` head)
    pub allow_in: bool,
    /// A `"use strict"` directive is permitted (simple parameter list)
    pub allow_strict_directive: bool,
    /// `yield` may be used as an identifier (outside generators)
    pub allow_yield: bool,
    /// First `a = 1` shorthand seen in an object literal that must become a pattern
    pub first_cover_initialized_name_error: Option<RawToken>,
    /// The last expression can be assigned to
    pub is_assignment_target: bool,
    /// The last expression can be reinterpreted as a binding pattern
    pub is_binding_element: bool,
    /// Inside a function body: `return` is legal
    pub in_function_body: bool,
    /// Inside a loop: `continue` is legal
    pub in_iteration: bool,
    /// Inside a switch: `break` is legal
    pub in_switch: bool,
    /// Active labels; the value records whether the label targets a loop
    pub label_set: HashMap<String, bool>,
    /// Labels directly preceding the statement being parsed
    pub label_chain: Vec<String>,
    /// Strict mode code
    pub strict: bool,
}

/// Parser over one source text.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    options: Options,
    context: Context,
    lookahead: RawToken,
    /// Scanner state right before the lookahead token
    lookahead_state: Checkpoint,
    /// A line terminator separates the last consumed token from the lookahead
    has_line_terminator: bool,
    /// End of the last consumed token
    last_end: SourcePosition,
    /// `{` punctuators consumed and not yet closed
    open_braces: usize,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    /// Start offsets of parenthesized expressions
    grouped: HashSet<usize>,
    delegate: Option<&'a mut dyn Delegate>,
}

impl<'a> Parser<'a> {
    /// Create a parser for `source`.
    pub fn new(source: &'a str, options: Options) -> Self {
        let mut scanner = Scanner::new(source, ErrorHandler::new(options.tolerant));
        let is_module = options.source_type == SourceType::Module;
        scanner.set_track_comment(options.tracks_comments());
        scanner.set_module(is_module);

        let start = scanner.position();
        let lookahead_state = scanner.save_state();
        let context = Context {
            is_module,
            allow_in: true,
            allow_strict_directive: true,
            allow_yield: true,
            strict: is_module,
            ..Context::default()
        };

        Self {
            scanner,
            options,
            context,
            lookahead: RawToken::eof(start),
            lookahead_state,
            has_line_terminator: false,
            last_end: start,
            open_braces: 0,
            tokens: Vec::new(),
            comments: Vec::new(),
            grouped: HashSet::new(),
            delegate: None,
        }
    }

    /// Hand every node to `delegate` as it is finished, the [`Program`] last.
    pub fn with_delegate(mut self, delegate: &'a mut dyn Delegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Parse the whole source with the grammar selected by the options.
    ///
    /// `Program.comments` holds every comment when comments are tracked
    /// (capture or attachment); `Program.errors` is present in tolerant mode.
    pub fn parse_program(mut self) -> ParseResult<Program> {
        debug!(
            len = self.scanner.source().len(),
            source_type = self.options.source_type.as_str(),
            "parse start"
        );

        if let Err(error) = self.prime_lookahead() {
            self.recover_lexical_error(error)?;
        }
        let start = self.lookahead.start;

        let mut body = Vec::new();
        self.parse_directive_prologues(&mut body)?;
        while self.lookahead.kind != TokenKind::EOF {
            self.parse_recovering(&mut body, |parser| parser.parse_program_item())?;
        }

        let end = if body.is_empty() { start } else { self.last_end };
        let span = Span::new(start, end);
        let meta = self.meta_for(span);

        let tracks_comments = self.options.tracks_comments();
        let errors = self.scanner.error_handler.take_errors();
        debug!(statements = body.len(), errors = errors.len(), "parse finished");

        let mut program = Program {
            body,
            source_type: self.options.source_type,
            comments: tracks_comments.then_some(self.comments),
            tokens: self.options.tokens.then_some(self.tokens),
            errors: self.options.tolerant.then_some(errors),
            meta,
        };
        if let Some(delegate) = self.delegate {
            deliver_program(&mut program, delegate);
        }
        Ok(program)
    }

    /// Top-level item: import/export declarations are only accepted here.
    fn parse_program_item(&mut self) -> ParseResult<Statement> {
        let is_import_declaration = self.lookahead.is_keyword("import")
            && !self.match_import_call()
            && !self.match_import_meta();
        if self.lookahead.is_keyword("export") || is_import_declaration {
            if !self.context.is_module {
                let token = self.lookahead.clone();
                let message = if is_import_declaration {
                    messages::ILLEGAL_IMPORT_DECLARATION
                } else {
                    messages::ILLEGAL_EXPORT_DECLARATION
                };
                self.tolerate_unexpected_token(&token, Some(message))?;
            }
            let mut declaration = if is_import_declaration {
                self.parse_import_declaration()?
            } else {
                self.parse_export_declaration()?
            };
            self.deliver(&mut declaration);
            return Ok(declaration);
        }
        self.parse_statement_list_item()
    }

    /// In tolerant mode, record a failed lookahead scan and lex past it.
    fn recover_lexical_error(&mut self, error: ParseError) -> ParseResult<()> {
        if !self.scanner.error_handler.is_tolerant() {
            return Err(error);
        }
        self.scanner.error_handler.record(error);
        self.skip_lexical_error();
        Ok(())
    }

    /// Pass a finished statement to the delegate before it is linked.
    pub(crate) fn deliver(&mut self, statement: &mut Statement) {
        if let Some(delegate) = self.delegate.as_deref_mut() {
            deliver_statement(statement, delegate);
        }
    }

    // Tokens

    fn collect_comments(&mut self) -> ParseResult<()> {
        let scanned = self.scanner.scan_comments()?;
        if self.options.tracks_comments() {
            for comment in scanned {
                let comment = comment_record(comment, &self.options);
                self.comments.push(comment);
            }
        }
        Ok(())
    }

    fn record_token(&mut self, token: &RawToken) {
        if self.options.tokens && token.kind != TokenKind::EOF {
            let source = self.options.loc_source();
            self.tokens.push(Token::from_raw(
                token,
                self.scanner.source(),
                self.options.range,
                source,
            ));
        }
    }

    /// Lex a new lookahead from the current scanner position.
    fn prime_lookahead(&mut self) -> ParseResult<()> {
        self.collect_comments()?;
        self.lookahead_state = self.scanner.save_state();
        let next = self.scanner.lex()?;
        self.has_line_terminator = self.last_end.line != next.start.line;
        self.record_token(&next);
        self.lookahead = next;
        Ok(())
    }

    /// Consume the lookahead and return it.
    pub(crate) fn next_token(&mut self) -> ParseResult<RawToken> {
        let token = self.lookahead.clone();
        self.last_end = token.end;
        self.track_braces(&token);
        if let Err(error) = self.prime_lookahead() {
            self.recover_lexical_error(error)?;
        }
        Ok(token)
    }

    fn track_braces(&mut self, token: &RawToken) {
        if token.is_punctuator("{") {
            self.open_braces += 1;
        } else if token.is_punctuator("}") {
            self.open_braces = self.open_braces.saturating_sub(1);
        }
    }

    /// Rescan a `/` or `/=` lookahead as a regular expression literal.
    fn rescan_reg_exp(&mut self) -> ParseResult<()> {
        if self.options.tokens {
            self.tokens.pop();
        }
        self.scanner.restore_state(&self.lookahead_state);
        let token = self.scanner.scan_reg_exp()?;
        self.record_token(&token);
        self.lookahead = token;
        Ok(())
    }

    /// The token after the lookahead, without consuming anything.
    fn peek_next_token(&mut self) -> Option<RawToken> {
        let state = self.scanner.save_state();
        let next = self
            .scanner
            .scan_comments()
            .and_then(|_| self.scanner.lex())
            .ok();
        self.scanner.restore_state(&state);
        next
    }

    // Markers

    /// Start position of the next node.
    pub(crate) fn start_node(&self) -> SourcePosition {
        self.lookahead.start
    }

    fn meta_for(&self, span: Span) -> NodeMeta {
        NodeMeta {
            span,
            range: self.options.range.then(|| span.range()),
            loc: self.options.loc_source().map(|source| span.location(source)),
            ..NodeMeta::default()
        }
    }

    /// Metadata for a node spanning `start` to the end of the last consumed token.
    pub(crate) fn finalize(&self, start: SourcePosition) -> NodeMeta {
        self.meta_for(Span::new(start, self.last_end))
    }

    /// Source text of a token, when `raw` capture is on.
    fn raw_text(&self, token: &RawToken) -> Option<String> {
        self.options.raw.then(|| {
            self.scanner
                .source()
                .get(token.start.offset..token.end.offset)
                .unwrap_or_default()
                .to_string()
        })
    }

    /// Exact source text of a token.
    fn token_text(&self, token: &RawToken) -> &'a str {
        self.scanner
            .source()
            .get(token.start.offset..token.end.offset)
            .unwrap_or_default()
    }

    // Lookahead checks

    pub(crate) fn check_punctuator(&self, op: &str) -> bool {
        self.lookahead.is_punctuator(op)
    }

    pub(crate) fn check_keyword(&self, keyword: &str) -> bool {
        self.lookahead.is_keyword(keyword)
    }

    pub(crate) fn check_contextual(&self, name: &str) -> bool {
        self.lookahead.is_contextual(name) && !self.lookahead.escaped
    }

    fn check_assign(&self) -> bool {
        self.lookahead.kind == TokenKind::Punctuator
            && matches!(
                self.lookahead.value.as_str(),
                "=" | "*=" | "**=" | "/=" | "%=" | "+=" | "-=" | "<<=" | ">>=" | ">>>=" | "&="
                    | "^=" | "|="
            )
    }

    /// Consume the punctuator `op` or fail.
    pub(crate) fn expect_punctuator(&mut self, op: &str) -> ParseResult<()> {
        if !self.lookahead.is_punctuator(op) {
            return Err(self.unexpected_token_error(&self.lookahead, None));
        }
        self.next_token()?;
        Ok(())
    }

    /// Consume the keyword `keyword` or fail.
    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        if !self.lookahead.is_keyword(keyword) {
            return Err(self.unexpected_token_error(&self.lookahead, None));
        }
        self.next_token()?;
        Ok(())
    }

    /// Consume the punctuator `op` if it is next.
    pub(crate) fn consume_punctuator(&mut self, op: &str) -> ParseResult<bool> {
        if self.check_punctuator(op) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// `,` between list items, unless the list is about to close.
    fn expect_comma_unless(&mut self, closer: &str) -> ParseResult<()> {
        if !self.check_punctuator(closer) {
            self.expect_punctuator(",")?;
        }
        Ok(())
    }

    /// Automatic semicolon insertion.
    pub(crate) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.check_punctuator(";") {
            self.next_token()?;
            return Ok(());
        }
        if !self.has_line_terminator
            && self.lookahead.kind != TokenKind::EOF
            && !self.check_punctuator("}")
        {
            return Err(self.unexpected_token_error(&self.lookahead, None));
        }
        Ok(())
    }

    // Errors

    /// Syntax error at `pos`.
    fn error_at(&self, pos: SourcePosition, template: &str, args: &[&str]) -> ParseError {
        let description = messages::format(template, args);
        ErrorHandler::create_error(pos.offset, pos.line, pos.column, &description)
    }

    /// Syntax error at the end of the last consumed token.
    fn throw_error(&self, template: &str, args: &[&str]) -> ParseError {
        self.error_at(self.last_end, template, args)
    }

    /// Record a soft error at the end of the last consumed token.
    fn tolerate_error(&mut self, template: &str, args: &[&str]) -> ParseResult<()> {
        let error = self.throw_error(template, args);
        self.scanner.error_handler.tolerate(error)
    }

    /// Record a soft error at `pos`.
    fn tolerate_at(&mut self, pos: SourcePosition, template: &str, args: &[&str]) -> ParseResult<()> {
        let error = self.error_at(pos, template, args);
        self.scanner.error_handler.tolerate(error)
    }

    /// Error describing `token` as unexpected; `message` overrides the default.
    pub(crate) fn unexpected_token_error(&self, token: &RawToken, message: Option<&str>) -> ParseError {
        let template = message.unwrap_or(match token.kind {
            TokenKind::EOF => messages::UNEXPECTED_EOS,
            TokenKind::Identifier => {
                if self.context.strict && Scanner::is_strict_mode_reserved_word(&token.value) {
                    messages::STRICT_RESERVED_WORD
                } else {
                    messages::UNEXPECTED_IDENTIFIER
                }
            }
            TokenKind::NumericLiteral => messages::UNEXPECTED_NUMBER,
            TokenKind::StringLiteral => messages::UNEXPECTED_STRING,
            TokenKind::Template => messages::UNEXPECTED_TEMPLATE,
            TokenKind::Keyword if Scanner::is_future_reserved_word(&token.value) => {
                messages::UNEXPECTED_RESERVED
            }
            _ => messages::UNEXPECTED_TOKEN,
        });
        let value = match token.kind {
            TokenKind::Template | TokenKind::StringLiteral | TokenKind::NumericLiteral => {
                self.token_text(token)
            }
            _ => token.value.as_str(),
        };
        self.error_at(token.start, template, &[value])
    }

    fn tolerate_unexpected_token(&mut self, token: &RawToken, message: Option<&str>) -> ParseResult<()> {
        let error = self.unexpected_token_error(token, message);
        self.scanner.error_handler.tolerate(error)
    }

    // Cover grammar

    /// Parse with a fresh cover state; a pending shorthand initializer is an error.
    pub(crate) fn isolate_cover_grammar<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let previous_is_binding_element = self.context.is_binding_element;
        let previous_is_assignment_target = self.context.is_assignment_target;
        let previous_first_cover = self.context.first_cover_initialized_name_error.take();

        self.context.is_binding_element = true;
        self.context.is_assignment_target = true;

        let result = parse(self)?;
        if let Some(token) = self.context.first_cover_initialized_name_error.take() {
            return Err(self.unexpected_token_error(&token, None));
        }

        self.context.is_binding_element = previous_is_binding_element;
        self.context.is_assignment_target = previous_is_assignment_target;
        self.context.first_cover_initialized_name_error = previous_first_cover;
        Ok(result)
    }

    /// Parse with a fresh cover state and merge it into the enclosing one.
    pub(crate) fn inherit_cover_grammar<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let previous_is_binding_element = self.context.is_binding_element;
        let previous_is_assignment_target = self.context.is_assignment_target;
        let previous_first_cover = self.context.first_cover_initialized_name_error.take();

        self.context.is_binding_element = true;
        self.context.is_assignment_target = true;

        let result = parse(self)?;

        self.context.is_binding_element &= previous_is_binding_element;
        self.context.is_assignment_target &= previous_is_assignment_target;
        if previous_first_cover.is_some() {
            self.context.first_cover_initialized_name_error = previous_first_cover;
        }
        Ok(result)
    }

    // Recovery

    /// Run `production` and push its result onto `out`.
    ///
    /// In tolerant mode a failure is recorded, the context is restored and the
    /// token stream is skipped to the next statement boundary.
    pub(crate) fn parse_recovering<T>(
        &mut self,
        out: &mut Vec<T>,
        production: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<()> {
        let context = self.context.clone();
        let start = self.lookahead.start.offset;
        let braces = self.open_braces;
        match production(self) {
            Ok(item) => {
                out.push(item);
                Ok(())
            }
            Err(error) if self.scanner.error_handler.is_tolerant() => {
                debug!(
                    line = error.line_number,
                    column = error.column,
                    "recovering after error"
                );
                let lexical = error.is_lexical();
                let resume = start.max(error.index);
                self.scanner.error_handler.record(error);
                self.context = context;
                if lexical {
                    self.skip_lexical_error();
                }
                let unclosed = self.open_braces.saturating_sub(braces);
                self.synchronize(start, resume, unclosed);
                self.open_braces = braces;
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    /// Move past the character that failed to lex and find the next good token.
    fn skip_lexical_error(&mut self) {
        loop {
            self.scanner.skip_char();
            match self.prime_lookahead() {
                Ok(()) => return,
                Err(error) => trace!(index = error.index, "skipping unlexable input"),
            }
        }
    }

    /// Consume the lookahead without failing on lexical errors.
    fn advance_for_recovery(&mut self) {
        self.last_end = self.lookahead.end;
        let token = self.lookahead.clone();
        self.track_braces(&token);
        if self.prime_lookahead().is_err() {
            self.skip_lexical_error();
        }
    }

    /// Skip tokens until a statement boundary.
    ///
    /// `unclosed` counts the braces the failed statement opened before the
    /// error; they are skipped through before any boundary is accepted. A
    /// boundary is a `;` (consumed), a `}` closing the enclosing list, or a
    /// token past `resume` that starts a new line. At least one token is
    /// skipped when the statement at `start` made no progress.
    fn synchronize(&mut self, start: usize, resume: usize, mut unclosed: usize) {
        let mut depth = 0usize;
        loop {
            let token = &self.lookahead;
            if token.kind == TokenKind::EOF {
                break;
            }
            let outermost = depth == 0 && unclosed == 0;
            if outermost {
                if token.is_punctuator("}") {
                    break;
                }
                if self.has_line_terminator && token.start.offset > resume {
                    break;
                }
            }
            let semicolon = outermost && token.is_punctuator(";");
            if token.kind == TokenKind::Punctuator {
                match token.value.as_str() {
                    "(" | "[" | "{" => depth += 1,
                    "}" if depth == 0 => unclosed = unclosed.saturating_sub(1),
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            trace!(offset = token.start.offset, "resync skip");
            self.advance_for_recovery();
            if semicolon {
                break;
            }
        }
        if self.lookahead.start.offset == start && self.lookahead.kind != TokenKind::EOF {
            self.advance_for_recovery();
        }
    }
}

/// The public record of a scanned comment.
pub(crate) fn comment_record(comment: ScannedComment, options: &Options) -> Comment {
    let span = Span::new(comment.start, comment.end);
    Comment {
        kind: if comment.multi_line {
            CommentKind::Block
        } else {
            CommentKind::Line
        },
        value: comment.value,
        span,
        range: options.range.then(|| span.range()),
        loc: options.loc_source().map(|source| span.location(source)),
    }
}
