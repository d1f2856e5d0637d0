//! Scanner: converts source text into tokens.
//!
//! The scanner works on byte offsets into the source `&str`. It never decides
//! on its own whether `/` starts a regular expression: [`Scanner::lex`] always
//! returns a punctuator for it and the caller asks for
//! [`Scanner::scan_reg_exp`] when the grammar allows a regex at that point.
//! Template literals are resumed after `${ expr }` through the curly stack.

use crate::character::{
    hex_value, is_decimal_digit, is_hex_digit, is_identifier_part, is_identifier_part_char,
    is_identifier_start, is_identifier_start_char, is_line_terminator, is_octal_digit,
    is_white_space,
};
use crate::error_handler::ErrorHandler;
use crate::messages;
use crate::token::{RawToken, TokenKind, TokenPayload};
use core_types::{ParseError, SourcePosition};
use num_bigint::BigInt;
use tracing::trace;

/// A comment found while skipping trivia.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedComment {
    /// `/* */` rather than `//`
    pub multi_line: bool,
    /// Text without the delimiters
    pub value: String,
    /// Position of the first delimiter byte
    pub start: SourcePosition,
    /// Position after the comment (before the line terminator for `//`)
    pub end: SourcePosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Curly {
    Brace,
    Template,
}

/// Saved scanner state for local backtracking.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    index: usize,
    line_number: u32,
    line_start: usize,
    curly_stack: Vec<Curly>,
}

/// Tokenizer over one source text.
pub struct Scanner<'a> {
    source: &'a str,
    /// Shared with the parser so soft scanner errors follow the tolerant policy
    pub error_handler: ErrorHandler,
    track_comment: bool,
    is_module: bool,
    index: usize,
    line_number: u32,
    line_start: usize,
    curly_stack: Vec<Curly>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `source`, past any hashbang line.
    pub fn new(source: &'a str, error_handler: ErrorHandler) -> Self {
        let mut scanner = Self {
            source,
            error_handler,
            track_comment: false,
            is_module: false,
            index: 0,
            line_number: 1,
            line_start: 0,
            curly_stack: Vec::new(),
        };
        scanner.skip_hashbang();
        scanner
    }

    /// Record comments found by [`Scanner::scan_comments`].
    pub fn set_track_comment(&mut self, track: bool) {
        self.track_comment = track;
    }

    /// Module code disables HTML-like comments.
    pub fn set_module(&mut self, is_module: bool) {
        self.is_module = is_module;
    }

    /// The full source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current byte offset.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True when every byte has been consumed.
    pub fn is_eof(&self) -> bool {
        self.index >= self.source.len()
    }

    /// Current position.
    pub fn position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line_number,
            column: (self.index - self.line_start) as u32,
            offset: self.index,
        }
    }

    /// Snapshot the state for a later [`Scanner::restore_state`].
    pub fn save_state(&self) -> Checkpoint {
        Checkpoint {
            index: self.index,
            line_number: self.line_number,
            line_start: self.line_start,
            curly_stack: self.curly_stack.clone(),
        }
    }

    /// Return to a snapshot.
    pub fn restore_state(&mut self, checkpoint: &Checkpoint) {
        trace!(from = self.index, to = checkpoint.index, "scanner restore");
        self.index = checkpoint.index;
        self.line_number = checkpoint.line_number;
        self.line_start = checkpoint.line_start;
        self.curly_stack.clone_from(&checkpoint.curly_stack);
    }

    /// Move back to `pos`, a position previously reported by this scanner.
    pub fn reset_to(&mut self, pos: SourcePosition) {
        self.index = pos.offset;
        self.line_number = pos.line;
        self.line_start = pos.offset - pos.column as usize;
    }

    /// Skip one character; used to get past an illegal character.
    pub fn skip_char(&mut self) {
        if let Some(ch) = self.peek() {
            self.index += ch.len_utf8();
            if is_line_terminator(ch) {
                if ch == '\r' && self.peek() == Some('\n') {
                    self.index += 1;
                }
                self.line_number += 1;
                self.line_start = self.index;
            }
        }
    }

    // Character access

    fn peek(&self) -> Option<char> {
        self.source.get(self.index..).and_then(|rest| rest.chars().next())
    }

    fn byte_at(&self, index: usize) -> Option<u8> {
        self.source.as_bytes().get(index).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.index += ch.len_utf8();
        Some(ch)
    }

    /// Consume a line terminator already peeked as `ch`, folding CRLF.
    fn consume_line_terminator(&mut self, ch: char) {
        self.index += ch.len_utf8();
        if ch == '\r' && self.byte_at(self.index) == Some(b'\n') {
            self.index += 1;
        }
        self.line_number += 1;
        self.line_start = self.index;
    }

    // Errors

    /// Lexical error at `pos`.
    pub fn error_at(&self, pos: SourcePosition, description: &str) -> ParseError {
        ErrorHandler::create_lexical_error(pos.offset, pos.line, pos.column, description)
    }

    fn unexpected(&self, description: &str) -> ParseError {
        self.error_at(self.position(), description)
    }

    fn illegal(&self) -> ParseError {
        self.unexpected(messages::UNEXPECTED_TOKEN_ILLEGAL)
    }

    fn tolerate_at(&mut self, pos: SourcePosition, description: &str) -> Result<(), ParseError> {
        let error = self.error_at(pos, description);
        self.error_handler.tolerate(error)
    }

    // Comments

    fn skip_hashbang(&mut self) {
        if self.source.starts_with("#!") {
            while let Some(ch) = self.peek() {
                if is_line_terminator(ch) {
                    break;
                }
                self.index += ch.len_utf8();
            }
        }
    }

    fn skip_single_line_comment(&mut self, offset: usize) -> Option<ScannedComment> {
        let start = SourcePosition {
            line: self.line_number,
            column: (self.index - offset - self.line_start) as u32,
            offset: self.index - offset,
        };
        let value_start = self.index;
        while let Some(ch) = self.peek() {
            if is_line_terminator(ch) {
                let comment = self.make_comment(false, value_start, self.index, start);
                self.consume_line_terminator(ch);
                return comment;
            }
            self.index += ch.len_utf8();
        }
        self.make_comment(false, value_start, self.index, start)
    }

    fn skip_multi_line_comment(&mut self) -> Result<Option<ScannedComment>, ParseError> {
        let start = SourcePosition {
            line: self.line_number,
            column: (self.index - 2 - self.line_start) as u32,
            offset: self.index - 2,
        };
        let value_start = self.index;
        while let Some(ch) = self.peek() {
            if is_line_terminator(ch) {
                self.consume_line_terminator(ch);
            } else if ch == '*' && self.byte_at(self.index + 1) == Some(b'/') {
                let value_end = self.index;
                self.index += 2;
                return Ok(self.make_comment(true, value_start, value_end, start));
            } else {
                self.index += ch.len_utf8();
            }
        }
        Err(self.illegal())
    }

    fn make_comment(
        &self,
        multi_line: bool,
        value_start: usize,
        value_end: usize,
        start: SourcePosition,
    ) -> Option<ScannedComment> {
        if !self.track_comment {
            return None;
        }
        Some(ScannedComment {
            multi_line,
            value: self.source[value_start..value_end].to_string(),
            start,
            end: self.position(),
        })
    }

    /// Skip whitespace, line terminators and comments.
    ///
    /// Returns the comments passed over when comment tracking is on.
    pub fn scan_comments(&mut self) -> Result<Vec<ScannedComment>, ParseError> {
        let mut comments = Vec::new();
        let mut at_line_start = self.index == 0;
        while let Some(ch) = self.peek() {
            if is_white_space(ch) {
                self.index += ch.len_utf8();
            } else if is_line_terminator(ch) {
                self.consume_line_terminator(ch);
                at_line_start = true;
            } else if ch == '/' {
                match self.byte_at(self.index + 1) {
                    Some(b'/') => {
                        self.index += 2;
                        comments.extend(self.skip_single_line_comment(2));
                        at_line_start = true;
                    }
                    Some(b'*') => {
                        self.index += 2;
                        comments.extend(self.skip_multi_line_comment()?);
                    }
                    _ => break,
                }
            } else if ch == '-' && at_line_start && !self.is_module {
                if self.source[self.index..].starts_with("-->") {
                    self.index += 3;
                    comments.extend(self.skip_single_line_comment(3));
                    at_line_start = true;
                } else {
                    break;
                }
            } else if ch == '<' && !self.is_module && self.source[self.index..].starts_with("<!--")
            {
                self.index += 4;
                comments.extend(self.skip_single_line_comment(4));
                at_line_start = true;
            } else {
                break;
            }
        }
        Ok(comments)
    }

    // Reserved words

    /// Words reserved in every context.
    pub fn is_keyword(id: &str) -> bool {
        matches!(
            id,
            "if" | "in"
                | "do"
                | "var"
                | "for"
                | "new"
                | "try"
                | "this"
                | "else"
                | "case"
                | "void"
                | "with"
                | "enum"
                | "while"
                | "break"
                | "catch"
                | "throw"
                | "const"
                | "class"
                | "super"
                | "return"
                | "typeof"
                | "delete"
                | "switch"
                | "export"
                | "import"
                | "default"
                | "finally"
                | "extends"
                | "function"
                | "continue"
                | "debugger"
                | "instanceof"
        )
    }

    /// Words reserved for future use in every context.
    pub fn is_future_reserved_word(id: &str) -> bool {
        id == "enum"
    }

    /// Words reserved in strict mode code only.
    pub fn is_strict_mode_reserved_word(id: &str) -> bool {
        matches!(
            id,
            "implements"
                | "interface"
                | "package"
                | "private"
                | "protected"
                | "public"
                | "static"
                | "yield"
                | "let"
        )
    }

    /// Names that strict mode code may not bind.
    pub fn is_restricted_word(id: &str) -> bool {
        id == "eval" || id == "arguments"
    }

    // Escapes

    /// Read `count` hex digits; `None` leaves the index where it was.
    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let start = self.index;
        let mut code = 0u32;
        for _ in 0..count {
            match self.peek() {
                Some(ch) if is_hex_digit(ch) => {
                    code = code * 16 + hex_value(ch);
                    self.index += 1;
                }
                _ => {
                    self.index = start;
                    return None;
                }
            }
        }
        Some(code)
    }

    /// Body of a `\u{...}` escape, with the index just after `{`.
    fn scan_unicode_code_point_escape(&mut self) -> Result<char, ParseError> {
        let mut code: u32 = 0;
        let mut digits = 0;
        loop {
            match self.peek() {
                Some('}') if digits > 0 => {
                    self.index += 1;
                    break;
                }
                Some(ch) if is_hex_digit(ch) => {
                    code = code.saturating_mul(16).saturating_add(hex_value(ch));
                    if code > 0x10FFFF {
                        return Err(self.illegal());
                    }
                    digits += 1;
                    self.index += 1;
                }
                _ => return Err(self.illegal()),
            }
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Body of a `\uXXXX` escape, with the index just after `u`. A high
    /// surrogate followed by `\u` and a low surrogate decodes as one
    /// character; any other surrogate becomes U+FFFD.
    fn scan_unicode_escape(&mut self) -> Option<char> {
        let high = self.scan_hex_digits(4)?;
        if (0xD800..0xDC00).contains(&high) && self.source[self.index..].starts_with("\\u") {
            let save = self.index;
            self.index += 2;
            match self.scan_hex_digits(4) {
                Some(low) if (0xDC00..0xE000).contains(&low) => {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(code);
                }
                _ => self.index = save,
            }
        }
        Some(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Value of an octal escape starting with `first`, and whether it counts
    /// as a legacy octal escape (`\0` alone does not).
    fn octal_to_decimal(&mut self, first: char) -> (u32, bool) {
        let mut octal = first != '0';
        let mut code = first.to_digit(8).unwrap_or(0);
        if let Some(ch) = self.peek().filter(|c| is_octal_digit(*c)) {
            octal = true;
            code = code * 8 + ch.to_digit(8).unwrap_or(0);
            self.index += 1;
            if ('0'..='3').contains(&first) {
                if let Some(ch) = self.peek().filter(|c| is_octal_digit(*c)) {
                    code = code * 8 + ch.to_digit(8).unwrap_or(0);
                    self.index += 1;
                }
            }
        }
        (code, octal)
    }

    // Identifiers

    fn get_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.index;
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.index = start;
                return self.get_complex_identifier();
            }
            if !is_identifier_part(ch) {
                break;
            }
            self.index += ch.len_utf8();
        }
        Ok(self.source[start..self.index].to_string())
    }

    fn get_complex_identifier(&mut self) -> Result<String, ParseError> {
        let mut id = String::new();
        while let Some(ch) = self.peek() {
            let first = id.is_empty();
            if ch == '\\' {
                self.index += 1;
                if self.peek() != Some('u') {
                    return Err(self.illegal());
                }
                self.index += 1;
                let decoded = if self.peek() == Some('{') {
                    self.index += 1;
                    self.scan_unicode_code_point_escape()?
                } else {
                    self.scan_unicode_escape().ok_or_else(|| self.illegal())?
                };
                let valid = if first {
                    is_identifier_start_char(decoded)
                } else {
                    is_identifier_part_char(decoded)
                };
                if !valid {
                    return Err(self.illegal());
                }
                id.push(decoded);
            } else if (first && is_identifier_start_char(ch)) || (!first && is_identifier_part_char(ch))
            {
                self.index += ch.len_utf8();
                id.push(ch);
            } else {
                break;
            }
        }
        Ok(id)
    }

    fn scan_identifier(&mut self) -> Result<RawToken, ParseError> {
        let start = self.position();
        let id = if self.peek() == Some('\\') {
            self.get_complex_identifier()?
        } else {
            self.get_identifier()?
        };
        let escaped = self.index - start.offset != id.len();

        let kind = if id.chars().count() == 1 {
            TokenKind::Identifier
        } else if Self::is_keyword(&id) {
            TokenKind::Keyword
        } else if id == "null" {
            TokenKind::NullLiteral
        } else if id == "true" || id == "false" {
            TokenKind::BooleanLiteral
        } else {
            TokenKind::Identifier
        };

        if kind != TokenKind::Identifier && escaped {
            self.tolerate_at(start, messages::INVALID_ESCAPED_RESERVED_WORD)?;
        }

        let mut token = self.token(kind, id, TokenPayload::None, start);
        token.escaped = escaped;
        Ok(token)
    }

    fn token(
        &self,
        kind: TokenKind,
        value: String,
        payload: TokenPayload,
        start: SourcePosition,
    ) -> RawToken {
        RawToken {
            kind,
            escaped: false,
            value,
            payload,
            octal: false,
            start,
            end: self.position(),
        }
    }

    // Punctuators

    fn scan_punctuator(&mut self) -> Result<RawToken, ParseError> {
        let start = self.position();
        let rest = &self.source[self.index..];
        let Some(first) = rest.chars().next() else {
            return Err(self.illegal());
        };

        let len = match first {
            '(' | ')' | ';' | ',' | '[' | ']' | ':' | '~' | '@' => 1,
            '{' => {
                self.curly_stack.push(Curly::Brace);
                1
            }
            '}' => {
                self.curly_stack.pop();
                1
            }
            '.' => {
                if rest.starts_with("...") {
                    3
                } else {
                    1
                }
            }
            '?' => {
                let third = rest.as_bytes().get(2).copied();
                if rest.starts_with("??") {
                    2
                } else if rest.starts_with("?.") && !third.is_some_and(|b| b.is_ascii_digit()) {
                    2
                } else {
                    1
                }
            }
            _ => {
                const FOUR: [&str; 1] = [">>>="];
                const THREE: [&str; 6] = ["===", "!==", ">>>", "<<=", ">>=", "**="];
                const TWO: [&str; 20] = [
                    "&&", "||", "==", "!=", "+=", "-=", "*=", "/=", "++", "--", "<<", ">>", "&=",
                    "|=", "^=", "%=", "<=", ">=", "=>", "**",
                ];
                if FOUR.iter().any(|p| rest.starts_with(p)) {
                    4
                } else if THREE.iter().any(|p| rest.starts_with(p)) {
                    3
                } else if TWO.iter().any(|p| rest.starts_with(p)) {
                    2
                } else if "<>=!+-*%&|^/".contains(first) {
                    1
                } else {
                    0
                }
            }
        };

        if len == 0 {
            return Err(self.illegal());
        }
        self.index += len;
        let value = self.source[start.offset..self.index].to_string();
        Ok(self.token(TokenKind::Punctuator, value, TokenPayload::None, start))
    }

    // Numeric literals

    fn numeric_token(
        &mut self,
        start: SourcePosition,
        value: f64,
        bigint: Option<BigInt>,
        octal: bool,
    ) -> Result<RawToken, ParseError> {
        if self.peek().is_some_and(is_identifier_start) {
            return Err(self.illegal());
        }
        let text = self.source[start.offset..self.index].to_string();
        let payload = match bigint {
            Some(big) => TokenPayload::BigInt(big),
            None => TokenPayload::Number(value),
        };
        let mut token = self.token(TokenKind::NumericLiteral, text, payload, start);
        token.octal = octal;
        Ok(token)
    }

    /// Digits in `radix` starting at the index; returns the digit text.
    fn scan_digits(&mut self, radix: u32) -> &'a str {
        let start = self.index;
        while self.peek().is_some_and(|ch| ch.is_digit(radix)) {
            self.index += 1;
        }
        &self.source[start..self.index]
    }

    fn scan_radix_literal(&mut self, start: SourcePosition, radix: u32) -> Result<RawToken, ParseError> {
        let digits = self.scan_digits(radix);
        if digits.is_empty() {
            return Err(self.illegal());
        }
        if self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            return Err(self.illegal());
        }
        let value = digits
            .chars()
            .fold(0f64, |acc, d| acc * radix as f64 + d.to_digit(radix).unwrap_or(0) as f64);
        let bigint = if self.peek() == Some('n') {
            self.index += 1;
            BigInt::parse_bytes(digits.as_bytes(), radix)
        } else {
            None
        };
        self.numeric_token(start, value, bigint, false)
    }

    /// `0` followed by digits is a legacy octal unless an 8 or 9 follows.
    fn is_implicit_octal_literal(&self) -> bool {
        for byte in self.source.as_bytes()[self.index + 1..].iter() {
            match byte {
                b'8' | b'9' => return false,
                b'0'..=b'7' => {}
                _ => return true,
            }
        }
        true
    }

    fn scan_numeric_literal(&mut self) -> Result<RawToken, ParseError> {
        let start = self.position();
        let mut leading_zero = false;

        if self.peek() != Some('.') {
            if self.peek() == Some('0') {
                match self.byte_at(self.index + 1) {
                    Some(b'x' | b'X') => {
                        self.index += 2;
                        return self.scan_radix_literal(start, 16);
                    }
                    Some(b'b' | b'B') => {
                        self.index += 2;
                        return self.scan_radix_literal(start, 2);
                    }
                    Some(b'o' | b'O') => {
                        self.index += 2;
                        return self.scan_radix_literal(start, 8);
                    }
                    Some(b'0'..=b'9') => {
                        leading_zero = true;
                        if self.is_implicit_octal_literal() {
                            self.index += 1;
                            let digits = self.scan_digits(8);
                            let value = digits
                                .chars()
                                .fold(0f64, |acc, d| acc * 8.0 + d.to_digit(8).unwrap_or(0) as f64);
                            return self.numeric_token(start, value, None, true);
                        }
                    }
                    Some(b'_') => return Err(self.unexpected(messages::NUMERIC_SEPARATOR)),
                    _ => {}
                }
            }
            self.scan_digits(10);
        }

        let mut is_integer = true;
        if self.peek() == Some('.') {
            is_integer = false;
            self.index += 1;
            self.scan_digits(10);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_integer = false;
            self.index += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.index += 1;
            }
            if self.scan_digits(10).is_empty() {
                return Err(self.illegal());
            }
        }
        if self.peek() == Some('_') {
            return Err(self.unexpected(messages::NUMERIC_SEPARATOR));
        }

        let text = &self.source[start.offset..self.index];
        let value: f64 = text.parse().map_err(|_| self.illegal())?;
        if self.peek() == Some('n') {
            if !is_integer || leading_zero {
                return Err(self.illegal());
            }
            self.index += 1;
            let bigint = BigInt::parse_bytes(text.as_bytes(), 10);
            return self.numeric_token(start, value, bigint, false);
        }
        self.numeric_token(start, value, None, false)
    }

    // String literals

    fn scan_string_literal(&mut self) -> Result<RawToken, ParseError> {
        let start = self.position();
        let Some(quote) = self.advance() else {
            return Err(self.illegal());
        };
        let mut octal = false;
        let mut value = String::new();
        let mut terminated = false;

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.index += 1;
                terminated = true;
                break;
            }
            if ch == '\\' {
                self.index += 1;
                let Some(escaped) = self.peek() else {
                    break;
                };
                if is_line_terminator(escaped) {
                    self.consume_line_terminator(escaped);
                    continue;
                }
                self.index += escaped.len_utf8();
                match escaped {
                    'u' => {
                        let decoded = if self.peek() == Some('{') {
                            self.index += 1;
                            self.scan_unicode_code_point_escape()?
                        } else {
                            self.scan_unicode_escape().ok_or_else(|| self.illegal())?
                        };
                        value.push(decoded);
                    }
                    'x' => {
                        let code = self
                            .scan_hex_digits(2)
                            .ok_or_else(|| self.unexpected(messages::INVALID_HEX_ESCAPE_SEQUENCE))?;
                        value.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    't' => value.push('\t'),
                    'b' => value.push('\u{0008}'),
                    'f' => value.push('\u{000C}'),
                    'v' => value.push('\u{000B}'),
                    '8' | '9' => {
                        value.push(escaped);
                        octal = true;
                    }
                    _ if is_octal_digit(escaped) => {
                        let (code, is_octal) = self.octal_to_decimal(escaped);
                        octal |= is_octal;
                        value.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                    _ => value.push(escaped),
                }
            } else if is_line_terminator(ch) {
                break;
            } else {
                self.index += ch.len_utf8();
                value.push(ch);
            }
        }

        if !terminated {
            self.reset_to(start);
            return Err(self.illegal());
        }

        let mut token = self.token(TokenKind::StringLiteral, value, TokenPayload::None, start);
        token.octal = octal;
        Ok(token)
    }

    // Template literals

    fn scan_template(&mut self) -> Result<RawToken, ParseError> {
        let start = self.position();
        let head = self.peek() == Some('`');
        if !head {
            // closing `}` of a substitution
            self.curly_stack.pop();
        }
        self.index += 1;

        let mut cooked = String::new();
        let mut terminated = false;
        let mut tail = false;
        let mut raw_end_offset = 0;

        while let Some(ch) = self.peek() {
            if ch == '`' {
                self.index += 1;
                raw_end_offset = 1;
                tail = true;
                terminated = true;
                break;
            }
            if ch == '$' && self.byte_at(self.index + 1) == Some(b'{') {
                self.index += 2;
                raw_end_offset = 2;
                self.curly_stack.push(Curly::Template);
                terminated = true;
                break;
            }
            if ch == '\\' {
                self.index += 1;
                let Some(escaped) = self.peek() else {
                    break;
                };
                if is_line_terminator(escaped) {
                    self.consume_line_terminator(escaped);
                    continue;
                }
                self.index += escaped.len_utf8();
                match escaped {
                    'n' => cooked.push('\n'),
                    'r' => cooked.push('\r'),
                    't' => cooked.push('\t'),
                    'b' => cooked.push('\u{0008}'),
                    'f' => cooked.push('\u{000C}'),
                    'v' => cooked.push('\u{000B}'),
                    'u' => {
                        let decoded = if self.peek() == Some('{') {
                            self.index += 1;
                            self.scan_unicode_code_point_escape()?
                        } else {
                            self.scan_unicode_escape().ok_or_else(|| self.illegal())?
                        };
                        cooked.push(decoded);
                    }
                    'x' => {
                        let code = self
                            .scan_hex_digits(2)
                            .ok_or_else(|| self.unexpected(messages::INVALID_HEX_ESCAPE_SEQUENCE))?;
                        cooked.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                    '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => cooked.push('\0'),
                    '0'..='9' => return Err(self.unexpected(messages::TEMPLATE_OCTAL_LITERAL)),
                    _ => cooked.push(escaped),
                }
            } else if is_line_terminator(ch) {
                self.consume_line_terminator(ch);
                cooked.push('\n');
            } else {
                self.index += ch.len_utf8();
                cooked.push(ch);
            }
        }

        if !terminated {
            return Err(self.illegal());
        }

        let raw = self.source[start.offset + 1..self.index - raw_end_offset].to_string();
        let value = self.source[start.offset..self.index].to_string();
        Ok(self.token(
            TokenKind::Template,
            value,
            TokenPayload::Template {
                cooked: Some(cooked),
                raw,
                head,
                tail,
            },
            start,
        ))
    }

    // Regular expressions

    fn scan_reg_exp_body(&mut self) -> Result<String, ParseError> {
        let body_start = self.index + 1;
        self.index += 1;
        let mut in_class = false;
        while let Some(ch) = self.peek() {
            if is_line_terminator(ch) {
                break;
            }
            self.index += ch.len_utf8();
            match ch {
                '\\' => match self.peek() {
                    Some(next) if !is_line_terminator(next) => self.index += next.len_utf8(),
                    _ => break,
                },
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    return Ok(self.source[body_start..self.index - 1].to_string());
                }
                _ => {}
            }
        }
        Err(self.unexpected(messages::UNTERMINATED_REG_EXP))
    }

    fn scan_reg_exp_flags(&mut self) -> Result<String, ParseError> {
        let start = self.index;
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                return Err(self.illegal());
            }
            if !is_identifier_part(ch) {
                break;
            }
            self.index += ch.len_utf8();
        }
        Ok(self.source[start..self.index].to_string())
    }

    /// Scan a regular expression literal starting at the current `/`.
    pub fn scan_reg_exp(&mut self) -> Result<RawToken, ParseError> {
        let start = self.position();
        let pattern = self.scan_reg_exp_body()?;
        let flags = self.scan_reg_exp_flags()?;

        let mut seen = String::new();
        for flag in flags.chars() {
            if !"dgimsuy".contains(flag) || seen.contains(flag) {
                return Err(self.error_at(start, messages::INVALID_REG_EXP_FLAGS));
            }
            seen.push(flag);
        }
        if let Err(reason) = validate_reg_exp_pattern(&pattern) {
            let description = messages::format(messages::INVALID_REG_EXP_PATTERN, &[pattern.as_str(), reason]);
            return Err(self.error_at(start, &description));
        }

        let value = self.source[start.offset..self.index].to_string();
        Ok(self.token(
            TokenKind::RegularExpression,
            value,
            TokenPayload::Regex { pattern, flags },
            start,
        ))
    }

    /// Scan the next token. A `/` is always returned as a punctuator.
    pub fn lex(&mut self) -> Result<RawToken, ParseError> {
        let Some(ch) = self.peek() else {
            return Ok(RawToken::eof(self.position()));
        };

        if is_identifier_start(ch) {
            return self.scan_identifier();
        }
        match ch {
            '(' | ')' | ';' => self.scan_punctuator(),
            '\'' | '"' => self.scan_string_literal(),
            '.' if self.byte_at(self.index + 1).is_some_and(|b| b.is_ascii_digit()) => {
                self.scan_numeric_literal()
            }
            _ if is_decimal_digit(ch) => self.scan_numeric_literal(),
            '`' => self.scan_template(),
            '}' if self.curly_stack.last() == Some(&Curly::Template) => self.scan_template(),
            _ => self.scan_punctuator(),
        }
    }

    // JSX

    /// Scan a token inside a JSX tag: names may contain `-`, strings have no
    /// escapes and every delimiter is a single character.
    pub fn lex_jsx(&mut self) -> Result<RawToken, ParseError> {
        let start = self.position();
        let Some(ch) = self.peek() else {
            return Ok(RawToken::eof(start));
        };
        match ch {
            '<' | '>' | '/' | ':' | '=' | '{' | '}' => {
                self.index += 1;
                if ch == '{' {
                    self.curly_stack.push(Curly::Brace);
                } else if ch == '}' {
                    self.curly_stack.pop();
                }
                Ok(self.token(TokenKind::Punctuator, ch.to_string(), TokenPayload::None, start))
            }
            '"' | '\'' => {
                self.index += 1;
                let body_start = self.index;
                while let Some(c) = self.peek() {
                    if c == ch {
                        break;
                    }
                    if is_line_terminator(c) {
                        self.consume_line_terminator(c);
                    } else {
                        self.index += c.len_utf8();
                    }
                }
                if self.peek() != Some(ch) {
                    return Err(self.illegal());
                }
                let value = decode_entities(&self.source[body_start..self.index]);
                self.index += 1;
                Ok(self.token(TokenKind::StringLiteral, value, TokenPayload::None, start))
            }
            '.' => {
                let len = if self.source[self.index..].starts_with("...") { 3 } else { 1 };
                self.index += len;
                let value = self.source[start.offset..self.index].to_string();
                Ok(self.token(TokenKind::Punctuator, value, TokenPayload::None, start))
            }
            _ if ch != '\\' && is_identifier_start(ch) => {
                self.index += ch.len_utf8();
                while let Some(c) = self.peek() {
                    if c == '-' || (c != '\\' && is_identifier_part(c)) {
                        self.index += c.len_utf8();
                    } else {
                        break;
                    }
                }
                let value = self.source[start.offset..self.index].to_string();
                Ok(self.token(TokenKind::JSXIdentifier, value, TokenPayload::None, start))
            }
            _ => self.lex(),
        }
    }

    /// Scan raw text between JSX tags up to the next `{` or `<`.
    pub fn lex_jsx_text(&mut self) -> RawToken {
        let start = self.position();
        while let Some(ch) = self.peek() {
            if ch == '{' || ch == '<' {
                break;
            }
            if is_line_terminator(ch) {
                self.consume_line_terminator(ch);
            } else {
                self.index += ch.len_utf8();
            }
        }
        let value = self.source[start.offset..self.index].to_string();
        self.token(TokenKind::JSXText, value, TokenPayload::None, start)
    }
}

/// Grammar-level check of a regular expression body: balanced groups and
/// classes, and quantifiers that follow something repeatable.
fn validate_reg_exp_pattern(pattern: &str) -> Result<(), &'static str> {
    let bytes = pattern.as_bytes();
    let mut depth = 0usize;
    let mut in_class = false;
    let mut can_repeat = false;
    let mut after_quantifier = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        if in_class {
            match b {
                b'\\' => i += 1,
                b']' => {
                    in_class = false;
                    can_repeat = true;
                }
                _ => {}
            }
            continue;
        }

        let quantifier = match b {
            b'*' | b'+' | b'?' => true,
            b'{' => {
                let rest = &pattern[i..];
                let close = rest.find('}');
                let is_bound = close.is_some_and(|end| {
                    let body = &rest[..end];
                    !body.is_empty()
                        && body.split(',').count() <= 2
                        && body.split(',').next().is_some_and(|n| !n.is_empty())
                        && body.chars().all(|c| c.is_ascii_digit() || c == ',')
                });
                if is_bound {
                    i += close.unwrap_or(0) + 1;
                }
                is_bound
            }
            _ => false,
        };

        if quantifier {
            if b == b'?' && after_quantifier {
                after_quantifier = false;
                continue;
            }
            if !can_repeat {
                return Err("Nothing to repeat");
            }
            can_repeat = false;
            after_quantifier = true;
            continue;
        }
        after_quantifier = false;

        match b {
            b'\\' => {
                i += 1;
                can_repeat = true;
            }
            b'[' => in_class = true,
            b'(' => {
                depth += 1;
                can_repeat = false;
                if bytes.get(i) == Some(&b'?') {
                    i += 1;
                    match bytes.get(i) {
                        Some(b':' | b'=' | b'!') => i += 1,
                        Some(b'<') => {
                            i += 1;
                            if matches!(bytes.get(i), Some(b'=' | b'!')) {
                                i += 1;
                            } else {
                                match pattern[i..].find('>') {
                                    Some(end) if end > 0 => i += end + 1,
                                    _ => return Err("Invalid capture group name"),
                                }
                            }
                        }
                        _ => return Err("Invalid group"),
                    }
                }
            }
            b')' => {
                if depth == 0 {
                    return Err("Unmatched ')'");
                }
                depth -= 1;
                can_repeat = true;
            }
            b'|' | b'^' | b'$' => can_repeat = false,
            _ => can_repeat = true,
        }
    }

    if in_class {
        return Err("Unterminated character class");
    }
    if depth > 0 {
        return Err("Unterminated group");
    }
    Ok(())
}

/// Named character references understood in JSX text and attribute strings.
const XHTML_ENTITIES: &[(&str, char)] = &[
    ("AElig", '\u{00C6}'),
    ("Aacute", '\u{00C1}'),
    ("Eacute", '\u{00C9}'),
    ("Ntilde", '\u{00D1}'),
    ("Ouml", '\u{00D6}'),
    ("Uuml", '\u{00DC}'),
    ("aacute", '\u{00E1}'),
    ("acute", '\u{00B4}'),
    ("aelig", '\u{00E6}'),
    ("agrave", '\u{00E0}'),
    ("alpha", '\u{03B1}'),
    ("amp", '&'),
    ("apos", '\''),
    ("auml", '\u{00E4}'),
    ("beta", '\u{03B2}'),
    ("brvbar", '\u{00A6}'),
    ("bull", '\u{2022}'),
    ("ccedil", '\u{00E7}'),
    ("cent", '\u{00A2}'),
    ("copy", '\u{00A9}'),
    ("darr", '\u{2193}'),
    ("deg", '\u{00B0}'),
    ("divide", '\u{00F7}'),
    ("eacute", '\u{00E9}'),
    ("egrave", '\u{00E8}'),
    ("euml", '\u{00EB}'),
    ("euro", '\u{20AC}'),
    ("frac12", '\u{00BD}'),
    ("frac14", '\u{00BC}'),
    ("frac34", '\u{00BE}'),
    ("gamma", '\u{03B3}'),
    ("gt", '>'),
    ("harr", '\u{2194}'),
    ("hearts", '\u{2665}'),
    ("hellip", '\u{2026}'),
    ("iexcl", '\u{00A1}'),
    ("iquest", '\u{00BF}'),
    ("laquo", '\u{00AB}'),
    ("larr", '\u{2190}'),
    ("ldquo", '\u{201C}'),
    ("lambda", '\u{03BB}'),
    ("lsquo", '\u{2018}'),
    ("lt", '<'),
    ("mdash", '\u{2014}'),
    ("micro", '\u{00B5}'),
    ("middot", '\u{00B7}'),
    ("nbsp", '\u{00A0}'),
    ("ndash", '\u{2013}'),
    ("not", '\u{00AC}'),
    ("ntilde", '\u{00F1}'),
    ("ouml", '\u{00F6}'),
    ("para", '\u{00B6}'),
    ("pi", '\u{03C0}'),
    ("plusmn", '\u{00B1}'),
    ("pound", '\u{00A3}'),
    ("quot", '"'),
    ("raquo", '\u{00BB}'),
    ("rarr", '\u{2192}'),
    ("rdquo", '\u{201D}'),
    ("reg", '\u{00AE}'),
    ("rsquo", '\u{2019}'),
    ("sect", '\u{00A7}'),
    ("shy", '\u{00AD}'),
    ("sup1", '\u{00B9}'),
    ("sup2", '\u{00B2}'),
    ("sup3", '\u{00B3}'),
    ("szlig", '\u{00DF}'),
    ("times", '\u{00D7}'),
    ("trade", '\u{2122}'),
    ("uarr", '\u{2191}'),
    ("uuml", '\u{00FC}'),
    ("yen", '\u{00A5}'),
];

fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                u32::from_str_radix(hex, 16).ok()?
            }
            Some(_) => return None,
            None if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) => {
                number.parse().ok()?
            }
            None => return None,
        };
        return char::from_u32(code);
    }
    XHTML_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|&(_, ch)| ch)
}

/// Replace `&name;`, `&#123;` and `&#x7B;` references; unknown or
/// malformed references are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&semi| semi > 0 && semi <= 10)
            .and_then(|semi| decode_entity(&after[..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(source: &str) -> Scanner<'_> {
        let mut scanner = Scanner::new(source, ErrorHandler::new(false));
        scanner.set_track_comment(true);
        scanner
    }

    fn lex_all(source: &str) -> Vec<RawToken> {
        let mut scanner = scanner(source);
        let mut tokens = Vec::new();
        loop {
            scanner.scan_comments().unwrap();
            let token = scanner.lex().unwrap();
            if token.kind == TokenKind::EOF {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_scanner_empty_source() {
        let mut scanner = scanner("");
        assert_eq!(scanner.lex().unwrap().kind, TokenKind::EOF);
    }

    #[test]
    fn test_scanner_keywords_and_contextual_words() {
        let kinds: Vec<_> = lex_all("if let yield x null true")
            .iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::NullLiteral,
                TokenKind::BooleanLiteral,
            ]
        );
    }

    #[test]
    fn test_scanner_punctuators_longest_match() {
        let values: Vec<_> = lex_all("a >>>= b ?. c ?? d ... => **=")
            .into_iter()
            .filter(|t| t.kind == TokenKind::Punctuator)
            .map(|t| t.value)
            .collect();
        assert_eq!(values, vec![">>>=", "?.", "??", "...", "=>", "**="]);
    }

    #[test]
    fn test_scanner_optional_chain_before_digit() {
        let values: Vec<_> = lex_all("a?.5:1").into_iter().map(|t| t.value).collect();
        assert_eq!(values, vec!["a", "?", ".5", ":", "1"]);
    }

    #[test]
    fn test_scanner_numbers() {
        let tokens = lex_all("42 0x1F 0b101 0o17 017 1.5e3 .25");
        let values: Vec<f64> = tokens
            .iter()
            .map(|t| match t.payload {
                TokenPayload::Number(n) => n,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(values, vec![42.0, 31.0, 5.0, 15.0, 15.0, 1500.0, 0.25]);
        assert!(tokens[4].octal);
        assert!(!tokens[3].octal);
    }

    #[test]
    fn test_scanner_bigint() {
        let tokens = lex_all("123n 0x1Fn");
        assert_eq!(tokens[0].payload, TokenPayload::BigInt(BigInt::from(123)));
        assert_eq!(tokens[1].payload, TokenPayload::BigInt(BigInt::from(31)));
        assert!(scanner("1.5n").lex().is_err());
    }

    #[test]
    fn test_scanner_number_followed_by_identifier_is_illegal() {
        let err = scanner("3in").lex().unwrap_err();
        assert_eq!(err.description, "Unexpected token ILLEGAL");
        assert!(err.is_lexical());
    }

    #[test]
    fn test_scanner_string_escapes() {
        let tokens = lex_all(r#"'a\nb' "\x41B\u{43}" '\u{1F600}' '😀' '\uD800'"#);
        assert_eq!(tokens[0].value, "a\nb");
        assert_eq!(tokens[1].value, "ABC");
        assert_eq!(tokens[2].value, "\u{1F600}");
        assert_eq!(tokens[3].value, "\u{1F600}");
        assert_eq!(tokens[4].value, "\u{FFFD}");
    }

    #[test]
    fn test_scanner_string_octal_escape() {
        let tokens = lex_all(r"'\0' '\01' '\8'");
        assert!(!tokens[0].octal);
        assert!(tokens[1].octal);
        assert_eq!(tokens[1].value, "\u{1}");
        assert!(tokens[2].octal);
    }

    #[test]
    fn test_scanner_unterminated_string() {
        let err = scanner("'abc").lex().unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.column, 0);
    }

    #[test]
    fn test_scanner_line_continuation() {
        let tokens = lex_all("'a\\\nb' c");
        assert_eq!(tokens[0].value, "ab");
        assert_eq!(tokens[1].start.line, 2);
    }

    #[test]
    fn test_scanner_template_with_substitution() {
        let tokens = lex_all("`a${x}b`");
        assert_eq!(tokens.len(), 3);
        match &tokens[0].payload {
            TokenPayload::Template { cooked, raw, head, tail } => {
                assert_eq!(cooked.as_deref(), Some("a"));
                assert_eq!(raw, "a");
                assert!(*head && !*tail);
            }
            other => panic!("unexpected payload {:?}", other),
        }
        match &tokens[2].payload {
            TokenPayload::Template { raw, head, tail, .. } => {
                assert_eq!(raw, "b");
                assert!(!*head && *tail);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_scanner_template_nested_braces() {
        let tokens = lex_all("`${ {a: 1} }`");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds.first(), Some(&TokenKind::Template));
        assert_eq!(kinds.last(), Some(&TokenKind::Template));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_scanner_regex_on_request() {
        let mut s = scanner("/a[/]b/gi");
        let token = s.scan_reg_exp().unwrap();
        assert_eq!(token.kind, TokenKind::RegularExpression);
        assert_eq!(
            token.payload,
            TokenPayload::Regex {
                pattern: "a[/]b".to_string(),
                flags: "gi".to_string()
            }
        );
    }

    #[test]
    fn test_scanner_regex_errors() {
        let err = scanner("/abc").scan_reg_exp().unwrap_err();
        assert_eq!(err.description, "Invalid regular expression: missing /");
        let err = scanner("/a/gg").scan_reg_exp().unwrap_err();
        assert_eq!(err.description, "Invalid regular expression flags");
        let err = scanner("/*a/").scan_reg_exp();
        assert!(err.is_err());
    }

    #[test]
    fn test_validate_reg_exp_pattern() {
        assert!(validate_reg_exp_pattern("a(b|c)*?d{2,3}").is_ok());
        assert!(validate_reg_exp_pattern("(?:x)(?=y)(?<name>z)").is_ok());
        assert!(validate_reg_exp_pattern("a{").is_ok());
        assert_eq!(validate_reg_exp_pattern("(a"), Err("Unterminated group"));
        assert_eq!(validate_reg_exp_pattern("a)"), Err("Unmatched ')'"));
        assert_eq!(validate_reg_exp_pattern("+a"), Err("Nothing to repeat"));
        assert_eq!(validate_reg_exp_pattern("a**"), Err("Nothing to repeat"));
        assert_eq!(validate_reg_exp_pattern("[a"), Err("Unterminated character class"));
    }

    #[test]
    fn test_scanner_comments() {
        let mut s = scanner("// one\n/* two\n */ x");
        let comments = s.scan_comments().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].value, " one");
        assert!(!comments[0].multi_line);
        assert_eq!(comments[0].end.offset, 6);
        assert_eq!(comments[1].value, " two\n ");
        assert_eq!(s.lex().unwrap().start.line, 3);
    }

    #[test]
    fn test_scanner_unterminated_block_comment() {
        assert!(scanner("/* never").scan_comments().is_err());
    }

    #[test]
    fn test_scanner_html_comments_script_only() {
        let mut s = scanner("<!-- hi\n--> there\nx");
        let comments = s.scan_comments().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(s.lex().unwrap().value, "x");

        let mut s = scanner("<!-- hi");
        s.set_module(true);
        assert!(s.scan_comments().unwrap().is_empty());
        assert_eq!(s.lex().unwrap().value, "<");
    }

    #[test]
    fn test_scanner_hashbang() {
        let tokens = lex_all("#!/usr/bin/env node\nx");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].start.line, 2);
    }

    #[test]
    fn test_scanner_escaped_identifier() {
        let tokens = lex_all(r"\u0061bc \u{62}c");
        assert_eq!(tokens[0].value, "abc");
        assert!(tokens[0].escaped);
        assert_eq!(tokens[1].value, "bc");
        assert!(scanner(r"\u0031").lex().is_err());
    }

    #[test]
    fn test_scanner_escaped_keyword_is_error() {
        let err = scanner(r"\u0069f").lex().unwrap_err();
        assert_eq!(err.description, "Keyword must not contain escaped characters");
    }

    #[test]
    fn test_scanner_checkpoint_restore() {
        let mut s = scanner("a b");
        let checkpoint = s.save_state();
        s.lex().unwrap();
        s.scan_comments().unwrap();
        assert_eq!(s.lex().unwrap().value, "b");
        s.restore_state(&checkpoint);
        assert_eq!(s.lex().unwrap().value, "a");
    }

    #[test]
    fn test_scanner_columns_are_byte_offsets() {
        let tokens = lex_all("é = 1\n  b");
        assert_eq!(tokens[1].start.column, 3);
        assert_eq!(tokens[3].start.column, 2);
        assert_eq!(tokens[3].start.offset, 9);
    }

    #[test]
    fn test_scanner_jsx_tokens() {
        let mut s = scanner("data-x=\"a &amp; b\"");
        let name = s.lex_jsx().unwrap();
        assert_eq!(name.kind, TokenKind::JSXIdentifier);
        assert_eq!(name.value, "data-x");
        assert_eq!(s.lex_jsx().unwrap().value, "=");
        let value = s.lex_jsx().unwrap();
        assert_eq!(value.kind, TokenKind::StringLiteral);
        assert_eq!(value.value, "a & b");
    }

    #[test]
    fn test_scanner_jsx_text() {
        let mut s = scanner("hello\nworld</a>");
        let text = s.lex_jsx_text();
        assert_eq!(text.value, "hello\nworld");
        assert_eq!(s.position().line, 2);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt; b &#65;&#x42; &bogus; &"), "a < b AB &bogus; &");
    }
}
