//! Tokenization without parsing.
//!
//! Without a grammar to say where an expression may start, a `/` is read as
//! a regular expression or a division operator by looking back at the tokens
//! already produced: after `)` it depends on the keyword before the matching
//! `(`, after `}` on whether the block closed a function expression or
//! declaration.

use crate::ast::Comment;
use crate::error_handler::ErrorHandler;
use crate::options::{Options, SourceType};
use crate::parser::comment_record;
use crate::scanner::Scanner;
use crate::token::{RawToken, Token, TokenKind};
use core_types::ParseError;
use serde::Serialize;
use tracing::debug;

/// Result of tokenizing a source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenList<T> {
    /// Tokens in source order, as returned by the token callback
    pub tokens: Vec<T>,
    /// Comments, when `comment` is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    /// In tolerant mode, the lexical error that ended tokenization, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ParseError>>,
}

/// Tokens after which a `function` keyword starts a function expression.
fn is_before_function_expression(value: &str) -> bool {
    matches!(
        value,
        "(" | "{" | "[" | "in" | "typeof" | "instanceof" | "new" | "return" | "case" | "delete"
            | "throw" | "void" | "=" | "+=" | "-=" | "*=" | "**=" | "/=" | "%=" | "<<="
            | ">>=" | ">>>=" | "&=" | "|=" | "^=" | "," | "+" | "-" | "*" | "**" | "/" | "%"
            | "++" | "--" | "<<" | ">>" | ">>>" | "&" | "|" | "^" | "!" | "~" | "&&" | "||"
            | "??" | "?" | ":" | "===" | "==" | ">=" | "<=" | "<" | ">" | "!=" | "!=="
    )
}

/// Look-behind state for deciding whether `/` starts a regular expression.
#[derive(Debug, Default)]
struct RegexContext {
    /// Punctuator and keyword values; `None` for every other token
    values: Vec<Option<String>>,
    /// Index of the last `{`
    curly: Option<usize>,
    /// Index of the last `(`
    paren: Option<usize>,
}

impl RegexContext {
    fn push(&mut self, token: &RawToken) {
        if matches!(token.kind, TokenKind::Punctuator | TokenKind::Keyword) {
            match token.value.as_str() {
                "{" => self.curly = Some(self.values.len()),
                "(" => self.paren = Some(self.values.len()),
                _ => {}
            }
            self.values.push(Some(token.value.clone()));
        } else {
            self.values.push(None);
        }
    }

    /// The value `back` entries before `index`.
    fn before(&self, index: Option<usize>, back: usize) -> Option<&str> {
        index
            .and_then(|index| index.checked_sub(back))
            .and_then(|index| self.values.get(index))
            .and_then(|value| value.as_deref())
    }

    fn is_regex_start(&self) -> bool {
        let Some(previous) = self.values.last() else {
            return true;
        };
        let Some(previous) = previous.as_deref() else {
            return false;
        };
        match previous {
            "this" | "]" => false,
            ")" => matches!(
                self.before(self.paren, 1),
                Some("if" | "while" | "for" | "with")
            ),
            "}" => {
                // `function name() {}` or `function () {}` just closed
                if self.before(self.curly, 3) == Some("function") {
                    self.before(self.curly, 4)
                        .is_some_and(|check| !is_before_function_expression(check))
                } else if self.before(self.curly, 4) == Some("function") {
                    self.before(self.curly, 5)
                        .map_or(true, |check| !is_before_function_expression(check))
                } else {
                    false
                }
            }
            _ => true,
        }
    }
}

/// Pull-style tokenizer over one source text.
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    options: Options,
    regex_context: RegexContext,
    comments: Vec<Comment>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer for `source`.
    pub fn new(source: &'a str, options: Options) -> Self {
        // grammar-level checks such as escaped keywords belong to the parser
        let mut scanner = Scanner::new(source, ErrorHandler::new(true));
        scanner.set_track_comment(options.comment);
        scanner.set_module(options.source_type == SourceType::Module);
        Self {
            scanner,
            options,
            regex_context: RegexContext::default(),
            comments: Vec::new(),
        }
    }

    /// The next token, or `None` at the end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        let scanned = self.scanner.scan_comments()?;
        if self.options.comment {
            for comment in scanned {
                self.comments.push(comment_record(comment, &self.options));
            }
        }
        if self.scanner.is_eof() {
            return Ok(None);
        }

        let source = self.scanner.source();
        let at_slash = source
            .get(self.scanner.index()..)
            .is_some_and(|rest| rest.starts_with('/'));
        let raw = if at_slash && self.regex_context.is_regex_start() {
            self.scanner.scan_reg_exp()?
        } else {
            self.scanner.lex()?
        };
        self.regex_context.push(&raw);

        Ok(Some(Token::from_raw(
            &raw,
            source,
            self.options.range,
            self.options.loc_source(),
        )))
    }

    /// Comments seen so far.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }
}

/// Tokenize `source`, mapping every token through `map`.
///
/// In tolerant mode a lexical error ends the token list and is reported as
/// the only entry of `errors`; otherwise it is returned as the error.
pub fn tokenize_with<T, F>(source: &str, options: Options, mut map: F) -> Result<TokenList<T>, ParseError>
where
    F: FnMut(Token) -> T,
{
    debug!(len = source.len(), "tokenize start");
    let tolerant = options.tolerant;
    let with_comments = options.comment;
    let mut tokenizer = Tokenizer::new(source, options);

    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    loop {
        match tokenizer.next_token() {
            Ok(Some(token)) => tokens.push(map(token)),
            Ok(None) => break,
            Err(error) if tolerant => {
                debug!(index = error.index, "tokenize stopped at lexical error");
                errors.push(error);
                break;
            }
            Err(error) => return Err(error),
        }
    }

    debug!(tokens = tokens.len(), errors = errors.len(), "tokenize finished");
    Ok(TokenList {
        tokens,
        comments: with_comments.then(|| tokenizer.take_comments()),
        errors: tolerant.then_some(errors),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize_with(source, Options::default(), |token| (token.kind, token.value))
            .unwrap()
            .tokens
    }

    #[test]
    fn test_division_after_identifier() {
        let tokens = kinds("a / b / c");
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::RegularExpression));
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn test_regex_after_operator_and_keyword() {
        let tokens = kinds("x = /a/g; return /b/");
        let regexes: Vec<_> = tokens
            .iter()
            .filter(|(kind, _)| *kind == TokenKind::RegularExpression)
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(regexes, vec!["/a/g", "/b/"]);
    }

    #[test]
    fn test_regex_after_control_paren() {
        let tokens = kinds("if (x) /re/.test(y)");
        assert_eq!(tokens[4], (TokenKind::RegularExpression, "/re/".to_string()));
        let tokens = kinds("f(x) / 2");
        assert_eq!(tokens[4], (TokenKind::Punctuator, "/".to_string()));
    }

    #[test]
    fn test_regex_after_function_body() {
        // a declaration body ends a statement, an expression body does not
        let tokens = kinds("function f() {}\n/re/");
        assert_eq!(tokens.last().map(|t| t.0), Some(TokenKind::RegularExpression));
        let tokens = kinds("x = function f() {} / 2");
        assert_eq!(tokens.last().map(|t| t.0), Some(TokenKind::NumericLiteral));
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::RegularExpression));
    }

    #[test]
    fn test_template_tokens() {
        let tokens = kinds("`a${b}c`");
        let values: Vec<_> = tokens.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, vec!["`a${", "b", "}c`"]);
        assert_eq!(tokens[0].0, TokenKind::Template);
    }

    #[test]
    fn test_comments_collected_separately() {
        let list = tokenize_with("a // one\n/* two */ b", Options::new().with_comment(true), |t| t)
            .unwrap();
        assert_eq!(list.tokens.len(), 2);
        let comments = list.comments.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].value, " two ");
    }

    #[test]
    fn test_lexical_error() {
        let err = tokenize_with("a #", Options::default(), |t| t).unwrap_err();
        assert_eq!(err.description, "Unexpected token ILLEGAL");
        assert_eq!(err.index, 2);
    }

    #[test]
    fn test_tolerant_stops_at_first_error() {
        let list = tokenize_with("a # b", Options::new().with_tolerant(true), |t| t).unwrap();
        assert_eq!(list.tokens.len(), 1);
        let errors = list.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].index, 2);
    }
}
