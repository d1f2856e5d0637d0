//! Token types.
//!
//! The scanner produces [`RawToken`]s carrying everything the parser needs
//! (cooked values, octal flags, template and regex parts). The public
//! [`Token`] is the flattened record returned by `tokenize` and stored in
//! `Program.tokens`.

use core_types::{Location, Range, SourcePosition, Span};
use num_bigint::BigInt;
use serde::Serialize;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `true` / `false`
    BooleanLiteral,
    /// End of input
    EOF,
    /// Identifier, including contextual keywords
    Identifier,
    /// Reserved word
    Keyword,
    /// `null`
    NullLiteral,
    /// Numeric or BigInt literal
    NumericLiteral,
    /// Operator or delimiter
    Punctuator,
    /// Quoted string
    StringLiteral,
    /// Regular expression literal
    RegularExpression,
    /// A piece of a template literal
    Template,
    /// Identifier inside a JSX tag
    JSXIdentifier,
    /// Text between JSX tags
    JSXText,
}

impl TokenKind {
    /// The name a token of this kind reports in its `type` field.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::BooleanLiteral => "Boolean",
            TokenKind::EOF => "<end>",
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::NullLiteral => "Null",
            TokenKind::NumericLiteral => "Numeric",
            TokenKind::Punctuator => "Punctuator",
            TokenKind::StringLiteral => "String",
            TokenKind::RegularExpression => "RegularExpression",
            TokenKind::Template => "Template",
            TokenKind::JSXIdentifier => "JSXIdentifier",
            TokenKind::JSXText => "JSXText",
        }
    }
}

impl Serialize for TokenKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Kind-specific payload of a scanned token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenPayload {
    /// Nothing beyond `value`
    None,
    /// Numeric value of a numeric literal
    Number(f64),
    /// Value of a BigInt literal
    BigInt(BigInt),
    /// Template piece; `cooked` is `None` when it holds an invalid escape
    Template {
        /// Cooked text
        cooked: Option<String>,
        /// Raw text between the delimiters
        raw: String,
        /// Piece starts the template (begins with a backtick)
        head: bool,
        /// Piece ends the template (ends with a backtick)
        tail: bool,
    },
    /// Regular expression body and flags
    Regex {
        /// Text between the slashes
        pattern: String,
        /// Flags after the closing slash
        flags: String,
    },
}

/// A token as produced by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    /// Lexical category
    pub kind: TokenKind,
    /// Identifier name, punctuator text, cooked string value or numeric text
    pub value: String,
    /// Kind-specific data
    pub payload: TokenPayload,
    /// Contains a legacy octal literal or octal escape
    pub octal: bool,
    /// Identifier or keyword spelled with unicode escapes
    pub escaped: bool,
    /// Position of the first byte
    pub start: SourcePosition,
    /// Position after the last byte
    pub end: SourcePosition,
}

impl RawToken {
    /// The end-of-input token at `pos`.
    pub fn eof(pos: SourcePosition) -> Self {
        Self {
            kind: TokenKind::EOF,
            value: String::new(),
            payload: TokenPayload::None,
            octal: false,
            escaped: false,
            start: pos,
            end: pos,
        }
    }

    /// Start and end positions.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// True for the punctuator `op`.
    pub fn is_punctuator(&self, op: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.value == op
    }

    /// True for the reserved word `word`.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value == word
    }

    /// True for an identifier spelled `name` (contextual keyword check).
    pub fn is_contextual(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.value == name
    }
}

/// `{pattern, flags}` of a regular expression token or literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexParts {
    /// Text between the slashes
    pub pattern: String,
    /// Flags after the closing slash
    pub flags: String,
}

/// A token in the output of `tokenize` or in `Program.tokens`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// Token category
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Exact source text of the token
    pub value: String,
    /// Pattern and flags for regular expressions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexParts>,
    /// Byte range, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    /// Line/column location, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
}

impl Token {
    /// Build the public token for `raw`, reading its text from `source`.
    ///
    /// `range` and `loc` are only filled in when the flags ask for them.
    pub fn from_raw(raw: &RawToken, source: &str, range: bool, loc: Option<Option<&str>>) -> Self {
        let span = raw.span();
        let regex = match &raw.payload {
            TokenPayload::Regex { pattern, flags } => Some(RegexParts {
                pattern: pattern.clone(),
                flags: flags.clone(),
            }),
            _ => None,
        };
        Self {
            kind: raw.kind,
            value: source
                .get(raw.start.offset..raw.end.offset)
                .unwrap_or_default()
                .to_string(),
            regex,
            range: range.then(|| span.range()),
            loc: loc.map(|name| span.location(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(offset: usize) -> SourcePosition {
        SourcePosition {
            line: 1,
            column: offset as u32,
            offset,
        }
    }

    #[test]
    fn test_token_kind_names() {
        assert_eq!(TokenKind::StringLiteral.name(), "String");
        assert_eq!(TokenKind::NumericLiteral.name(), "Numeric");
        assert_eq!(TokenKind::EOF.name(), "<end>");
    }

    #[test]
    fn test_public_token_from_raw() {
        let raw = RawToken {
            kind: TokenKind::RegularExpression,
            value: "/a/g".to_string(),
            payload: TokenPayload::Regex {
                pattern: "a".to_string(),
                flags: "g".to_string(),
            },
            octal: false,
            escaped: false,
            start: pos(2),
            end: pos(6),
        };
        let token = Token::from_raw(&raw, "x=/a/g", true, None);
        assert_eq!(token.value, "/a/g");
        assert_eq!(token.range, Some(Range::new(2, 6)));
        assert!(token.loc.is_none());

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "RegularExpression");
        assert_eq!(json["regex"]["flags"], "g");
    }

    #[test]
    fn test_raw_token_predicates() {
        let mut raw = RawToken::eof(pos(0));
        raw.kind = TokenKind::Punctuator;
        raw.value = "=>".to_string();
        assert!(raw.is_punctuator("=>"));
        assert!(!raw.is_keyword("=>"));
    }
}
