//! JSX elements and fragments.
//!
//! JSX is lexed with its own rules (`lex_jsx` inside tags, `lex_jsx_text`
//! between them). On entry the scanner is rewound to the checkpoint taken
//! before the `<` lookahead; JavaScript lexing resumes inside `{...}`
//! containers and after the outermost closing tag.

use super::{ParseResult, Parser};
use crate::ast::{
    Expression, JSXAttribute, JSXAttributeItem, JSXAttributeName, JSXAttributeValue, JSXChild,
    JSXClosingElement, JSXClosingFragment, JSXElement, JSXElementName, JSXEmptyExpression,
    JSXExpressionContainer, JSXExpressionKind, JSXFragment, JSXIdentifier, JSXMemberExpression,
    JSXMemberObject, JSXNamespacedName, JSXOpeningElement, JSXOpeningFragment, JSXSpreadAttribute,
    JSXText,
};
use crate::messages;
use crate::scanner::decode_entities;
use crate::token::{RawToken, TokenKind};
use core_types::{SourcePosition, Span};

/// An element or a fragment, before it is placed in the tree.
enum Tagged {
    Element(JSXElement),
    Fragment(JSXFragment),
}

impl Tagged {
    fn into_expression(self) -> Expression {
        match self {
            Tagged::Element(element) => Expression::JSXElement(Box::new(element)),
            Tagged::Fragment(fragment) => Expression::JSXFragment(Box::new(fragment)),
        }
    }

    fn into_child(self) -> JSXChild {
        match self {
            Tagged::Element(element) => JSXChild::Element(Box::new(element)),
            Tagged::Fragment(fragment) => JSXChild::Fragment(Box::new(fragment)),
        }
    }

    fn into_attribute_value(self) -> JSXAttributeValue {
        match self {
            Tagged::Element(element) => JSXAttributeValue::Element(Box::new(element)),
            Tagged::Fragment(fragment) => JSXAttributeValue::Fragment(Box::new(fragment)),
        }
    }
}

/// `a`, `a:b` or `a.b.c` as written in a tag.
fn qualified_name(name: &JSXElementName) -> String {
    fn member_object(object: &JSXMemberObject) -> String {
        match object {
            JSXMemberObject::Identifier(id) => id.name.clone(),
            JSXMemberObject::Member(member) => {
                format!("{}.{}", member_object(&member.object), member.property.name)
            }
        }
    }

    match name {
        JSXElementName::Identifier(id) => id.name.clone(),
        JSXElementName::Namespaced(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
        JSXElementName::Member(member) => {
            format!("{}.{}", member_object(&member.object), member.property.name)
        }
    }
}

impl<'a> Parser<'a> {
    /// Parse a JSX element or fragment starting at the `<` lookahead.
    pub(crate) fn parse_jsx_root(&mut self) -> ParseResult<Expression> {
        if self.options.tokens {
            self.tokens.pop();
        }
        self.scanner.restore_state(&self.lookahead_state);
        let tagged = self.parse_jsx_element()?;
        self.prime_lookahead()?;
        self.context.is_assignment_target = false;
        self.context.is_binding_element = false;
        Ok(tagged.into_expression())
    }

    // Tokens

    /// Skip comments and whitespace; the position of the next JSX token.
    fn jsx_start(&mut self) -> ParseResult<SourcePosition> {
        self.collect_comments()?;
        Ok(self.scanner.position())
    }

    fn next_jsx_token(&mut self) -> ParseResult<RawToken> {
        self.collect_comments()?;
        let token = self.scanner.lex_jsx()?;
        self.last_end = token.end;
        self.record_token(&token);
        Ok(token)
    }

    fn peek_jsx_token(&mut self) -> ParseResult<RawToken> {
        let state = self.scanner.save_state();
        let token = self
            .scanner
            .scan_comments()
            .and_then(|_| self.scanner.lex_jsx());
        self.scanner.restore_state(&state);
        token
    }

    fn check_jsx_punctuator(&mut self, op: &str) -> ParseResult<bool> {
        Ok(self.peek_jsx_token()?.is_punctuator(op))
    }

    fn expect_jsx_punctuator(&mut self, op: &str) -> ParseResult<()> {
        let token = self.next_jsx_token()?;
        if !token.is_punctuator(op) {
            return Err(self.unexpected_token_error(&token, None));
        }
        Ok(())
    }

    /// `<` followed by `/` opens a closing tag.
    fn at_jsx_closing_tag(&mut self) -> ParseResult<bool> {
        let state = self.scanner.save_state();
        let result = self.scanner.lex_jsx().and_then(|open| {
            if !open.is_punctuator("<") {
                return Ok(false);
            }
            self.scanner.scan_comments()?;
            Ok(self.scanner.lex_jsx()?.is_punctuator("/"))
        });
        self.scanner.restore_state(&state);
        result
    }

    /// Leave JSX lexing for the JavaScript expression after `{`.
    fn enter_jsx_expression(&mut self) -> ParseResult<()> {
        self.prime_lookahead()
    }

    /// Return to JSX lexing at the `}` lookahead and consume it.
    fn reenter_jsx(&mut self) -> ParseResult<()> {
        if self.options.tokens {
            self.tokens.pop();
        }
        self.scanner.restore_state(&self.lookahead_state);
        self.expect_jsx_punctuator("}")
    }

    // Names

    fn parse_jsx_identifier(&mut self) -> ParseResult<JSXIdentifier> {
        let start = self.jsx_start()?;
        let token = self.next_jsx_token()?;
        if token.kind != TokenKind::JSXIdentifier {
            return Err(self.unexpected_token_error(&token, None));
        }
        Ok(JSXIdentifier {
            name: token.value,
            meta: self.finalize(start),
        })
    }

    fn parse_jsx_namespaced_name(
        &mut self,
        start: SourcePosition,
        namespace: JSXIdentifier,
    ) -> ParseResult<JSXNamespacedName> {
        self.expect_jsx_punctuator(":")?;
        let name = self.parse_jsx_identifier()?;
        Ok(JSXNamespacedName {
            namespace,
            name,
            meta: self.finalize(start),
        })
    }

    fn parse_jsx_element_name(&mut self) -> ParseResult<JSXElementName> {
        let start = self.jsx_start()?;
        let identifier = self.parse_jsx_identifier()?;

        if self.check_jsx_punctuator(":")? {
            let namespaced = self.parse_jsx_namespaced_name(start, identifier)?;
            return Ok(JSXElementName::Namespaced(Box::new(namespaced)));
        }
        if !self.check_jsx_punctuator(".")? {
            return Ok(JSXElementName::Identifier(Box::new(identifier)));
        }

        let mut object = JSXMemberObject::Identifier(Box::new(identifier));
        loop {
            self.expect_jsx_punctuator(".")?;
            let property = self.parse_jsx_identifier()?;
            let member = JSXMemberExpression {
                object,
                property,
                meta: self.finalize(start),
            };
            if !self.check_jsx_punctuator(".")? {
                return Ok(JSXElementName::Member(Box::new(member)));
            }
            object = JSXMemberObject::Member(Box::new(member));
        }
    }

    // Attributes

    fn parse_jsx_attribute_name(&mut self) -> ParseResult<JSXAttributeName> {
        let start = self.jsx_start()?;
        let identifier = self.parse_jsx_identifier()?;
        if self.check_jsx_punctuator(":")? {
            let namespaced = self.parse_jsx_namespaced_name(start, identifier)?;
            return Ok(JSXAttributeName::Namespaced(Box::new(namespaced)));
        }
        Ok(JSXAttributeName::Identifier(Box::new(identifier)))
    }

    fn parse_jsx_attribute_value(&mut self) -> ParseResult<JSXAttributeValue> {
        let start = self.jsx_start()?;
        let next = self.peek_jsx_token()?;
        if next.kind == TokenKind::StringLiteral {
            let token = self.next_jsx_token()?;
            let literal = self.literal_from_token(&token, start);
            return Ok(JSXAttributeValue::Literal(Box::new(literal)));
        }
        if next.is_punctuator("{") {
            let container = self.parse_jsx_expression_container(true)?;
            return Ok(JSXAttributeValue::ExpressionContainer(Box::new(container)));
        }
        if next.is_punctuator("<") {
            return Ok(self.parse_jsx_element()?.into_attribute_value());
        }
        let token = self.next_jsx_token()?;
        Err(self.unexpected_token_error(&token, None))
    }

    fn parse_jsx_spread_attribute(&mut self) -> ParseResult<JSXSpreadAttribute> {
        let start = self.jsx_start()?;
        self.expect_jsx_punctuator("{")?;
        self.expect_jsx_punctuator("...")?;
        self.enter_jsx_expression()?;
        let argument = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
        self.reenter_jsx()?;
        Ok(JSXSpreadAttribute {
            argument,
            meta: self.finalize(start),
        })
    }

    fn parse_jsx_attribute(&mut self) -> ParseResult<JSXAttributeItem> {
        if self.check_jsx_punctuator("{")? {
            let spread = self.parse_jsx_spread_attribute()?;
            return Ok(JSXAttributeItem::Spread(Box::new(spread)));
        }
        let start = self.jsx_start()?;
        let name = self.parse_jsx_attribute_name()?;
        let value = if self.check_jsx_punctuator("=")? {
            self.next_jsx_token()?;
            Some(self.parse_jsx_attribute_value()?)
        } else {
            None
        };
        Ok(JSXAttributeItem::Attribute(Box::new(JSXAttribute {
            name,
            value,
            meta: self.finalize(start),
        })))
    }

    // Children

    /// `{expression}`; `{}` is only allowed among children.
    fn parse_jsx_expression_container(&mut self, in_attribute: bool) -> ParseResult<JSXExpressionContainer> {
        let start = self.jsx_start()?;
        self.expect_jsx_punctuator("{")?;
        let after_brace = self.last_end;
        self.enter_jsx_expression()?;

        let expression = if self.check_punctuator("}") {
            if in_attribute {
                let pos = self.lookahead.start;
                self.tolerate_at(pos, messages::JSX_EMPTY_ATTRIBUTE_EXPRESSION, &[])?;
            }
            let span = Span::new(after_brace, self.lookahead.start);
            JSXExpressionKind::Empty(Box::new(JSXEmptyExpression {
                meta: self.meta_for(span),
            }))
        } else {
            JSXExpressionKind::Expression(
                self.isolate_cover_grammar(|parser| parser.parse_expression())?,
            )
        };
        self.reenter_jsx()?;

        Ok(JSXExpressionContainer {
            expression,
            meta: self.finalize(start),
        })
    }

    fn parse_jsx_text(&mut self) -> Option<JSXText> {
        let token = self.scanner.lex_jsx_text();
        if token.start.offset == token.end.offset {
            return None;
        }
        self.last_end = token.end;
        self.record_token(&token);
        Some(JSXText {
            value: decode_entities(&token.value),
            meta: self.meta_for(Span::new(token.start, token.end)),
            raw: token.value,
        })
    }

    fn parse_jsx_children(&mut self) -> ParseResult<Vec<JSXChild>> {
        let mut children = Vec::new();
        loop {
            if let Some(text) = self.parse_jsx_text() {
                children.push(JSXChild::Text(Box::new(text)));
            }
            if self.scanner.is_eof() {
                let eof = RawToken::eof(self.scanner.position());
                return Err(self.unexpected_token_error(&eof, None));
            }
            if self.at_jsx_closing_tag()? {
                return Ok(children);
            }
            if self.check_jsx_punctuator("{")? {
                let container = self.parse_jsx_expression_container(false)?;
                children.push(JSXChild::ExpressionContainer(Box::new(container)));
            } else {
                children.push(self.parse_jsx_element()?.into_child());
            }
        }
    }

    // Elements

    /// `</name>` or `</>`; the name is `None` for a fragment.
    fn parse_jsx_closing_tag(&mut self) -> ParseResult<(SourcePosition, Option<JSXElementName>)> {
        let start = self.jsx_start()?;
        self.expect_jsx_punctuator("<")?;
        self.expect_jsx_punctuator("/")?;
        let name = if self.check_jsx_punctuator(">")? {
            None
        } else {
            Some(self.parse_jsx_element_name()?)
        };
        self.expect_jsx_punctuator(">")?;
        Ok((start, name))
    }

    fn parse_jsx_element(&mut self) -> ParseResult<Tagged> {
        let start = self.jsx_start()?;
        self.expect_jsx_punctuator("<")?;

        if self.check_jsx_punctuator(">")? {
            self.next_jsx_token()?;
            let opening_fragment = JSXOpeningFragment {
                meta: self.finalize(start),
            };
            let children = self.parse_jsx_children()?;
            let (close_start, name) = self.parse_jsx_closing_tag()?;
            if name.is_some() {
                return Err(self.error_at(close_start, messages::JSX_MISMATCHED_CLOSING_TAG, &["<>"]));
            }
            let closing_fragment = JSXClosingFragment {
                meta: self.finalize(close_start),
            };
            return Ok(Tagged::Fragment(JSXFragment {
                opening_fragment,
                children,
                closing_fragment,
                meta: self.finalize(start),
            }));
        }

        let name = self.parse_jsx_element_name()?;
        let mut attributes = Vec::new();
        while !self.check_jsx_punctuator("/")? && !self.check_jsx_punctuator(">")? {
            attributes.push(self.parse_jsx_attribute()?);
        }
        let self_closing = self.check_jsx_punctuator("/")?;
        if self_closing {
            self.next_jsx_token()?;
        }
        self.expect_jsx_punctuator(">")?;
        let opening_element = JSXOpeningElement {
            name,
            self_closing,
            attributes,
            meta: self.finalize(start),
        };

        if self_closing {
            return Ok(Tagged::Element(JSXElement {
                opening_element,
                children: Vec::new(),
                closing_element: None,
                meta: self.finalize(start),
            }));
        }

        let children = self.parse_jsx_children()?;
        let (close_start, closing_name) = self.parse_jsx_closing_tag()?;
        let open = qualified_name(&opening_element.name);
        let Some(closing_name) = closing_name else {
            return Err(self.error_at(close_start, messages::JSX_MISMATCHED_CLOSING_TAG, &[open.as_str()]));
        };
        if qualified_name(&closing_name) != open {
            self.tolerate_at(close_start, messages::JSX_MISMATCHED_CLOSING_TAG, &[open.as_str()])?;
        }
        let closing_element = JSXClosingElement {
            name: closing_name,
            meta: self.finalize(close_start),
        };

        Ok(Tagged::Element(JSXElement {
            opening_element,
            children,
            closing_element: Some(closing_element),
            meta: self.finalize(start),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        Expression, JSXAttributeItem, JSXAttributeValue, JSXChild, JSXElementName,
        JSXExpressionKind, Statement,
    };
    use crate::options::Options;
    use crate::parser::Parser;

    fn jsx_expression(source: &str) -> Expression {
        let program = Parser::new(source, Options::new().with_jsx(true))
            .parse_program()
            .unwrap();
        match program.body.into_iter().next() {
            Some(Statement::Expression(stmt)) => stmt.expression,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_self_closing_element() {
        let Expression::JSXElement(element) = jsx_expression("<div/>") else {
            panic!("expected element");
        };
        assert!(element.opening_element.self_closing);
        assert!(element.closing_element.is_none());
        assert_eq!(element.meta.span.end.offset, 6);
    }

    #[test]
    fn test_children_and_text() {
        let Expression::JSXElement(element) = jsx_expression("<a>hi &amp; {name}<b/></a>;") else {
            panic!("expected element");
        };
        assert_eq!(element.children.len(), 3);
        let JSXChild::Text(text) = &element.children[0] else {
            panic!("expected text");
        };
        assert_eq!(text.value, "hi & ");
        assert_eq!(text.raw, "hi &amp; ");
        assert!(matches!(element.children[1], JSXChild::ExpressionContainer(_)));
        assert!(matches!(element.children[2], JSXChild::Element(_)));
    }

    #[test]
    fn test_attributes() {
        let Expression::JSXElement(element) =
            jsx_expression(r#"<a b="x" c={1 + 2} d {...rest} data-x:y='z' />"#)
        else {
            panic!("expected element");
        };
        let attributes = &element.opening_element.attributes;
        assert_eq!(attributes.len(), 5);
        let JSXAttributeItem::Attribute(b) = &attributes[0] else {
            panic!("expected attribute");
        };
        assert!(matches!(&b.value, Some(JSXAttributeValue::Literal(l)) if l.raw.is_none()));
        let JSXAttributeItem::Attribute(d) = &attributes[2] else {
            panic!("expected attribute");
        };
        assert!(d.value.is_none());
        assert!(matches!(attributes[3], JSXAttributeItem::Spread(_)));
    }

    #[test]
    fn test_member_and_namespaced_names() {
        let Expression::JSXElement(element) = jsx_expression("<a.b.c></a.b.c>") else {
            panic!("expected element");
        };
        assert!(matches!(element.opening_element.name, JSXElementName::Member(_)));
        let Expression::JSXElement(element) = jsx_expression("<svg:rect/>") else {
            panic!("expected element");
        };
        assert!(matches!(element.opening_element.name, JSXElementName::Namespaced(_)));
    }

    #[test]
    fn test_fragment_and_empty_container() {
        let Expression::JSXFragment(fragment) = jsx_expression("<>{/* note */}</>") else {
            panic!("expected fragment");
        };
        let JSXChild::ExpressionContainer(container) = &fragment.children[0] else {
            panic!("expected container");
        };
        assert!(matches!(container.expression, JSXExpressionKind::Empty(_)));
    }

    #[test]
    fn test_jsx_inside_expression() {
        let Expression::Conditional(conditional) = jsx_expression("ok ? <a>{x ? <b/> : null}</a> : <c/>")
        else {
            panic!("expected conditional");
        };
        assert!(matches!(conditional.consequent, Expression::JSXElement(_)));
        assert!(matches!(conditional.alternate, Expression::JSXElement(_)));
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = Parser::new("<a></b>", Options::new().with_jsx(true))
            .parse_program()
            .unwrap_err();
        assert_eq!(err.description, "Expected corresponding JSX closing tag for a");
        assert_eq!(err.index, 3);
    }

    #[test]
    fn test_empty_attribute_expression() {
        let err = Parser::new("<a b={} />", Options::new().with_jsx(true))
            .parse_program()
            .unwrap_err();
        assert_eq!(err.description, "JSX attributes must only be assigned a non-empty expression");
    }

    #[test]
    fn test_unterminated_element() {
        let err = Parser::new("<a>text", Options::new().with_jsx(true))
            .parse_program()
            .unwrap_err();
        assert_eq!(err.description, "Unexpected end of input");
    }

    #[test]
    fn test_jsx_disabled_rejects_angle_bracket() {
        let err = Parser::new("<div/>", Options::default()).parse_program().unwrap_err();
        assert_eq!(err.description, "Unexpected token <");
    }
}
