//! Expression productions.

use super::function::FormalParameters;
use super::{ParseResult, Parser};
use crate::ast::{
    ArgumentListElement, ArrayExpression, ArrayPattern, ArrowBody, ArrowFunctionExpression,
    ArrowParameterPlaceholder, AssignmentExpression, AssignmentOperator, AssignmentPattern,
    AssignmentProperty, AwaitExpression, BinaryExpression, BinaryOperator, CallExpression,
    ChainExpression, ConditionalExpression, Expression, Identifier, ImportExpression, Literal,
    LiteralValue, LogicalExpression, LogicalOperator, MemberExpression, MetaProperty, NewExpression,
    Node, ObjectExpression, ObjectExpressionProperty, ObjectPattern, ObjectPatternProperty,
    Pattern, Property, PropertyKind, RegexValue, RestElement, SequenceExpression, SpreadElement,
    Super, TaggedTemplateExpression, TemplateElement, TemplateElementValue, TemplateLiteral,
    ThisExpression, UnaryExpression, UnaryOperator, UpdateExpression, UpdateOperator,
    YieldExpression,
};
use crate::messages;
use crate::scanner::Scanner;
use crate::token::{RawToken, RegexParts, TokenKind, TokenPayload};
use core_types::{ParseError, SourcePosition};

/// Compile a regular expression literal with the host engine.
///
/// `u` and `y` literals never get a value; neither do patterns the engine
/// rejects.
pub(crate) fn materialize_regex(pattern: &str, flags: &str) -> Option<RegexValue> {
    if flags.contains('u') || flags.contains('y') {
        return None;
    }
    regex::RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .ok()
        .map(RegexValue)
}

impl<'a> Parser<'a> {
    // Primary expressions

    pub(crate) fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        match self.lookahead.kind {
            TokenKind::Identifier => {
                if (self.context.is_module || self.context.is_async) && self.check_contextual("await")
                {
                    let token = self.lookahead.clone();
                    self.tolerate_unexpected_token(&token, None)?;
                }
                if self.match_async_function() {
                    return self.parse_function_expression();
                }
                let token = self.next_token()?;
                self.check_identifier_reference(&token)?;
                Ok(Expression::Identifier(Box::new(Identifier {
                    name: token.value,
                    meta: self.finalize(start),
                })))
            }
            TokenKind::NumericLiteral | TokenKind::StringLiteral => {
                if self.context.strict && self.lookahead.octal {
                    let token = self.lookahead.clone();
                    self.tolerate_unexpected_token(&token, Some(messages::STRICT_OCTAL_LITERAL))?;
                }
                self.context.is_assignment_target = false;
                self.context.is_binding_element = false;
                let token = self.next_token()?;
                Ok(Expression::Literal(Box::new(self.literal_from_token(&token, start))))
            }
            TokenKind::BooleanLiteral | TokenKind::NullLiteral => {
                self.context.is_assignment_target = false;
                self.context.is_binding_element = false;
                let token = self.next_token()?;
                Ok(Expression::Literal(Box::new(self.literal_from_token(&token, start))))
            }
            TokenKind::Template => {
                self.context.is_assignment_target = false;
                self.context.is_binding_element = false;
                let template = self.parse_template_literal()?;
                Ok(Expression::TemplateLiteral(Box::new(template)))
            }
            TokenKind::Punctuator => match self.lookahead.value.as_str() {
                "(" => {
                    self.context.is_binding_element = false;
                    self.inherit_cover_grammar(|parser| parser.parse_group_expression())
                }
                "[" => self.inherit_cover_grammar(|parser| parser.parse_array_initializer()),
                "{" => self.inherit_cover_grammar(|parser| parser.parse_object_initializer()),
                "/" | "/=" => {
                    self.context.is_assignment_target = false;
                    self.context.is_binding_element = false;
                    self.rescan_reg_exp()?;
                    let token = self.next_token()?;
                    Ok(Expression::Literal(Box::new(self.literal_from_token(&token, start))))
                }
                "<" if self.options.jsx => self.parse_jsx_root(),
                _ => Err(self.unexpected_token_error(&self.lookahead, None)),
            },
            TokenKind::Keyword => {
                self.context.is_assignment_target = false;
                self.context.is_binding_element = false;
                match self.lookahead.value.as_str() {
                    "function" => self.parse_function_expression(),
                    "this" => {
                        self.next_token()?;
                        Ok(Expression::This(Box::new(ThisExpression {
                            meta: self.finalize(start),
                        })))
                    }
                    "class" => self.parse_class_expression(),
                    "import" => {
                        if self.match_import_call() {
                            self.parse_import_call()
                        } else if self.match_import_meta() {
                            self.parse_import_meta()
                        } else {
                            Err(self.unexpected_token_error(&self.lookahead, None))
                        }
                    }
                    _ => Err(self.unexpected_token_error(&self.lookahead, None)),
                }
            }
            _ => Err(self.unexpected_token_error(&self.lookahead, None)),
        }
    }

    /// Strict-mode and generator restrictions on an identifier used as a reference.
    fn check_identifier_reference(&mut self, token: &RawToken) -> ParseResult<()> {
        if self.context.strict && Scanner::is_strict_mode_reserved_word(&token.value) {
            self.tolerate_unexpected_token(token, Some(messages::STRICT_RESERVED_WORD))?;
        } else if token.value == "yield" && !self.context.allow_yield {
            return Err(self.unexpected_token_error(token, None));
        }
        Ok(())
    }

    /// Build a literal node from a consumed literal token.
    pub(crate) fn literal_from_token(&self, token: &RawToken, start: SourcePosition) -> Literal {
        let mut regex = None;
        let mut bigint = None;
        let value = match (&token.kind, &token.payload) {
            (TokenKind::NumericLiteral, TokenPayload::Number(number)) => LiteralValue::Number(*number),
            (TokenKind::NumericLiteral, TokenPayload::BigInt(value)) => {
                bigint = Some(value.to_string());
                LiteralValue::BigInt(value.clone())
            }
            (TokenKind::StringLiteral, _) => LiteralValue::String(token.value.clone()),
            (TokenKind::BooleanLiteral, _) => LiteralValue::Boolean(token.value == "true"),
            (TokenKind::RegularExpression, TokenPayload::Regex { pattern, flags }) => {
                regex = Some(RegexParts {
                    pattern: pattern.clone(),
                    flags: flags.clone(),
                });
                LiteralValue::RegExp(materialize_regex(pattern, flags))
            }
            _ => LiteralValue::Null,
        };
        Literal {
            value,
            raw: self.raw_text(token),
            regex,
            bigint,
            meta: self.finalize(start),
        }
    }

    /// `async` followed by `function` on the same line.
    pub(crate) fn match_async_function(&mut self) -> bool {
        if !self.check_contextual("async") {
            return false;
        }
        let line = self.lookahead.end.line;
        self.peek_next_token()
            .is_some_and(|next| next.is_keyword("function") && next.start.line == line)
    }

    pub(crate) fn match_import_call(&mut self) -> bool {
        self.check_keyword("import")
            && self
                .peek_next_token()
                .is_some_and(|next| next.is_punctuator("("))
    }

    pub(crate) fn match_import_meta(&mut self) -> bool {
        self.check_keyword("import")
            && self
                .peek_next_token()
                .is_some_and(|next| next.is_punctuator("."))
    }

    fn parse_import_call(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        self.expect_keyword("import")?;
        self.expect_punctuator("(")?;
        let source = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
        self.expect_punctuator(")")?;
        Ok(Expression::Import(Box::new(ImportExpression {
            source,
            meta: self.finalize(start),
        })))
    }

    fn parse_import_meta(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let meta_name = self.parse_identifier_name()?;
        if !self.context.is_module {
            return Err(self.error_at(start, messages::UNEXPECTED_TOKEN, &["import"]));
        }
        self.expect_punctuator(".")?;
        if !self.check_contextual("meta") {
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, None));
        }
        let property = self.parse_identifier_name()?;
        Ok(Expression::MetaProperty(Box::new(MetaProperty {
            meta_name,
            property,
            meta: self.finalize(start),
        })))
    }

    /// Any identifier name, reserved words included.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult<Identifier> {
        let start = self.start_node();
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Identifier
            | TokenKind::Keyword
            | TokenKind::BooleanLiteral
            | TokenKind::NullLiteral => Ok(Identifier {
                name: token.value,
                meta: self.finalize(start),
            }),
            _ => Err(self.unexpected_token_error(&token, None)),
        }
    }

    // Arrays and objects

    pub(crate) fn parse_spread_element(&mut self) -> ParseResult<SpreadElement> {
        let start = self.start_node();
        self.expect_punctuator("...")?;
        let argument = self.inherit_cover_grammar(|parser| parser.parse_assignment_expression())?;
        Ok(SpreadElement {
            argument,
            meta: self.finalize(start),
        })
    }

    fn parse_array_initializer(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let mut elements = Vec::new();
        self.expect_punctuator("[")?;
        while !self.check_punctuator("]") {
            if self.check_punctuator(",") {
                self.next_token()?;
                elements.push(None);
            } else if self.check_punctuator("...") {
                let element = self.parse_spread_element()?;
                if !self.check_punctuator("]") {
                    self.context.is_assignment_target = false;
                    self.context.is_binding_element = false;
                    self.expect_punctuator(",")?;
                }
                elements.push(Some(ArgumentListElement::Spread(Box::new(element))));
            } else {
                let element =
                    self.inherit_cover_grammar(|parser| parser.parse_assignment_expression())?;
                elements.push(Some(ArgumentListElement::Expression(element)));
                self.expect_comma_unless("]")?;
            }
        }
        self.expect_punctuator("]")?;
        Ok(Expression::Array(Box::new(ArrayExpression {
            elements,
            meta: self.finalize(start),
        })))
    }

    /// A token that may start a property name.
    pub(crate) fn is_property_key_start(token: &RawToken) -> bool {
        match token.kind {
            TokenKind::Identifier
            | TokenKind::StringLiteral
            | TokenKind::BooleanLiteral
            | TokenKind::NullLiteral
            | TokenKind::NumericLiteral
            | TokenKind::Keyword => true,
            TokenKind::Punctuator => token.value == "[",
            _ => false,
        }
    }

    /// Property name: identifier name, string, number or `[expression]`.
    pub(crate) fn parse_object_property_key(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let token = self.next_token()?;
        match token.kind {
            TokenKind::StringLiteral | TokenKind::NumericLiteral => {
                if self.context.strict && token.octal {
                    self.tolerate_unexpected_token(&token, Some(messages::STRICT_OCTAL_LITERAL))?;
                }
                Ok(Expression::Literal(Box::new(self.literal_from_token(&token, start))))
            }
            TokenKind::Identifier
            | TokenKind::BooleanLiteral
            | TokenKind::NullLiteral
            | TokenKind::Keyword => Ok(Expression::Identifier(Box::new(Identifier {
                name: token.value,
                meta: self.finalize(start),
            }))),
            TokenKind::Punctuator if token.value == "[" => {
                let key = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
                self.expect_punctuator("]")?;
                Ok(key)
            }
            _ => Err(self.unexpected_token_error(&token, None)),
        }
    }

    /// True for a non-computed key spelled `name`.
    pub(crate) fn is_property_key(key: &Expression, name: &str) -> bool {
        match key {
            Expression::Identifier(id) => id.name == name,
            Expression::Literal(literal) => {
                matches!(&literal.value, LiteralValue::String(value) if value == name)
            }
            _ => false,
        }
    }

    fn parse_object_property(&mut self, has_proto: &mut bool) -> ParseResult<ObjectExpressionProperty> {
        let start = self.start_node();
        let token = self.lookahead.clone();

        let mut key = None;
        let mut computed = false;
        let mut is_async = false;
        let mut is_generator = false;

        if token.kind == TokenKind::Identifier {
            self.next_token()?;
            computed = self.check_punctuator("[");
            is_async = !self.has_line_terminator
                && token.value == "async"
                && !token.escaped
                && !self.check_punctuator(":")
                && !self.check_punctuator("(")
                && !self.check_punctuator(",")
                && !self.check_punctuator("}")
                && !self.check_punctuator("=");
            if is_async {
                is_generator = self.consume_punctuator("*")?;
                computed = self.check_punctuator("[");
                key = Some(self.parse_object_property_key()?);
            } else {
                key = Some(Expression::Identifier(Box::new(Identifier {
                    name: token.value.clone(),
                    meta: self.finalize(start),
                })));
            }
        } else if self.check_punctuator("*") {
            self.next_token()?;
        } else {
            computed = self.check_punctuator("[");
            key = Some(self.parse_object_property_key()?);
        }

        let lookahead_is_key = Self::is_property_key_start(&self.lookahead);
        let accessor = token.kind == TokenKind::Identifier && !is_async && lookahead_is_key;

        let (key, value, kind, method, shorthand) = if accessor && token.value == "get" {
            computed = self.check_punctuator("[");
            let key = self.parse_object_property_key()?;
            let value = self.parse_getter_method()?;
            (key, Expression::Function(Box::new(value)), PropertyKind::Get, false, false)
        } else if accessor && token.value == "set" {
            computed = self.check_punctuator("[");
            let key = self.parse_object_property_key()?;
            let value = self.parse_setter_method()?;
            (key, Expression::Function(Box::new(value)), PropertyKind::Set, false, false)
        } else if token.is_punctuator("*") && lookahead_is_key {
            computed = self.check_punctuator("[");
            let key = self.parse_object_property_key()?;
            let value = self.parse_method_function(false, true)?;
            (key, Expression::Function(Box::new(value)), PropertyKind::Init, true, false)
        } else {
            let Some(key) = key else {
                let token = self.lookahead.clone();
                return Err(self.unexpected_token_error(&token, None));
            };
            if self.check_punctuator(":") && !is_async {
                if !computed && Self::is_property_key(&key, "__proto__") {
                    if *has_proto {
                        self.tolerate_error(messages::DUPLICATE_PROTO_PROPERTY, &[])?;
                    }
                    *has_proto = true;
                }
                self.next_token()?;
                let value =
                    self.inherit_cover_grammar(|parser| parser.parse_assignment_expression())?;
                (key, value, PropertyKind::Init, false, false)
            } else if self.check_punctuator("(") {
                let value = self.parse_method_function(is_async, is_generator)?;
                (key, Expression::Function(Box::new(value)), PropertyKind::Init, true, false)
            } else if token.kind == TokenKind::Identifier && !is_async {
                self.check_identifier_reference(&token)?;
                let id = Identifier {
                    name: token.value.clone(),
                    meta: self.finalize(start),
                };
                if self.check_punctuator("=") {
                    self.context.first_cover_initialized_name_error = Some(self.lookahead.clone());
                    self.next_token()?;
                    let init =
                        self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
                    let value = Expression::Assignment(Box::new(AssignmentExpression {
                        operator: AssignmentOperator::Assign,
                        left: Pattern::Identifier(Box::new(id)),
                        right: init,
                        meta: self.finalize(start),
                    }));
                    (key, value, PropertyKind::Init, false, true)
                } else {
                    (key, Expression::Identifier(Box::new(id)), PropertyKind::Init, false, true)
                }
            } else {
                return Err(self.unexpected_token_error(&self.lookahead, None));
            }
        };

        Ok(ObjectExpressionProperty::Property(Box::new(Property {
            key,
            computed,
            value,
            kind,
            method,
            shorthand,
            meta: self.finalize(start),
        })))
    }

    fn parse_object_initializer(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        self.expect_punctuator("{")?;
        let mut properties = Vec::new();
        let mut has_proto = false;
        while !self.check_punctuator("}") {
            let property = if self.check_punctuator("...") {
                ObjectExpressionProperty::Spread(Box::new(self.parse_spread_element()?))
            } else {
                self.parse_object_property(&mut has_proto)?
            };
            properties.push(property);
            self.expect_comma_unless("}")?;
        }
        self.expect_punctuator("}")?;
        Ok(Expression::Object(Box::new(ObjectExpression {
            properties,
            meta: self.finalize(start),
        })))
    }

    // Templates

    fn parse_template_element(&mut self, head: bool) -> ParseResult<TemplateElement> {
        let start = self.start_node();
        let token = self.next_token()?;
        match token.payload {
            TokenPayload::Template {
                cooked,
                raw,
                head: is_head,
                tail,
            } if token.kind == TokenKind::Template && is_head == head => Ok(TemplateElement {
                value: TemplateElementValue { cooked, raw },
                tail,
                meta: self.finalize(start),
            }),
            _ => Err(self.unexpected_token_error(&token, None)),
        }
    }

    pub(crate) fn parse_template_literal(&mut self) -> ParseResult<TemplateLiteral> {
        let start = self.start_node();
        let mut expressions = Vec::new();
        let mut quasis = Vec::new();

        let mut quasi = self.parse_template_element(true)?;
        let mut tail = quasi.tail;
        quasis.push(quasi);
        while !tail {
            expressions.push(self.parse_expression()?);
            quasi = self.parse_template_element(false)?;
            tail = quasi.tail;
            quasis.push(quasi);
        }

        Ok(TemplateLiteral {
            quasis,
            expressions,
            meta: self.finalize(start),
        })
    }

    // Cover grammar reinterpretation

    /// Turn an expression parsed under the cover grammar into a pattern.
    pub(crate) fn reinterpret_expression_as_pattern(&self, expr: Expression) -> ParseResult<Pattern> {
        match expr {
            Expression::Identifier(id) => Ok(Pattern::Identifier(id)),
            Expression::Member(member) => Ok(Pattern::Member(member)),
            Expression::Array(array) => {
                let array = *array;
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in array.elements {
                    elements.push(match element {
                        Some(element) => Some(self.reinterpret_argument_as_pattern(element)?),
                        None => None,
                    });
                }
                Ok(Pattern::Array(Box::new(ArrayPattern {
                    elements,
                    meta: array.meta,
                })))
            }
            Expression::Object(object) => {
                let object = *object;
                let mut properties = Vec::with_capacity(object.properties.len());
                for property in object.properties {
                    properties.push(match property {
                        ObjectExpressionProperty::Property(property) => {
                            let property = *property;
                            if property.method || property.kind != PropertyKind::Init {
                                return Err(self.invalid_assignment_target(&property.value));
                            }
                            ObjectPatternProperty::Property(Box::new(AssignmentProperty {
                                key: property.key,
                                computed: property.computed,
                                value: self.reinterpret_expression_as_pattern(property.value)?,
                                kind: PropertyKind::Init,
                                method: false,
                                shorthand: property.shorthand,
                                meta: property.meta,
                            }))
                        }
                        ObjectExpressionProperty::Spread(spread) => {
                            let spread = *spread;
                            ObjectPatternProperty::Rest(Box::new(RestElement {
                                argument: self.reinterpret_expression_as_pattern(spread.argument)?,
                                meta: spread.meta,
                            }))
                        }
                    });
                }
                Ok(Pattern::Object(Box::new(ObjectPattern {
                    properties,
                    meta: object.meta,
                })))
            }
            Expression::Assignment(assign) if assign.operator == AssignmentOperator::Assign => {
                let assign = *assign;
                Ok(Pattern::Assignment(Box::new(AssignmentPattern {
                    left: assign.left,
                    right: assign.right,
                    meta: assign.meta,
                })))
            }
            other => Err(self.invalid_assignment_target(&other)),
        }
    }

    fn reinterpret_argument_as_pattern(&self, element: ArgumentListElement) -> ParseResult<Pattern> {
        match element {
            ArgumentListElement::Expression(expr) => self.reinterpret_expression_as_pattern(expr),
            ArgumentListElement::Spread(spread) => {
                let spread = *spread;
                Ok(Pattern::Rest(Box::new(RestElement {
                    argument: self.reinterpret_expression_as_pattern(spread.argument)?,
                    meta: spread.meta,
                })))
            }
        }
    }

    fn invalid_assignment_target(&self, expr: &Expression) -> ParseError {
        self.error_at(expr.meta().span.start, messages::INVALID_LHS_IN_ASSIGNMENT, &[])
    }

    fn arrow_placeholder(&self, params: Vec<Pattern>, is_async: bool, start: SourcePosition) -> Expression {
        Expression::ArrowParameterPlaceholder(Box::new(ArrowParameterPlaceholder {
            params,
            is_async,
            meta: self.finalize(start),
        }))
    }

    /// `( ... )`: a parenthesized expression or the parameters of an arrow function.
    fn parse_group_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        self.expect_punctuator("(")?;

        if self.check_punctuator(")") {
            self.next_token()?;
            if !self.check_punctuator("=>") {
                self.expect_punctuator("=>")?;
            }
            return Ok(self.arrow_placeholder(Vec::new(), false, start));
        }

        if self.check_punctuator("...") {
            let rest = self.parse_rest_element(&mut Vec::new())?;
            self.expect_punctuator(")")?;
            if !self.check_punctuator("=>") {
                self.expect_punctuator("=>")?;
            }
            return Ok(self.arrow_placeholder(vec![Pattern::Rest(Box::new(rest))], false, start));
        }

        let inner_start = self.start_node();
        self.context.is_binding_element = true;
        let first = self.inherit_cover_grammar(|parser| parser.parse_assignment_expression())?;

        let mut expr = first;
        if self.check_punctuator(",") {
            let mut expressions = vec![expr];
            self.context.is_assignment_target = false;
            while self.consume_punctuator(",")? {
                if self.check_punctuator(")") {
                    self.next_token()?;
                    let params = self.reinterpret_all(expressions)?;
                    return Ok(self.arrow_placeholder(params, false, start));
                }
                if self.check_punctuator("...") {
                    if !self.context.is_binding_element {
                        let token = self.lookahead.clone();
                        return Err(self.unexpected_token_error(&token, None));
                    }
                    let rest = self.parse_rest_element(&mut Vec::new())?;
                    self.expect_punctuator(")")?;
                    if !self.check_punctuator("=>") {
                        self.expect_punctuator("=>")?;
                    }
                    self.context.is_binding_element = false;
                    let mut params = self.reinterpret_all(expressions)?;
                    params.push(Pattern::Rest(Box::new(rest)));
                    return Ok(self.arrow_placeholder(params, false, start));
                }
                expressions
                    .push(self.inherit_cover_grammar(|parser| parser.parse_assignment_expression())?);
            }
            expr = Expression::Sequence(Box::new(SequenceExpression {
                expressions,
                meta: self.finalize(inner_start),
            }));
        }

        self.expect_punctuator(")")?;
        if self.check_punctuator("=>") {
            if !self.context.is_binding_element {
                let token = self.lookahead.clone();
                return Err(self.unexpected_token_error(&token, None));
            }
            let params = match expr {
                Expression::Sequence(sequence) => self.reinterpret_all(sequence.expressions)?,
                other => vec![self.reinterpret_expression_as_pattern(other)?],
            };
            return Ok(self.arrow_placeholder(params, false, start));
        }
        self.context.is_binding_element = false;
        self.grouped.insert(expr.meta().span.start.offset);
        Ok(expr)
    }

    fn reinterpret_all(&self, expressions: Vec<Expression>) -> ParseResult<Vec<Pattern>> {
        expressions
            .into_iter()
            .map(|expr| self.reinterpret_expression_as_pattern(expr))
            .collect()
    }

    // Calls and members

    /// `( arguments )`. Async arguments may still become arrow parameters.
    fn parse_arguments(&mut self, maybe_arrow: bool) -> ParseResult<Vec<ArgumentListElement>> {
        self.expect_punctuator("(")?;
        let mut arguments = Vec::new();
        while !self.check_punctuator(")") {
            let argument = if self.check_punctuator("...") {
                ArgumentListElement::Spread(Box::new(self.parse_spread_element()?))
            } else if maybe_arrow {
                ArgumentListElement::Expression(
                    self.inherit_cover_grammar(|parser| parser.parse_assignment_expression())?,
                )
            } else {
                ArgumentListElement::Expression(
                    self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?,
                )
            };
            arguments.push(argument);
            self.expect_comma_unless(")")?;
        }
        self.expect_punctuator(")")?;
        Ok(arguments)
    }

    fn parse_super(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        self.expect_keyword("super")?;
        if !self.check_punctuator("(") && !self.check_punctuator(".") && !self.check_punctuator("[") {
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, Some(messages::UNEXPECTED_SUPER)));
        }
        Ok(Expression::Super(Box::new(Super {
            meta: self.finalize(start),
        })))
    }

    fn parse_new_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let meta_name = self.parse_identifier_name()?;

        if self.check_punctuator(".") {
            self.next_token()?;
            if self.check_contextual("target") && self.context.in_function_body {
                let property = self.parse_identifier_name()?;
                return Ok(Expression::MetaProperty(Box::new(MetaProperty {
                    meta_name,
                    property,
                    meta: self.finalize(start),
                })));
            }
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, None));
        }
        if self.check_keyword("import") {
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, None));
        }

        let callee = self.isolate_cover_grammar(|parser| parser.parse_left_hand_side_expression())?;
        let arguments = if self.check_punctuator("(") {
            self.parse_arguments(false)?
        } else {
            Vec::new()
        };
        self.context.is_assignment_target = false;
        self.context.is_binding_element = false;
        Ok(Expression::New(Box::new(NewExpression {
            callee,
            arguments,
            meta: self.finalize(start),
        })))
    }

    fn member(
        &self,
        object: Expression,
        property: Expression,
        computed: bool,
        optional: bool,
        start: SourcePosition,
    ) -> Expression {
        Expression::Member(Box::new(MemberExpression {
            computed,
            object,
            property,
            optional,
            meta: self.finalize(start),
        }))
    }

    pub(crate) fn parse_left_hand_side_expression_allow_call(&mut self) -> ParseResult<Expression> {
        let start_token = self.lookahead.clone();
        let start = start_token.start;
        let maybe_async = self.check_contextual("async");

        let previous_allow_in = self.context.allow_in;
        self.context.allow_in = true;

        let mut expr = if self.check_keyword("super") && self.context.in_function_body {
            self.parse_super()?
        } else if self.check_keyword("new") {
            self.inherit_cover_grammar(|parser| parser.parse_new_expression())?
        } else {
            self.inherit_cover_grammar(|parser| parser.parse_primary_expression())?
        };

        let mut in_chain = false;
        loop {
            if self.check_punctuator("?.") {
                self.next_token()?;
                in_chain = true;
                self.context.is_binding_element = false;
                self.context.is_assignment_target = false;
                if self.check_punctuator("(") {
                    let arguments = self.parse_arguments(false)?;
                    expr = Expression::Call(Box::new(CallExpression {
                        callee: expr,
                        arguments,
                        optional: true,
                        meta: self.finalize(start),
                    }));
                } else if self.check_punctuator("[") {
                    self.next_token()?;
                    let property = self.isolate_cover_grammar(|parser| parser.parse_expression())?;
                    self.expect_punctuator("]")?;
                    expr = self.member(expr, property, true, true, start);
                } else if self.lookahead.kind == TokenKind::Template {
                    let token = self.lookahead.clone();
                    return Err(self.unexpected_token_error(&token, None));
                } else {
                    let property = Expression::Identifier(Box::new(self.parse_identifier_name()?));
                    expr = self.member(expr, property, false, true, start);
                }
            } else if self.check_punctuator(".") {
                self.context.is_binding_element = false;
                self.context.is_assignment_target = !in_chain;
                self.next_token()?;
                let property = Expression::Identifier(Box::new(self.parse_identifier_name()?));
                expr = self.member(expr, property, false, false, start);
            } else if self.check_punctuator("(") {
                let async_arrow = maybe_async && start_token.start.line == self.lookahead.start.line;
                self.context.is_binding_element = false;
                self.context.is_assignment_target = false;
                let arguments = self.parse_arguments(async_arrow)?;
                if async_arrow && self.check_punctuator("=>") {
                    self.context.first_cover_initialized_name_error = None;
                    let params = arguments
                        .into_iter()
                        .map(|argument| self.reinterpret_argument_as_pattern(argument))
                        .collect::<ParseResult<Vec<_>>>()?;
                    expr = self.arrow_placeholder(params, true, start);
                } else {
                    expr = Expression::Call(Box::new(CallExpression {
                        callee: expr,
                        arguments,
                        optional: false,
                        meta: self.finalize(start),
                    }));
                }
            } else if self.check_punctuator("[") {
                self.context.is_binding_element = false;
                self.context.is_assignment_target = !in_chain;
                self.next_token()?;
                let property = self.isolate_cover_grammar(|parser| parser.parse_expression())?;
                self.expect_punctuator("]")?;
                expr = self.member(expr, property, true, false, start);
            } else if self.is_template_head() {
                if in_chain {
                    let token = self.lookahead.clone();
                    return Err(self.unexpected_token_error(&token, None));
                }
                let quasi = self.parse_template_literal()?;
                expr = Expression::TaggedTemplate(Box::new(TaggedTemplateExpression {
                    tag: expr,
                    quasi,
                    meta: self.finalize(start),
                }));
            } else {
                break;
            }
        }

        if in_chain {
            self.context.is_assignment_target = false;
            expr = Expression::Chain(Box::new(ChainExpression {
                expression: expr,
                meta: self.finalize(start),
            }));
        }
        self.context.allow_in = previous_allow_in;
        Ok(expr)
    }

    fn is_template_head(&self) -> bool {
        self.lookahead.kind == TokenKind::Template
            && matches!(self.lookahead.payload, TokenPayload::Template { head: true, .. })
    }

    /// Member expressions without calls, the callee of `new`.
    fn parse_left_hand_side_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let mut expr = if self.check_keyword("super") && self.context.in_function_body {
            self.parse_super()?
        } else if self.check_keyword("new") {
            self.inherit_cover_grammar(|parser| parser.parse_new_expression())?
        } else {
            self.inherit_cover_grammar(|parser| parser.parse_primary_expression())?
        };

        loop {
            if self.check_punctuator("[") {
                self.context.is_binding_element = false;
                self.context.is_assignment_target = true;
                self.next_token()?;
                let property = self.isolate_cover_grammar(|parser| parser.parse_expression())?;
                self.expect_punctuator("]")?;
                expr = self.member(expr, property, true, false, start);
            } else if self.check_punctuator(".") {
                self.context.is_binding_element = false;
                self.context.is_assignment_target = true;
                self.next_token()?;
                let property = Expression::Identifier(Box::new(self.parse_identifier_name()?));
                expr = self.member(expr, property, false, false, start);
            } else if self.is_template_head() {
                let quasi = self.parse_template_literal()?;
                expr = Expression::TaggedTemplate(Box::new(TaggedTemplateExpression {
                    tag: expr,
                    quasi,
                    meta: self.finalize(start),
                }));
            } else if self.check_punctuator("?.") {
                let token = self.lookahead.clone();
                return Err(self.unexpected_token_error(&token, None));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    // Operators

    fn is_restricted_identifier(expr: &Expression) -> bool {
        expr.as_identifier_name().is_some_and(Scanner::is_restricted_word)
    }

    fn parse_update_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        if self.check_punctuator("++") || self.check_punctuator("--") {
            let token = self.next_token()?;
            let argument = self.inherit_cover_grammar(|parser| parser.parse_unary_expression())?;
            if self.context.strict && Self::is_restricted_identifier(&argument) {
                self.tolerate_error(messages::STRICT_LHS_PREFIX, &[])?;
            }
            if !self.context.is_assignment_target {
                self.tolerate_error(messages::INVALID_LHS_IN_ASSIGNMENT, &[])?;
            }
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
            return Ok(Expression::Update(Box::new(UpdateExpression {
                operator: update_operator(&token.value),
                argument,
                prefix: true,
                meta: self.finalize(start),
            })));
        }

        let expr =
            self.inherit_cover_grammar(|parser| parser.parse_left_hand_side_expression_allow_call())?;
        if !self.has_line_terminator && (self.check_punctuator("++") || self.check_punctuator("--")) {
            if self.context.strict && Self::is_restricted_identifier(&expr) {
                self.tolerate_error(messages::STRICT_LHS_POSTFIX, &[])?;
            }
            if !self.context.is_assignment_target {
                self.tolerate_error(messages::INVALID_LHS_IN_ASSIGNMENT, &[])?;
            }
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
            let token = self.next_token()?;
            return Ok(Expression::Update(Box::new(UpdateExpression {
                operator: update_operator(&token.value),
                argument: expr,
                prefix: false,
                meta: self.finalize(start),
            })));
        }
        Ok(expr)
    }

    fn parse_await_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        self.next_token()?;
        let argument = self.parse_unary_expression()?;
        Ok(Expression::Await(Box::new(AwaitExpression {
            argument,
            meta: self.finalize(start),
        })))
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let operator = match self.lookahead.kind {
            TokenKind::Punctuator | TokenKind::Keyword => UnaryOperator::from_token(&self.lookahead.value),
            _ => None,
        };
        if let Some(operator) = operator {
            self.next_token()?;
            let argument = self.inherit_cover_grammar(|parser| parser.parse_unary_expression())?;
            if self.context.strict
                && operator == UnaryOperator::Delete
                && matches!(argument, Expression::Identifier(_))
            {
                self.tolerate_error(messages::STRICT_DELETE, &[])?;
            }
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
            return Ok(Expression::Unary(Box::new(UnaryExpression {
                operator,
                argument,
                prefix: true,
                meta: self.finalize(start),
            })));
        }
        if self.context.is_async && self.check_contextual("await") {
            return self.parse_await_expression();
        }
        self.parse_update_expression()
    }

    fn parse_exponentiation_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let expr = self.inherit_cover_grammar(|parser| parser.parse_unary_expression())?;
        let bare_unary = matches!(expr, Expression::Unary(_) | Expression::Await(_))
            && !self.grouped.contains(&expr.meta().span.start.offset);
        if !bare_unary && self.check_punctuator("**") {
            self.next_token()?;
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
            let right = self.isolate_cover_grammar(|parser| parser.parse_exponentiation_expression())?;
            return Ok(Expression::Binary(Box::new(BinaryExpression {
                operator: BinaryOperator::Exponent,
                left: expr,
                right,
                meta: self.finalize(start),
            })));
        }
        Ok(expr)
    }

    fn binary_precedence(&self, token: &RawToken) -> u8 {
        match token.kind {
            TokenKind::Punctuator => match token.value.as_str() {
                "??" => 1,
                "||" => 2,
                "&&" => 3,
                "|" => 4,
                "^" => 5,
                "&" => 6,
                "==" | "!=" | "===" | "!==" => 7,
                "<" | ">" | "<=" | ">=" => 8,
                "<<" | ">>" | ">>>" => 9,
                "+" | "-" => 10,
                "*" | "/" | "%" => 11,
                _ => 0,
            },
            TokenKind::Keyword => match token.value.as_str() {
                "instanceof" => 8,
                "in" if self.context.allow_in => 8,
                _ => 0,
            },
            _ => 0,
        }
    }

    /// Logical operand that mixes with `??` only inside parentheses.
    fn is_bare_logical(&self, expr: &Expression) -> bool {
        matches!(expr, Expression::Logical(logical) if logical.operator != LogicalOperator::NullishCoalescing)
            && !self.grouped.contains(&expr.meta().span.start.offset)
    }

    fn make_binary(
        &self,
        operator: &str,
        left: Expression,
        right: Expression,
        start: SourcePosition,
    ) -> ParseResult<Expression> {
        if let Some(operator) = LogicalOperator::from_token(operator) {
            if operator == LogicalOperator::NullishCoalescing
                && (self.is_bare_logical(&left) || self.is_bare_logical(&right))
            {
                return Err(self.error_at(start, messages::MIXED_COALESCE, &[]));
            }
            if operator != LogicalOperator::NullishCoalescing {
                let nested_coalesce = |expr: &Expression| {
                    matches!(expr, Expression::Logical(logical) if logical.operator == LogicalOperator::NullishCoalescing)
                        && !self.grouped.contains(&expr.meta().span.start.offset)
                };
                if nested_coalesce(&left) || nested_coalesce(&right) {
                    return Err(self.error_at(start, messages::MIXED_COALESCE, &[]));
                }
            }
            return Ok(Expression::Logical(Box::new(LogicalExpression {
                operator,
                left,
                right,
                meta: self.finalize(start),
            })));
        }
        let operator = BinaryOperator::from_token(operator)
            .ok_or_else(|| self.error_at(start, messages::UNEXPECTED_TOKEN, &[operator]))?;
        Ok(Expression::Binary(Box::new(BinaryExpression {
            operator,
            left,
            right,
            meta: self.finalize(start),
        })))
    }

    /// Operator-precedence parse over a shift/reduce stack.
    fn parse_binary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let expr = self.inherit_cover_grammar(|parser| parser.parse_exponentiation_expression())?;

        let first_precedence = self.binary_precedence(&self.lookahead);
        if first_precedence == 0 {
            return Ok(expr);
        }
        let token = self.next_token()?;
        self.context.is_assignment_target = false;
        self.context.is_binding_element = false;

        let mut starts = vec![start, self.start_node()];
        let right = self.isolate_cover_grammar(|parser| parser.parse_exponentiation_expression())?;
        let mut operands = vec![expr, right];
        let mut operators = vec![(token.value, first_precedence)];

        loop {
            let precedence = self.binary_precedence(&self.lookahead);
            if precedence == 0 {
                break;
            }
            while operands.len() > 1
                && operators.last().is_some_and(|(_, top)| precedence <= *top)
            {
                let (right, operator, left) = match (operands.pop(), operators.pop(), operands.pop()) {
                    (Some(right), Some((operator, _)), Some(left)) => (right, operator, left),
                    _ => break,
                };
                starts.pop();
                let node_start = starts.last().copied().unwrap_or(start);
                operands.push(self.make_binary(&operator, left, right, node_start)?);
            }
            let operator = self.next_token()?.value;
            operators.push((operator, precedence));
            starts.push(self.start_node());
            operands.push(self.isolate_cover_grammar(|parser| parser.parse_exponentiation_expression())?);
        }

        let mut expr = operands.pop().ok_or_else(|| self.throw_error(messages::UNEXPECTED_EOS, &[]))?;
        while let Some((operator, _)) = operators.pop() {
            starts.pop();
            let node_start = starts.last().copied().unwrap_or(start);
            let left = operands
                .pop()
                .ok_or_else(|| self.throw_error(messages::UNEXPECTED_EOS, &[]))?;
            expr = self.make_binary(&operator, left, expr, node_start)?;
        }
        Ok(expr)
    }

    fn parse_conditional_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let expr = self.inherit_cover_grammar(|parser| parser.parse_binary_expression())?;
        if !self.check_punctuator("?") {
            return Ok(expr);
        }
        self.next_token()?;
        let previous_allow_in = self.context.allow_in;
        self.context.allow_in = true;
        let consequent = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
        self.context.allow_in = previous_allow_in;

        self.expect_punctuator(":")?;
        let alternate = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;

        self.context.is_assignment_target = false;
        self.context.is_binding_element = false;
        Ok(Expression::Conditional(Box::new(ConditionalExpression {
            test: expr,
            consequent,
            alternate,
            meta: self.finalize(start),
        })))
    }

    // Arrow functions

    /// Validate arrow parameters collected through the cover grammar.
    fn reinterpret_as_cover_formals_list(
        &mut self,
        params: Vec<Pattern>,
        is_async: bool,
    ) -> ParseResult<FormalParameters> {
        let mut formals = FormalParameters::new();
        for param in &params {
            if is_async && matches!(param, Pattern::Identifier(id) if id.name == "await") {
                let token = self.lookahead.clone();
                return Err(self.unexpected_token_error(&token, None));
            }
            if let Pattern::Assignment(assign) = param {
                if matches!(assign.right, Expression::Yield(_)) {
                    let token = self.lookahead.clone();
                    return Err(self.unexpected_token_error(&token, None));
                }
            }
            self.check_pattern_param(&mut formals, param);
        }
        if formals.message == Some(messages::STRICT_PARAM_DUPE) {
            if let Some(position) = formals.stricted.or(formals.first_restricted) {
                return Err(self.error_at(position, messages::STRICT_PARAM_DUPE, &[]));
            }
        }
        formals.params = params;
        Ok(formals)
    }

    fn parse_arrow_function(
        &mut self,
        start: SourcePosition,
        params: Vec<Pattern>,
        is_async: bool,
    ) -> ParseResult<Expression> {
        self.context.is_assignment_target = false;
        self.context.is_binding_element = false;
        let formals = self.reinterpret_as_cover_formals_list(params, is_async)?;

        if self.has_line_terminator {
            let token = self.lookahead.clone();
            self.tolerate_unexpected_token(&token, None)?;
        }
        self.context.first_cover_initialized_name_error = None;

        let previous_strict = self.context.strict;
        let previous_allow_strict_directive = self.context.allow_strict_directive;
        let previous_allow_yield = self.context.allow_yield;
        let previous_await = self.context.is_async;
        self.context.allow_strict_directive = formals.simple;
        self.context.allow_yield = true;
        self.context.is_async = is_async;

        self.expect_punctuator("=>")?;
        let body = if self.check_punctuator("{") {
            let previous_allow_in = self.context.allow_in;
            self.context.allow_in = true;
            let body = self.parse_function_source_elements()?;
            self.context.allow_in = previous_allow_in;
            ArrowBody::Block(Box::new(body))
        } else {
            ArrowBody::Expression(
                self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?,
            )
        };
        let expression = matches!(body, ArrowBody::Expression(_));

        self.check_strict_formals(&formals)?;

        self.context.strict = previous_strict;
        self.context.allow_strict_directive = previous_allow_strict_directive;
        self.context.allow_yield = previous_allow_yield;
        self.context.is_async = previous_await;

        Ok(Expression::ArrowFunction(Box::new(ArrowFunctionExpression {
            id: None,
            params: formals.params,
            body,
            generator: false,
            expression,
            is_async,
            meta: self.finalize(start),
        })))
    }

    // Assignment

    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<Expression> {
        if !self.context.allow_yield && self.check_contextual("yield") {
            return self.parse_yield_expression();
        }

        let start_token = self.lookahead.clone();
        let start = start_token.start;
        let mut expr = self.parse_conditional_expression()?;

        if start_token.is_contextual("async")
            && !start_token.escaped
            && start_token.end.line == self.lookahead.start.line
            && self.lookahead.kind == TokenKind::Identifier
            && matches!(expr, Expression::Identifier(_))
        {
            let arg = self.parse_primary_expression()?;
            let param = self.reinterpret_expression_as_pattern(arg)?;
            expr = self.arrow_placeholder(vec![param], true, start);
        }

        if let Expression::ArrowParameterPlaceholder(placeholder) = expr {
            let placeholder = *placeholder;
            return self.parse_arrow_function(start, placeholder.params, placeholder.is_async);
        }
        if self.check_punctuator("=>") {
            return match expr {
                Expression::Identifier(id) => {
                    self.parse_arrow_function(start, vec![Pattern::Identifier(id)], false)
                }
                _ => {
                    let token = self.lookahead.clone();
                    Err(self.unexpected_token_error(&token, None))
                }
            };
        }

        if !self.check_assign() {
            return Ok(expr);
        }

        if self.context.strict {
            if let Some(name) = expr.as_identifier_name() {
                if Scanner::is_restricted_word(name) {
                    self.tolerate_unexpected_token(&start_token, Some(messages::STRICT_LHS_ASSIGNMENT))?;
                }
                if Scanner::is_strict_mode_reserved_word(name) {
                    self.tolerate_unexpected_token(&start_token, Some(messages::STRICT_RESERVED_WORD))?;
                }
            }
        }

        let is_plain_assign = self.check_punctuator("=");
        let simple_target = matches!(expr, Expression::Identifier(_) | Expression::Member(_));
        if !is_plain_assign && !simple_target {
            return Err(self.invalid_assignment_target(&expr));
        }
        let left = self.reinterpret_expression_as_pattern(expr)?;
        if !self.context.is_assignment_target {
            self.tolerate_at(start, messages::INVALID_LHS_IN_ASSIGNMENT, &[])?;
        }
        if !is_plain_assign {
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
        }

        let token = self.next_token()?;
        let operator = AssignmentOperator::from_token(&token.value)
            .ok_or_else(|| self.unexpected_token_error(&token, None))?;
        let right = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
        self.context.first_cover_initialized_name_error = None;

        Ok(Expression::Assignment(Box::new(AssignmentExpression {
            operator,
            left,
            right,
            meta: self.finalize(start),
        })))
    }

    fn is_start_of_expression(&self) -> bool {
        let value = self.lookahead.value.as_str();
        match self.lookahead.kind {
            TokenKind::Punctuator => matches!(
                value,
                "[" | "(" | "{" | "+" | "-" | "!" | "~" | "++" | "--" | "/" | "/=" | "<"
            ),
            TokenKind::Keyword => matches!(
                value,
                "class" | "delete" | "function" | "new" | "super" | "this" | "typeof" | "void"
                    | "import"
            ),
            TokenKind::EOF => false,
            _ => true,
        }
    }

    fn parse_yield_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        self.next_token()?;

        let mut argument = None;
        let mut delegate = false;
        if !self.has_line_terminator {
            let previous_allow_yield = self.context.allow_yield;
            self.context.allow_yield = false;
            delegate = self.check_punctuator("*");
            if delegate {
                self.next_token()?;
                argument = Some(self.parse_assignment_expression()?);
            } else if self.is_start_of_expression() {
                argument = Some(self.parse_assignment_expression()?);
            }
            self.context.allow_yield = previous_allow_yield;
        }

        Ok(Expression::Yield(Box::new(YieldExpression {
            argument,
            delegate,
            meta: self.finalize(start),
        })))
    }

    /// Comma-separated expressions.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let expr = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
        if !self.check_punctuator(",") {
            return Ok(expr);
        }
        let mut expressions = vec![expr];
        while self.consume_punctuator(",")? {
            expressions.push(self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?);
        }
        Ok(Expression::Sequence(Box::new(SequenceExpression {
            expressions,
            meta: self.finalize(start),
        })))
    }
}

fn update_operator(value: &str) -> UpdateOperator {
    if value == "--" {
        UpdateOperator::Decrement
    } else {
        UpdateOperator::Increment
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expression, Node, Statement};
    use crate::options::Options;
    use crate::parser::Parser;

    fn expression(source: &str) -> Expression {
        let program = Parser::new(source, Options::default()).parse_program().unwrap();
        match program.body.into_iter().next() {
            Some(Statement::Expression(stmt)) => stmt.expression,
            _ => panic!("expected an expression statement"),
        }
    }

    fn error(source: &str) -> String {
        Parser::new(source, Options::default())
            .parse_program()
            .unwrap_err()
            .description
    }

    #[test]
    fn test_binary_precedence() {
        let Expression::Binary(add) = expression("1 + 2 * 3") else {
            panic!("expected binary");
        };
        assert_eq!(add.operator.as_str(), "+");
        assert!(matches!(add.right, Expression::Binary(ref mul) if mul.operator.as_str() == "*"));
    }

    #[test]
    fn test_left_associative_subtraction() {
        let Expression::Binary(outer) = expression("a - b - c") else {
            panic!("expected binary");
        };
        assert!(matches!(outer.left, Expression::Binary(_)));
        assert_eq!(outer.meta.span.start.offset, 0);
        assert_eq!(outer.meta.span.end.offset, 9);
    }

    #[test]
    fn test_exponent_is_right_associative() {
        let Expression::Binary(outer) = expression("a ** b ** c") else {
            panic!("expected binary");
        };
        assert!(matches!(outer.right, Expression::Binary(_)));
        assert_eq!(error("-a ** b"), "Unexpected token **");
        assert!(matches!(expression("(-a) ** b"), Expression::Binary(_)));
    }

    #[test]
    fn test_nullish_mixing() {
        assert!(matches!(expression("a ?? b"), Expression::Logical(_)));
        assert!(matches!(expression("(a || b) ?? c"), Expression::Logical(_)));
        assert_eq!(
            error("a || b ?? c"),
            "Nullish coalescing cannot be mixed with || or && without parentheses"
        );
    }

    #[test]
    fn test_regex_at_primary_position() {
        let Expression::Literal(literal) = expression("/ab+c/gi") else {
            panic!("expected literal");
        };
        assert_eq!(literal.regex.as_ref().unwrap().flags, "gi");
        let Expression::Binary(div) = expression("a / b / c") else {
            panic!("expected division");
        };
        assert_eq!(div.operator.as_str(), "/");
    }

    #[test]
    fn test_regex_value_nullified_for_sticky_and_unicode() {
        assert!(super::materialize_regex("a", "u").is_none());
        assert!(super::materialize_regex("a", "gy").is_none());
        assert!(super::materialize_regex("a+", "gi").is_some());
    }

    #[test]
    fn test_destructuring_assignment() {
        let Expression::Assignment(assign) = expression("[a, {b, c: d = 1}, ...e] = f") else {
            panic!("expected assignment");
        };
        assert_eq!(assign.left.type_name(), "ArrayPattern");
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert_eq!(error("1 = 2"), "Invalid left-hand side in assignment");
        assert_eq!(error("a() += 1"), "Invalid left-hand side in assignment");
        assert_eq!(error("({a = 1})"), "Unexpected token =");
    }

    #[test]
    fn test_arrow_functions() {
        let Expression::ArrowFunction(arrow) = expression("(a, [b], ...c) => a") else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.params.len(), 3);
        assert!(arrow.expression);
        let Expression::ArrowFunction(arrow) = expression("async x => { await x }") else {
            panic!("expected arrow");
        };
        assert!(arrow.is_async && !arrow.expression);
        assert!(matches!(expression("async (a, b) => a"), Expression::ArrowFunction(_)));
        assert!(matches!(expression("async(a, b)"), Expression::Call(_)));
        assert!(matches!(expression("() => {}"), Expression::ArrowFunction(_)));
    }

    #[test]
    fn test_arrow_duplicate_params() {
        assert_eq!(
            error("(a, a) => 1"),
            "Strict mode function may not have duplicate parameter names"
        );
    }

    #[test]
    fn test_optional_chain() {
        let Expression::Chain(chain) = expression("a?.b.c()") else {
            panic!("expected chain");
        };
        assert_eq!(chain.expression.type_name(), "CallExpression");
        assert_eq!(error("a?.b = 1"), "Invalid left-hand side in assignment");
    }

    #[test]
    fn test_template_literal() {
        let Expression::TemplateLiteral(template) = expression("`a${b}c${d}`") else {
            panic!("expected template");
        };
        assert_eq!(template.quasis.len(), 3);
        assert_eq!(template.expressions.len(), 2);
        assert!(template.quasis[2].tail);
        assert!(matches!(expression("tag`x`"), Expression::TaggedTemplate(_)));
    }

    #[test]
    fn test_new_and_member() {
        let Expression::New(new) = expression("new a.b(c)") else {
            panic!("expected new");
        };
        assert_eq!(new.callee.type_name(), "MemberExpression");
        assert_eq!(new.arguments.len(), 1);
        assert_eq!(error("new.target"), "Unexpected identifier");
    }

    #[test]
    fn test_sequence_and_conditional() {
        assert!(matches!(expression("a, b, c"), Expression::Sequence(_)));
        assert!(matches!(expression("a ? b : c"), Expression::Conditional(_)));
    }

    #[test]
    fn test_object_literal_forms() {
        let Expression::Object(object) =
            expression("({a, b: 1, [c]: 2, d() {}, get e() { return 1 }, set e(v) {}, async *f() {}, ...g})")
        else {
            panic!("expected object");
        };
        assert_eq!(object.properties.len(), 8);
        assert_eq!(
            error("({__proto__: 1, __proto__: 2})"),
            "Duplicate __proto__ fields are not allowed in object literals"
        );
    }
}
