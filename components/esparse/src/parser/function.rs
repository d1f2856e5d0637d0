//! Functions, formal parameters, binding patterns and classes.

use super::{ParseResult, Parser};
use crate::ast::{
    ArrayPattern, AssignmentPattern, AssignmentProperty, BlockStatement, ClassBody,
    ClassDeclaration, ClassExpression, Expression, FunctionDeclaration, FunctionExpression,
    Identifier, MethodDefinition, MethodKind, ObjectPattern, ObjectPatternProperty, Pattern,
    PropertyKind, RestElement, VariableKind,
};
use crate::messages;
use crate::scanner::Scanner;
use crate::token::{RawToken, TokenKind};
use core_types::SourcePosition;
use std::collections::HashSet;

/// Parameters of a function together with what strict mode will need to re-check.
#[derive(Debug)]
pub(crate) struct FormalParameters {
    /// Every parameter is a plain identifier
    pub simple: bool,
    pub params: Vec<Pattern>,
    pub param_set: HashSet<String>,
    /// Violation that is only an error in strict code
    pub stricted: Option<SourcePosition>,
    /// First restricted name seen in sloppy code
    pub first_restricted: Option<SourcePosition>,
    pub message: Option<&'static str>,
}

impl FormalParameters {
    pub(crate) fn new() -> Self {
        Self {
            simple: true,
            params: Vec::new(),
            param_set: HashSet::new(),
            stricted: None,
            first_restricted: None,
            message: None,
        }
    }
}

/// Pieces shared by function declarations and expressions.
struct FunctionParts {
    id: Option<Identifier>,
    params: Vec<Pattern>,
    body: BlockStatement,
    generator: bool,
    is_async: bool,
}

/// Pieces shared by class declarations and expressions.
struct ClassParts {
    id: Option<Identifier>,
    super_class: Option<Expression>,
    body: ClassBody,
}

impl<'a> Parser<'a> {
    // Binding identifiers and patterns

    /// Restrictions on an identifier about to be bound.
    fn check_binding_identifier(&mut self, token: &RawToken) -> ParseResult<()> {
        if token.kind != TokenKind::Identifier {
            return Err(self.unexpected_token_error(token, None));
        }
        if token.value == "yield" {
            if self.context.strict {
                self.tolerate_unexpected_token(token, Some(messages::STRICT_RESERVED_WORD))?;
            } else if !self.context.allow_yield {
                return Err(self.unexpected_token_error(token, None));
            }
        } else if self.context.strict && Scanner::is_strict_mode_reserved_word(&token.value) {
            self.tolerate_unexpected_token(token, Some(messages::STRICT_RESERVED_WORD))?;
        } else if (self.context.is_module || self.context.is_async) && token.value == "await" {
            self.tolerate_unexpected_token(token, None)?;
        }
        Ok(())
    }

    /// An identifier in binding position.
    pub(crate) fn parse_variable_identifier(&mut self) -> ParseResult<Identifier> {
        let start = self.start_node();
        let token = self.next_token()?;
        self.check_binding_identifier(&token)?;
        Ok(Identifier {
            name: token.value,
            meta: self.finalize(start),
        })
    }

    fn check_lexical_name(&mut self, token: &RawToken, kind: Option<VariableKind>) -> ParseResult<()> {
        if token.is_contextual("let") && matches!(kind, Some(VariableKind::Let | VariableKind::Const)) {
            self.tolerate_unexpected_token(token, Some(messages::LET_IN_LEXICAL_BINDING))?;
        }
        Ok(())
    }

    /// `...pattern` inside an array or object pattern.
    fn parse_binding_rest_element(
        &mut self,
        params: &mut Vec<RawToken>,
        kind: Option<VariableKind>,
    ) -> ParseResult<RestElement> {
        let start = self.start_node();
        self.expect_punctuator("...")?;
        let argument = self.parse_pattern(params, kind)?;
        Ok(RestElement {
            argument,
            meta: self.finalize(start),
        })
    }

    /// `...pattern` as the last formal parameter.
    pub(crate) fn parse_rest_element(&mut self, params: &mut Vec<RawToken>) -> ParseResult<RestElement> {
        let start = self.start_node();
        self.expect_punctuator("...")?;
        let argument = self.parse_pattern(params, None)?;
        if self.check_punctuator("=") {
            return Err(self.throw_error(messages::DEFAULT_REST_PARAMETER, &[]));
        }
        if !self.check_punctuator(")") {
            return Err(self.throw_error(messages::PARAMETER_AFTER_REST_PARAMETER, &[]));
        }
        Ok(RestElement {
            argument,
            meta: self.finalize(start),
        })
    }

    fn parse_array_pattern(
        &mut self,
        params: &mut Vec<RawToken>,
        kind: Option<VariableKind>,
    ) -> ParseResult<Pattern> {
        let start = self.start_node();
        self.expect_punctuator("[")?;
        let mut elements = Vec::new();
        while !self.check_punctuator("]") {
            if self.check_punctuator(",") {
                self.next_token()?;
                elements.push(None);
                continue;
            }
            if self.check_punctuator("...") {
                let rest = self.parse_binding_rest_element(params, kind)?;
                elements.push(Some(Pattern::Rest(Box::new(rest))));
                break;
            }
            elements.push(Some(self.parse_pattern_with_default(params, kind)?));
            self.expect_comma_unless("]")?;
        }
        self.expect_punctuator("]")?;
        Ok(Pattern::Array(Box::new(ArrayPattern {
            elements,
            meta: self.finalize(start),
        })))
    }

    fn parse_property_pattern(
        &mut self,
        params: &mut Vec<RawToken>,
        kind: Option<VariableKind>,
    ) -> ParseResult<AssignmentProperty> {
        let start = self.start_node();
        let mut computed = false;
        let mut shorthand = false;

        let (key, value) = if self.lookahead.kind == TokenKind::Identifier {
            let key_token = self.next_token()?;
            let key = Identifier {
                name: key_token.value.clone(),
                meta: self.finalize(start),
            };
            if self.check_punctuator("=") {
                self.check_binding_identifier(&key_token)?;
                self.check_lexical_name(&key_token, kind)?;
                params.push(key_token);
                shorthand = true;
                self.next_token()?;
                let right = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
                let value = Pattern::Assignment(Box::new(AssignmentPattern {
                    left: Pattern::Identifier(Box::new(key.clone())),
                    right,
                    meta: self.finalize(start),
                }));
                (Expression::Identifier(Box::new(key)), value)
            } else if !self.check_punctuator(":") {
                self.check_binding_identifier(&key_token)?;
                self.check_lexical_name(&key_token, kind)?;
                params.push(key_token);
                shorthand = true;
                let value = Pattern::Identifier(Box::new(key.clone()));
                (Expression::Identifier(Box::new(key)), value)
            } else {
                self.expect_punctuator(":")?;
                let value = self.parse_pattern_with_default(params, kind)?;
                (Expression::Identifier(Box::new(key)), value)
            }
        } else {
            computed = self.check_punctuator("[");
            let key = self.parse_object_property_key()?;
            self.expect_punctuator(":")?;
            let value = self.parse_pattern_with_default(params, kind)?;
            (key, value)
        };

        Ok(AssignmentProperty {
            key,
            computed,
            value,
            kind: PropertyKind::Init,
            method: false,
            shorthand,
            meta: self.finalize(start),
        })
    }

    fn parse_object_pattern(
        &mut self,
        params: &mut Vec<RawToken>,
        kind: Option<VariableKind>,
    ) -> ParseResult<Pattern> {
        let start = self.start_node();
        self.expect_punctuator("{")?;
        let mut properties = Vec::new();
        while !self.check_punctuator("}") {
            let property = if self.check_punctuator("...") {
                ObjectPatternProperty::Rest(Box::new(self.parse_binding_rest_element(params, kind)?))
            } else {
                ObjectPatternProperty::Property(Box::new(self.parse_property_pattern(params, kind)?))
            };
            properties.push(property);
            self.expect_comma_unless("}")?;
        }
        self.expect_punctuator("}")?;
        Ok(Pattern::Object(Box::new(ObjectPattern {
            properties,
            meta: self.finalize(start),
        })))
    }

    /// Identifier, array pattern or object pattern. Bound identifier tokens are
    /// appended to `params`.
    pub(crate) fn parse_pattern(
        &mut self,
        params: &mut Vec<RawToken>,
        kind: Option<VariableKind>,
    ) -> ParseResult<Pattern> {
        if self.check_punctuator("[") {
            return self.parse_array_pattern(params, kind);
        }
        if self.check_punctuator("{") {
            return self.parse_object_pattern(params, kind);
        }
        let token = self.lookahead.clone();
        self.check_lexical_name(&token, kind)?;
        params.push(token);
        Ok(Pattern::Identifier(Box::new(self.parse_variable_identifier()?)))
    }

    pub(crate) fn parse_pattern_with_default(
        &mut self,
        params: &mut Vec<RawToken>,
        kind: Option<VariableKind>,
    ) -> ParseResult<Pattern> {
        let start = self.start_node();
        let pattern = self.parse_pattern(params, kind)?;
        if !self.check_punctuator("=") {
            return Ok(pattern);
        }
        self.next_token()?;
        let previous_allow_yield = self.context.allow_yield;
        self.context.allow_yield = true;
        let right = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
        self.context.allow_yield = previous_allow_yield;
        Ok(Pattern::Assignment(Box::new(AssignmentPattern {
            left: pattern,
            right,
            meta: self.finalize(start),
        })))
    }

    // Formal parameters

    fn validate_param(&self, formals: &mut FormalParameters, pos: SourcePosition, name: &str) {
        let duplicate = formals.param_set.contains(name);
        if self.context.strict {
            if Scanner::is_restricted_word(name) {
                formals.stricted = Some(pos);
                formals.message = Some(messages::STRICT_PARAM_NAME);
            }
            if duplicate {
                formals.stricted = Some(pos);
                formals.message = Some(messages::STRICT_PARAM_DUPE);
            }
        } else if formals.first_restricted.is_none() {
            if Scanner::is_restricted_word(name) {
                formals.first_restricted = Some(pos);
                formals.message = Some(messages::STRICT_PARAM_NAME);
            } else if Scanner::is_strict_mode_reserved_word(name) {
                formals.first_restricted = Some(pos);
                formals.message = Some(messages::STRICT_RESERVED_WORD);
            } else if duplicate {
                formals.stricted = Some(pos);
                formals.message = Some(messages::STRICT_PARAM_DUPE);
            }
        }
        formals.param_set.insert(name.to_string());
    }

    /// Walk an arrow parameter and validate every bound name.
    pub(crate) fn check_pattern_param(&self, formals: &mut FormalParameters, param: &Pattern) {
        match param {
            Pattern::Identifier(id) => self.validate_param(formals, id.meta.span.start, &id.name),
            Pattern::Rest(rest) => self.check_pattern_param(formals, &rest.argument),
            Pattern::Assignment(assign) => self.check_pattern_param(formals, &assign.left),
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.check_pattern_param(formals, element);
                }
            }
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternProperty::Property(property) => {
                            self.check_pattern_param(formals, &property.value)
                        }
                        ObjectPatternProperty::Rest(rest) => {
                            self.check_pattern_param(formals, &rest.argument)
                        }
                    }
                }
            }
            Pattern::Member(_) => {}
        }
        formals.simple &= matches!(param, Pattern::Identifier(_));
    }

    /// Report parameter violations once the body has settled the strictness.
    pub(crate) fn check_strict_formals(&mut self, formals: &FormalParameters) -> ParseResult<()> {
        if !self.context.strict {
            return Ok(());
        }
        let message = formals.message.unwrap_or(messages::STRICT_PARAM_NAME);
        if let Some(pos) = formals.first_restricted {
            return Err(self.error_at(pos, message, &[]));
        }
        if let Some(pos) = formals.stricted {
            self.tolerate_at(pos, message, &[])?;
        }
        Ok(())
    }

    fn parse_formal_parameter(&mut self, formals: &mut FormalParameters) -> ParseResult<()> {
        let mut params = Vec::new();
        let param = if self.check_punctuator("...") {
            Pattern::Rest(Box::new(self.parse_rest_element(&mut params)?))
        } else {
            self.parse_pattern_with_default(&mut params, None)?
        };
        for token in &params {
            self.validate_param(formals, token.start, &token.value);
        }
        formals.simple &= matches!(param, Pattern::Identifier(_));
        formals.params.push(param);
        Ok(())
    }

    pub(crate) fn parse_formal_parameters(&mut self, formals: FormalParameters) -> ParseResult<FormalParameters> {
        let mut formals = formals;
        self.expect_punctuator("(")?;
        while !self.check_punctuator(")") && self.lookahead.kind != TokenKind::EOF {
            self.parse_formal_parameter(&mut formals)?;
            self.expect_comma_unless(")")?;
        }
        self.expect_punctuator(")")?;
        Ok(formals)
    }

    /// `{ body }` of a function, with its own directive prologue and label scope.
    pub(crate) fn parse_function_source_elements(&mut self) -> ParseResult<BlockStatement> {
        let start = self.start_node();
        self.expect_punctuator("{")?;

        let previous_label_set = std::mem::take(&mut self.context.label_set);
        let previous_label_chain = std::mem::take(&mut self.context.label_chain);
        let previous_in_iteration = self.context.in_iteration;
        let previous_in_switch = self.context.in_switch;
        let previous_in_function_body = self.context.in_function_body;
        self.context.in_iteration = false;
        self.context.in_switch = false;
        self.context.in_function_body = true;

        let mut body = Vec::new();
        self.parse_directive_prologues(&mut body)?;
        while self.lookahead.kind != TokenKind::EOF && !self.check_punctuator("}") {
            self.parse_recovering(&mut body, |parser| parser.parse_statement_list_item())?;
        }
        self.expect_punctuator("}")?;

        self.context.label_set = previous_label_set;
        self.context.label_chain = previous_label_chain;
        self.context.in_iteration = previous_in_iteration;
        self.context.in_switch = previous_in_switch;
        self.context.in_function_body = previous_in_function_body;

        Ok(BlockStatement {
            body,
            meta: self.finalize(start),
        })
    }

    // Functions

    fn parse_function(&mut self, is_declaration: bool, identifier_optional: bool) -> ParseResult<FunctionParts> {
        let is_async = self.check_contextual("async");
        if is_async {
            self.next_token()?;
        }
        self.expect_keyword("function")?;
        let generator = self.consume_punctuator("*")?;

        let previous_allow_yield = self.context.allow_yield;
        let previous_await = self.context.is_async;
        if !is_declaration {
            self.context.is_async = is_async;
            self.context.allow_yield = !generator;
        }

        let mut formals = FormalParameters::new();
        let mut id = None;
        if !(identifier_optional && self.check_punctuator("(")) {
            let token = self.lookahead.clone();
            id = Some(self.parse_variable_identifier()?);
            if self.context.strict {
                if Scanner::is_restricted_word(&token.value) {
                    self.tolerate_unexpected_token(&token, Some(messages::STRICT_FUNCTION_NAME))?;
                }
            } else if Scanner::is_restricted_word(&token.value) {
                formals.first_restricted = Some(token.start);
                formals.message = Some(messages::STRICT_FUNCTION_NAME);
            } else if Scanner::is_strict_mode_reserved_word(&token.value) {
                formals.first_restricted = Some(token.start);
                formals.message = Some(messages::STRICT_RESERVED_WORD);
            }
        }

        self.context.is_async = is_async;
        self.context.allow_yield = !generator;
        let formals = self.parse_formal_parameters(formals)?;

        let previous_strict = self.context.strict;
        let previous_allow_strict_directive = self.context.allow_strict_directive;
        self.context.allow_strict_directive = formals.simple;
        let body = self.parse_function_source_elements()?;
        self.check_strict_formals(&formals)?;

        self.context.strict = previous_strict;
        self.context.allow_strict_directive = previous_allow_strict_directive;
        self.context.allow_yield = previous_allow_yield;
        self.context.is_async = previous_await;

        Ok(FunctionParts {
            id,
            params: formals.params,
            body,
            generator,
            is_async,
        })
    }

    /// `function` or `async function` in statement position.
    pub(crate) fn parse_function_declaration(&mut self, identifier_optional: bool) -> ParseResult<FunctionDeclaration> {
        let start = self.start_node();
        let parts = self.parse_function(true, identifier_optional)?;
        Ok(FunctionDeclaration {
            id: parts.id,
            params: parts.params,
            body: parts.body,
            generator: parts.generator,
            expression: false,
            is_async: parts.is_async,
            meta: self.finalize(start),
        })
    }

    pub(crate) fn parse_function_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let parts = self.parse_function(false, true)?;
        Ok(Expression::Function(Box::new(FunctionExpression {
            id: parts.id,
            params: parts.params,
            body: parts.body,
            generator: parts.generator,
            expression: false,
            is_async: parts.is_async,
            meta: self.finalize(start),
        })))
    }

    // Methods

    /// Parameters and body of a method; the function node starts at `(`.
    pub(crate) fn parse_method_function(&mut self, is_async: bool, generator: bool) -> ParseResult<FunctionExpression> {
        let start = self.start_node();
        let previous_allow_yield = self.context.allow_yield;
        let previous_await = self.context.is_async;
        self.context.allow_yield = !generator;
        self.context.is_async = is_async;

        let formals = self.parse_formal_parameters(FormalParameters::new())?;

        self.context.is_assignment_target = false;
        self.context.is_binding_element = false;
        let previous_strict = self.context.strict;
        let previous_allow_strict_directive = self.context.allow_strict_directive;
        self.context.allow_strict_directive = formals.simple;
        let body = self.isolate_cover_grammar(|parser| parser.parse_function_source_elements())?;
        self.check_strict_formals(&formals)?;
        self.context.strict = previous_strict;
        self.context.allow_strict_directive = previous_allow_strict_directive;

        self.context.allow_yield = previous_allow_yield;
        self.context.is_async = previous_await;

        Ok(FunctionExpression {
            id: None,
            params: formals.params,
            body,
            generator,
            expression: false,
            is_async,
            meta: self.finalize(start),
        })
    }

    pub(crate) fn parse_getter_method(&mut self) -> ParseResult<FunctionExpression> {
        let start = self.start_node();
        let method = self.parse_method_function(false, false)?;
        if !method.params.is_empty() {
            self.tolerate_at(start, messages::BAD_GETTER_ARITY, &[])?;
        }
        Ok(method)
    }

    pub(crate) fn parse_setter_method(&mut self) -> ParseResult<FunctionExpression> {
        let start = self.start_node();
        let method = self.parse_method_function(false, false)?;
        if method.params.len() != 1 {
            self.tolerate_at(start, messages::BAD_SETTER_ARITY, &[])?;
        } else if matches!(method.params[0], Pattern::Rest(_)) {
            self.tolerate_at(start, messages::BAD_SETTER_REST_PARAMETER, &[])?;
        }
        Ok(method)
    }

    // Classes

    fn parse_class_element(&mut self, has_constructor: &mut bool) -> ParseResult<MethodDefinition> {
        let start = self.start_node();
        let mut token = self.lookahead.clone();
        let mut key = None;
        let mut computed = false;
        let mut is_static = false;
        let mut is_async = false;
        let mut generator = false;

        if self.check_punctuator("*") {
            self.next_token()?;
        } else {
            computed = self.check_punctuator("[");
            let static_keyword = !computed && token.is_contextual("static");
            key = Some(self.parse_object_property_key()?);
            if static_keyword
                && (Self::is_property_key_start(&self.lookahead) || self.check_punctuator("*"))
            {
                token = self.lookahead.clone();
                is_static = true;
                computed = self.check_punctuator("[");
                if self.check_punctuator("*") {
                    self.next_token()?;
                    key = None;
                } else {
                    key = Some(self.parse_object_property_key()?);
                }
            }
            if token.is_contextual("async")
                && !token.escaped
                && !computed
                && !self.has_line_terminator
                && key.is_some()
                && !self.check_punctuator("(")
                && !self.check_punctuator(":")
            {
                is_async = true;
                generator = self.consume_punctuator("*")?;
                token = self.lookahead.clone();
                computed = self.check_punctuator("[");
                key = Some(self.parse_object_property_key()?);
                if token.is_contextual("constructor") {
                    self.tolerate_unexpected_token(&token, Some(messages::CONSTRUCTOR_IS_ASYNC))?;
                }
            }
        }

        let lookahead_is_key = Self::is_property_key_start(&self.lookahead);
        let mut kind = None;
        let mut value = None;
        if token.kind == TokenKind::Identifier && !is_async && lookahead_is_key {
            if token.value == "get" {
                computed = self.check_punctuator("[");
                key = Some(self.parse_object_property_key()?);
                value = Some(self.parse_getter_method()?);
                kind = Some(MethodKind::Get);
            } else if token.value == "set" {
                computed = self.check_punctuator("[");
                key = Some(self.parse_object_property_key()?);
                value = Some(self.parse_setter_method()?);
                kind = Some(MethodKind::Set);
            }
        } else if token.is_punctuator("*") && lookahead_is_key {
            computed = self.check_punctuator("[");
            key = Some(self.parse_object_property_key()?);
            value = Some(self.parse_method_function(false, true)?);
            kind = Some(MethodKind::Method);
        }
        if kind.is_none() && key.is_some() && self.check_punctuator("(") {
            value = Some(self.parse_method_function(is_async, generator)?);
            kind = Some(MethodKind::Method);
        }

        let (Some(mut kind), Some(key), Some(value)) = (kind, key, value) else {
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, None));
        };

        if !computed {
            if is_static && Self::is_property_key(&key, "prototype") {
                return Err(self.unexpected_token_error(&token, Some(messages::STATIC_PROTOTYPE)));
            }
            if !is_static && Self::is_property_key(&key, "constructor") {
                if kind != MethodKind::Method || value.generator {
                    return Err(
                        self.unexpected_token_error(&token, Some(messages::CONSTRUCTOR_SPECIAL_METHOD))
                    );
                }
                if *has_constructor {
                    return Err(self.unexpected_token_error(&token, Some(messages::DUPLICATE_CONSTRUCTOR)));
                }
                *has_constructor = true;
                kind = MethodKind::Constructor;
            }
        }

        Ok(MethodDefinition {
            key,
            computed,
            value,
            kind,
            is_static,
            meta: self.finalize(start),
        })
    }

    fn parse_class_body(&mut self) -> ParseResult<ClassBody> {
        let start = self.start_node();
        let mut body = Vec::new();
        let mut has_constructor = false;
        self.expect_punctuator("{")?;
        while !self.check_punctuator("}") {
            if self.check_punctuator(";") {
                self.next_token()?;
            } else {
                body.push(self.parse_class_element(&mut has_constructor)?);
            }
        }
        self.expect_punctuator("}")?;
        Ok(ClassBody {
            body,
            meta: self.finalize(start),
        })
    }

    /// Class code is always strict.
    fn parse_class(&mut self, identifier_optional: bool) -> ParseResult<ClassParts> {
        let previous_strict = self.context.strict;
        self.context.strict = true;
        self.expect_keyword("class")?;

        let id = if identifier_optional && self.lookahead.kind != TokenKind::Identifier {
            None
        } else {
            Some(self.parse_variable_identifier()?)
        };
        let super_class = if self.check_keyword("extends") {
            self.next_token()?;
            Some(self.isolate_cover_grammar(|parser| parser.parse_left_hand_side_expression_allow_call())?)
        } else {
            None
        };
        let body = self.parse_class_body()?;

        self.context.strict = previous_strict;
        Ok(ClassParts { id, super_class, body })
    }

    pub(crate) fn parse_class_declaration(&mut self, identifier_optional: bool) -> ParseResult<ClassDeclaration> {
        let start = self.start_node();
        let parts = self.parse_class(identifier_optional)?;
        Ok(ClassDeclaration {
            id: parts.id,
            super_class: parts.super_class,
            body: parts.body,
            meta: self.finalize(start),
        })
    }

    pub(crate) fn parse_class_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_node();
        let parts = self.parse_class(true)?;
        Ok(Expression::Class(Box::new(ClassExpression {
            id: parts.id,
            super_class: parts.super_class,
            body: parts.body,
            meta: self.finalize(start),
        })))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expression, MethodKind, Node, Pattern, Statement};
    use crate::options::{Options, SourceType};
    use crate::parser::Parser;

    fn parse(source: &str) -> Vec<Statement> {
        Parser::new(source, Options::default()).parse_program().unwrap().body
    }

    fn error(source: &str) -> String {
        Parser::new(source, Options::default())
            .parse_program()
            .unwrap_err()
            .description
    }

    #[test]
    fn test_function_declaration_shape() {
        let body = parse("async function* f(a, b = 1, ...c) { yield a; }");
        let Statement::FunctionDeclaration(function) = &body[0] else {
            panic!("expected function declaration");
        };
        assert!(function.is_async && function.generator);
        assert_eq!(function.id.as_ref().unwrap().name, "f");
        assert_eq!(function.params.len(), 3);
        assert!(matches!(function.params[2], Pattern::Rest(_)));
    }

    #[test]
    fn test_sloppy_duplicate_params_allowed() {
        parse("function f(a, a) {}");
        assert_eq!(
            error("function f(a, a) { 'use strict' }"),
            "Strict mode function may not have duplicate parameter names"
        );
    }

    #[test]
    fn test_strict_function_name() {
        assert_eq!(
            error("function eval() { 'use strict'; }"),
            "Function name may not be eval or arguments in strict mode"
        );
    }

    #[test]
    fn test_use_strict_with_non_simple_params() {
        assert_eq!(
            error("function f(a = 1) { 'use strict'; }"),
            "Illegal 'use strict' directive in function with non-simple parameter list"
        );
    }

    #[test]
    fn test_rest_parameter_must_be_last() {
        assert_eq!(
            error("function f(...a, b) {}"),
            "Rest parameter must be last formal parameter"
        );
    }

    #[test]
    fn test_yield_in_generator_params() {
        assert_eq!(error("function* g(yield) {}"), "Unexpected identifier");
    }

    #[test]
    fn test_class_members() {
        let body = parse(
            "class A extends B { constructor() { super(); } static s() {} get x() { return 1 } set x(v) {} *g() {} async m() {} }",
        );
        let Statement::ClassDeclaration(class) = &body[0] else {
            panic!("expected class");
        };
        assert!(class.super_class.is_some());
        let kinds: Vec<_> = class.body.body.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MethodKind::Constructor,
                MethodKind::Method,
                MethodKind::Get,
                MethodKind::Set,
                MethodKind::Method,
                MethodKind::Method,
            ]
        );
        assert!(class.body.body[1].is_static);
        assert!(class.body.body[4].value.generator);
        assert!(class.body.body[5].value.is_async);
    }

    #[test]
    fn test_class_errors() {
        assert_eq!(
            error("class A { constructor() {} constructor() {} }"),
            "A class may only have one constructor"
        );
        assert_eq!(
            error("class A { get constructor() {} }"),
            "Class constructor may not be an accessor"
        );
        assert_eq!(
            error("class A { static prototype() {} }"),
            "Classes may not have static property named prototype"
        );
    }

    #[test]
    fn test_accessor_arity() {
        assert_eq!(
            error("({ get a(x) {} })"),
            "Getter must not have any formal parameters"
        );
        assert_eq!(
            error("({ set a() {} })"),
            "Setter must have exactly one formal parameter"
        );
    }

    #[test]
    fn test_class_body_is_strict() {
        assert_eq!(
            error("class A { m() { with (a) {} } }"),
            "Strict mode code may not include a with statement"
        );
    }

    #[test]
    fn test_function_expression_name_and_span() {
        let body = parse("(function named() {})");
        let Statement::Expression(stmt) = &body[0] else {
            panic!("expected expression");
        };
        let Expression::Function(function) = &stmt.expression else {
            panic!("expected function");
        };
        assert_eq!(function.meta().span.start.offset, 1);
        assert_eq!(function.id.as_ref().unwrap().name, "named");
    }

    #[test]
    fn test_await_reserved_in_module_binding() {
        let options = Options::new().with_source_type(SourceType::Module);
        let err = Parser::new("var await;", options).parse_program().unwrap_err();
        assert_eq!(err.description, "Unexpected identifier");
    }
}
