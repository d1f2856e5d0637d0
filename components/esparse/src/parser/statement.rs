//! Statement and declaration productions.

use super::{ParseResult, Parser};
use crate::ast::{
    BlockStatement, BreakStatement, CatchClause, ContinueStatement, DebuggerStatement,
    DoWhileStatement, EmptyStatement, Expression, ExpressionStatement, ForInLeft, ForInStatement,
    ForInit, ForOfStatement, ForStatement, IfStatement, LabeledStatement, Pattern,
    ReturnStatement, SequenceExpression, Statement, SwitchCase, SwitchStatement, ThrowStatement,
    TryStatement, VariableDeclaration, VariableDeclarator, VariableKind, WhileStatement,
    WithStatement,
};
use crate::messages;
use crate::scanner::Scanner;
use crate::token::{RawToken, TokenKind};
use core_types::SourcePosition;
use std::collections::HashSet;

impl<'a> Parser<'a> {
    // Directives

    fn parse_directive(&mut self) -> ParseResult<Statement> {
        let token = self.lookahead.clone();
        let start = self.start_node();
        let expression = self.parse_expression()?;
        let directive = match expression {
            Expression::Literal(_) => {
                let text = self.token_text(&token);
                Some(text.get(1..text.len().saturating_sub(1)).unwrap_or_default().to_string())
            }
            _ => None,
        };
        self.consume_semicolon()?;
        Ok(Statement::Expression(Box::new(ExpressionStatement {
            expression,
            directive,
            meta: self.finalize(start),
        })))
    }

    /// Leading string-literal statements of a script or function body.
    ///
    /// `"use strict"` switches the context to strict mode and reports an
    /// octal literal already seen earlier in the same prologue.
    pub(crate) fn parse_directive_prologues(&mut self, body: &mut Vec<Statement>) -> ParseResult<()> {
        let mut first_restricted: Option<RawToken> = None;
        while self.lookahead.kind == TokenKind::StringLiteral {
            let token = self.lookahead.clone();
            let mut directive = None;
            self.parse_recovering(body, |parser| {
                let mut statement = parser.parse_directive()?;
                if let Statement::Expression(expression) = &statement {
                    directive = expression.directive.clone();
                }
                parser.deliver(&mut statement);
                Ok(statement)
            })?;

            let Some(directive) = directive else {
                break;
            };

            if directive == "use strict" {
                self.context.strict = true;
                if let Some(octal) = first_restricted.take() {
                    self.tolerate_unexpected_token(&octal, Some(messages::STRICT_OCTAL_LITERAL))?;
                }
                if !self.context.allow_strict_directive {
                    self.tolerate_unexpected_token(&token, Some(messages::ILLEGAL_LANGUAGE_MODE_DIRECTIVE))?;
                }
            } else if first_restricted.is_none() && token.octal {
                first_restricted = Some(token);
            }
        }
        Ok(())
    }

    // Statement lists

    /// `let` starts a declaration when a binding follows it.
    fn is_lexical_declaration(&mut self) -> bool {
        self.peek_next_token().is_some_and(|next| {
            next.kind == TokenKind::Identifier || next.is_punctuator("[") || next.is_punctuator("{")
        })
    }

    pub(crate) fn parse_statement_list_item(&mut self) -> ParseResult<Statement> {
        let mut statement = self.parse_declaration_or_statement()?;
        self.deliver(&mut statement);
        Ok(statement)
    }

    fn parse_declaration_or_statement(&mut self) -> ParseResult<Statement> {
        self.context.is_assignment_target = true;
        self.context.is_binding_element = true;

        let module_item = self.check_keyword("export")
            || (self.check_keyword("import") && !self.match_import_call() && !self.match_import_meta());
        if module_item {
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, None));
        }
        if self.check_contextual("let") && self.is_lexical_declaration() {
            let declaration = self.parse_lexical_declaration()?;
            return Ok(Statement::VariableDeclaration(Box::new(declaration)));
        }
        if self.match_async_function() {
            let declaration = self.parse_function_declaration(false)?;
            return Ok(Statement::FunctionDeclaration(Box::new(declaration)));
        }

        match self.lookahead.kind {
            TokenKind::Keyword => match self.lookahead.value.as_str() {
                "const" => Ok(Statement::VariableDeclaration(Box::new(
                    self.parse_lexical_declaration()?,
                ))),
                "function" => Ok(Statement::FunctionDeclaration(Box::new(
                    self.parse_function_declaration(false)?,
                ))),
                "class" => Ok(Statement::ClassDeclaration(Box::new(
                    self.parse_class_declaration(false)?,
                ))),
                _ => self.parse_statement_kind(),
            },
            _ => self.parse_statement_kind(),
        }
    }

    /// Statements until the closing `}` of a block, recovering per statement.
    fn parse_statement_list_until_brace(&mut self) -> ParseResult<Vec<Statement>> {
        let mut body = Vec::new();
        while self.lookahead.kind != TokenKind::EOF && !self.check_punctuator("}") {
            self.parse_recovering(&mut body, |parser| parser.parse_statement_list_item())?;
        }
        Ok(body)
    }

    pub(crate) fn parse_block(&mut self) -> ParseResult<BlockStatement> {
        let start = self.start_node();
        self.expect_punctuator("{")?;
        let body = self.parse_statement_list_until_brace()?;
        self.expect_punctuator("}")?;
        Ok(BlockStatement {
            body,
            meta: self.finalize(start),
        })
    }

    // Variable declarations

    fn parse_variable_declarator(&mut self, kind: VariableKind, in_for: bool) -> ParseResult<VariableDeclarator> {
        let start = self.start_node();
        let mut params = Vec::new();
        let id = self.parse_pattern(&mut params, Some(kind))?;

        if self.context.strict {
            if let Pattern::Identifier(ident) = &id {
                if Scanner::is_restricted_word(&ident.name) {
                    self.tolerate_error(messages::STRICT_VAR_NAME, &[])?;
                }
            }
        }

        let for_head = in_for && (self.check_keyword("in") || self.check_contextual("of"));
        let init = if self.check_punctuator("=") {
            self.next_token()?;
            Some(self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?)
        } else if kind == VariableKind::Const && !for_head {
            return Err(self.throw_error(messages::DECLARATION_MISSING_INITIALIZER, &["const"]));
        } else if !matches!(id, Pattern::Identifier(_)) && !in_for {
            self.expect_punctuator("=")?;
            None
        } else {
            None
        };

        Ok(VariableDeclarator {
            id,
            init,
            meta: self.finalize(start),
        })
    }

    fn parse_declarator_list(&mut self, kind: VariableKind, in_for: bool) -> ParseResult<Vec<VariableDeclarator>> {
        let mut list = vec![self.parse_variable_declarator(kind, in_for)?];
        while self.consume_punctuator(",")? {
            list.push(self.parse_variable_declarator(kind, in_for)?);
        }
        Ok(list)
    }

    pub(crate) fn parse_variable_statement(&mut self) -> ParseResult<VariableDeclaration> {
        let start = self.start_node();
        self.expect_keyword("var")?;
        let declarations = self.parse_declarator_list(VariableKind::Var, false)?;
        self.consume_semicolon()?;
        Ok(VariableDeclaration {
            declarations,
            kind: VariableKind::Var,
            meta: self.finalize(start),
        })
    }

    /// `let` or `const` declaration in a statement list.
    pub(crate) fn parse_lexical_declaration(&mut self) -> ParseResult<VariableDeclaration> {
        let start = self.start_node();
        let token = self.next_token()?;
        let kind = if token.value == "const" {
            VariableKind::Const
        } else {
            VariableKind::Let
        };
        let declarations = self.parse_declarator_list(kind, false)?;
        self.consume_semicolon()?;
        Ok(VariableDeclaration {
            declarations,
            kind,
            meta: self.finalize(start),
        })
    }

    // Statements

    /// A statement in a position where declarations are not allowed.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let mut statement = self.parse_statement_kind()?;
        self.deliver(&mut statement);
        Ok(statement)
    }

    fn parse_statement_kind(&mut self) -> ParseResult<Statement> {
        let labels = std::mem::take(&mut self.context.label_chain);
        match self.lookahead.kind {
            TokenKind::Punctuator => match self.lookahead.value.as_str() {
                "{" => Ok(Statement::Block(Box::new(self.parse_block()?))),
                ";" => {
                    let start = self.start_node();
                    self.next_token()?;
                    Ok(Statement::Empty(Box::new(EmptyStatement {
                        meta: self.finalize(start),
                    })))
                }
                _ => self.parse_expression_statement(),
            },
            TokenKind::Identifier => {
                if self.match_async_function() {
                    Ok(Statement::FunctionDeclaration(Box::new(
                        self.parse_function_declaration(false)?,
                    )))
                } else {
                    self.parse_labelled_statement(labels)
                }
            }
            TokenKind::Keyword => match self.lookahead.value.as_str() {
                "break" => self.parse_break_statement(),
                "continue" => self.parse_continue_statement(),
                "debugger" => {
                    let start = self.start_node();
                    self.next_token()?;
                    self.consume_semicolon()?;
                    Ok(Statement::Debugger(Box::new(DebuggerStatement {
                        meta: self.finalize(start),
                    })))
                }
                "do" => self.parse_do_while_statement(&labels),
                "for" => self.parse_for_statement(&labels),
                "function" => Ok(Statement::FunctionDeclaration(Box::new(
                    self.parse_function_declaration(false)?,
                ))),
                "if" => self.parse_if_statement(),
                "return" => self.parse_return_statement(),
                "switch" => self.parse_switch_statement(),
                "throw" => self.parse_throw_statement(),
                "try" => self.parse_try_statement(),
                "var" => Ok(Statement::VariableDeclaration(Box::new(
                    self.parse_variable_statement()?,
                ))),
                "while" => self.parse_while_statement(&labels),
                "with" => self.parse_with_statement(),
                _ => self.parse_expression_statement(),
            },
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::Expression(Box::new(ExpressionStatement {
            expression,
            directive: None,
            meta: self.finalize(start),
        })))
    }

    /// Labels directly in front of a loop may be targeted by `continue`.
    fn mark_iteration_labels(&mut self, labels: &[String]) {
        for label in labels {
            if let Some(targets_loop) = self.context.label_set.get_mut(label) {
                *targets_loop = true;
            }
        }
    }

    /// Parse a loop body with `continue` enabled.
    fn parse_iteration_body(&mut self) -> ParseResult<Statement> {
        let previous_in_iteration = self.context.in_iteration;
        self.context.in_iteration = true;
        let body = self.parse_statement();
        self.context.in_iteration = previous_in_iteration;
        body
    }

    fn parse_if_clause(&mut self) -> ParseResult<Statement> {
        if self.context.strict && self.check_keyword("function") {
            let token = self.lookahead.clone();
            self.tolerate_unexpected_token(&token, Some(messages::STRICT_FUNCTION))?;
        }
        self.parse_statement()
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("if")?;
        self.expect_punctuator("(")?;
        let test = self.parse_expression()?;
        self.expect_punctuator(")")?;
        let consequent = self.parse_if_clause()?;
        let alternate = if self.check_keyword("else") {
            self.next_token()?;
            Some(self.parse_if_clause()?)
        } else {
            None
        };
        Ok(Statement::If(Box::new(IfStatement {
            test,
            consequent,
            alternate,
            meta: self.finalize(start),
        })))
    }

    fn parse_do_while_statement(&mut self, labels: &[String]) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("do")?;
        self.mark_iteration_labels(labels);
        let body = self.parse_iteration_body()?;
        self.expect_keyword("while")?;
        self.expect_punctuator("(")?;
        let test = self.parse_expression()?;
        self.expect_punctuator(")")?;
        self.consume_punctuator(";")?;
        Ok(Statement::DoWhile(Box::new(DoWhileStatement {
            body,
            test,
            meta: self.finalize(start),
        })))
    }

    fn parse_while_statement(&mut self, labels: &[String]) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("while")?;
        self.expect_punctuator("(")?;
        let test = self.parse_expression()?;
        self.expect_punctuator(")")?;
        self.mark_iteration_labels(labels);
        let body = self.parse_iteration_body()?;
        Ok(Statement::While(Box::new(WhileStatement {
            test,
            body,
            meta: self.finalize(start),
        })))
    }

    /// Left side of `for (x in/of ...)` given as an expression.
    fn for_left_from_expression(
        &mut self,
        init: Expression,
        init_start: SourcePosition,
        message: &'static str,
    ) -> ParseResult<ForInLeft> {
        let is_target = self.context.is_assignment_target && !matches!(init, Expression::Assignment(_));
        let pattern = self
            .reinterpret_expression_as_pattern(init)
            .map_err(|_| self.error_at(init_start, message, &[]))?;
        if !is_target {
            self.tolerate_at(init_start, message, &[])?;
        }
        Ok(ForInLeft::Pattern(pattern))
    }

    fn parse_for_statement(&mut self, labels: &[String]) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("for")?;
        let is_await = if self.context.is_async && self.check_contextual("await") {
            self.next_token()?;
            true
        } else {
            false
        };
        self.expect_punctuator("(")?;

        let mut init = None;
        // Some((left, is_of)) once the head turns out to be for-in/of.
        let mut iteration_left: Option<(ForInLeft, bool)> = None;

        if self.check_punctuator(";") {
            self.next_token()?;
        } else {
            let lexical = self.check_keyword("const")
                || (self.check_contextual("let") && self.is_lexical_declaration());
            if self.check_keyword("var") || lexical {
                let decl_start = self.start_node();
                let token = self.next_token()?;
                let kind = match token.value.as_str() {
                    "var" => VariableKind::Var,
                    "const" => VariableKind::Const,
                    _ => VariableKind::Let,
                };
                let previous_allow_in = self.context.allow_in;
                self.context.allow_in = false;
                let declarations = self.parse_declarator_list(kind, true)?;
                self.context.allow_in = previous_allow_in;
                let declaration = VariableDeclaration {
                    declarations,
                    kind,
                    meta: self.finalize(decl_start),
                };

                let single = declaration.declarations.len() == 1;
                let first_init = declaration.declarations.first().map(|d| d.init.is_some());
                if single && self.check_keyword("in") {
                    if first_init == Some(true) {
                        let legacy = kind == VariableKind::Var
                            && !self.context.strict
                            && matches!(declaration.declarations[0].id, Pattern::Identifier(_));
                        if !legacy {
                            self.tolerate_error(messages::FOR_IN_OF_LOOP_INITIALIZER, &["for-in"])?;
                        }
                    }
                    self.next_token()?;
                    iteration_left = Some((ForInLeft::VariableDeclaration(Box::new(declaration)), false));
                } else if single && self.check_contextual("of") {
                    if first_init == Some(true) {
                        self.tolerate_error(messages::FOR_IN_OF_LOOP_INITIALIZER, &["for-of"])?;
                    }
                    self.next_token()?;
                    iteration_left = Some((ForInLeft::VariableDeclaration(Box::new(declaration)), true));
                } else {
                    self.expect_punctuator(";")?;
                    init = Some(ForInit::VariableDeclaration(Box::new(declaration)));
                }
            } else {
                let init_start = self.start_node();
                let previous_is_binding_element = self.context.is_binding_element;
                let previous_is_assignment_target = self.context.is_assignment_target;
                let previous_first_cover = self.context.first_cover_initialized_name_error.clone();
                let previous_allow_in = self.context.allow_in;
                self.context.allow_in = false;
                let expr = self.inherit_cover_grammar(|parser| parser.parse_assignment_expression())?;
                self.context.allow_in = previous_allow_in;

                if self.check_keyword("in") {
                    let left = self.for_left_from_expression(expr, init_start, messages::INVALID_LHS_IN_FOR_IN)?;
                    self.next_token()?;
                    iteration_left = Some((left, false));
                } else if self.check_contextual("of") {
                    let left = self.for_left_from_expression(expr, init_start, messages::INVALID_LHS_IN_FOR_LOOP)?;
                    self.next_token()?;
                    iteration_left = Some((left, true));
                } else {
                    self.context.is_binding_element = previous_is_binding_element;
                    self.context.is_assignment_target = previous_is_assignment_target;
                    self.context.first_cover_initialized_name_error = previous_first_cover;
                    if let Some(token) = self.context.first_cover_initialized_name_error.take() {
                        return Err(self.unexpected_token_error(&token, None));
                    }
                    let mut expr = expr;
                    if self.check_punctuator(",") {
                        let mut expressions = vec![expr];
                        while self.consume_punctuator(",")? {
                            expressions.push(
                                self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?,
                            );
                        }
                        expr = Expression::Sequence(Box::new(SequenceExpression {
                            expressions,
                            meta: self.finalize(init_start),
                        }));
                    }
                    self.expect_punctuator(";")?;
                    init = Some(ForInit::Expression(expr));
                }
            }
        }

        if is_await && !matches!(iteration_left, Some((_, true))) {
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, None));
        }

        match iteration_left {
            Some((left, is_of)) => {
                let right = if is_of {
                    self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?
                } else {
                    self.parse_expression()?
                };
                self.expect_punctuator(")")?;
                self.mark_iteration_labels(labels);
                let body = self.parse_iteration_body()?;
                let meta = self.finalize(start);
                if is_of {
                    Ok(Statement::ForOf(Box::new(ForOfStatement {
                        left,
                        right,
                        body,
                        is_await,
                        meta,
                    })))
                } else {
                    Ok(Statement::ForIn(Box::new(ForInStatement {
                        left,
                        right,
                        body,
                        meta,
                    })))
                }
            }
            None => {
                let test = if self.check_punctuator(";") {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect_punctuator(";")?;
                let update = if self.check_punctuator(")") {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect_punctuator(")")?;
                self.mark_iteration_labels(labels);
                let body = self.parse_iteration_body()?;
                Ok(Statement::For(Box::new(ForStatement {
                    init,
                    test,
                    update,
                    body,
                    meta: self.finalize(start),
                })))
            }
        }
    }

    /// Optional label after `break`/`continue`; it must be in scope.
    fn parse_jump_label(&mut self) -> ParseResult<Option<crate::ast::Identifier>> {
        if self.lookahead.kind != TokenKind::Identifier || self.has_line_terminator {
            return Ok(None);
        }
        let label = self.parse_variable_identifier()?;
        if !self.context.label_set.contains_key(&label.name) {
            return Err(self.throw_error(messages::UNKNOWN_LABEL, &[label.name.as_str()]));
        }
        Ok(Some(label))
    }

    fn parse_continue_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("continue")?;
        let label = self.parse_jump_label()?;
        if let Some(label) = &label {
            if self.context.label_set.get(&label.name) != Some(&true) {
                return Err(self.throw_error(messages::ILLEGAL_CONTINUE_TARGET, &[label.name.as_str()]));
            }
        }
        self.consume_semicolon()?;
        if !self.context.in_iteration {
            return Err(self.error_at(start, messages::ILLEGAL_CONTINUE, &[]));
        }
        Ok(Statement::Continue(Box::new(ContinueStatement {
            label,
            meta: self.finalize(start),
        })))
    }

    fn parse_break_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("break")?;
        let label = self.parse_jump_label()?;
        self.consume_semicolon()?;
        if label.is_none() && !self.context.in_iteration && !self.context.in_switch {
            return Err(self.error_at(start, messages::ILLEGAL_BREAK, &[]));
        }
        Ok(Statement::Break(Box::new(BreakStatement {
            label,
            meta: self.finalize(start),
        })))
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        if !self.context.in_function_body {
            self.tolerate_at(start, messages::ILLEGAL_RETURN, &[])?;
        }
        self.expect_keyword("return")?;
        let has_argument = !self.check_punctuator(";")
            && !self.check_punctuator("}")
            && !self.has_line_terminator
            && self.lookahead.kind != TokenKind::EOF;
        let argument = if has_argument {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(Statement::Return(Box::new(ReturnStatement {
            argument,
            meta: self.finalize(start),
        })))
    }

    fn parse_with_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        if self.context.strict {
            self.tolerate_at(start, messages::STRICT_MODE_WITH, &[])?;
        }
        self.expect_keyword("with")?;
        self.expect_punctuator("(")?;
        let object = self.parse_expression()?;
        self.expect_punctuator(")")?;
        let body = self.parse_statement()?;
        Ok(Statement::With(Box::new(WithStatement {
            object,
            body,
            meta: self.finalize(start),
        })))
    }

    fn parse_switch_case(&mut self) -> ParseResult<SwitchCase> {
        let start = self.start_node();
        let test = if self.check_keyword("default") {
            self.next_token()?;
            None
        } else {
            self.expect_keyword("case")?;
            Some(self.parse_expression()?)
        };
        self.expect_punctuator(":")?;

        let mut consequent = Vec::new();
        while self.lookahead.kind != TokenKind::EOF
            && !self.check_punctuator("}")
            && !self.check_keyword("default")
            && !self.check_keyword("case")
        {
            self.parse_recovering(&mut consequent, |parser| parser.parse_statement_list_item())?;
        }
        Ok(SwitchCase {
            test,
            consequent,
            meta: self.finalize(start),
        })
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("switch")?;
        self.expect_punctuator("(")?;
        let discriminant = self.parse_expression()?;
        self.expect_punctuator(")")?;

        let previous_in_switch = self.context.in_switch;
        self.context.in_switch = true;

        let mut cases = Vec::new();
        let mut default_found = false;
        self.expect_punctuator("{")?;
        while !self.check_punctuator("}") {
            let case_start = self.start_node();
            let clause = self.parse_switch_case()?;
            if clause.test.is_none() {
                if default_found {
                    return Err(self.error_at(case_start, messages::MULTIPLE_DEFAULTS_IN_SWITCH, &[]));
                }
                default_found = true;
            }
            cases.push(clause);
        }
        self.expect_punctuator("}")?;
        self.context.in_switch = previous_in_switch;

        Ok(Statement::Switch(Box::new(SwitchStatement {
            discriminant,
            cases,
            meta: self.finalize(start),
        })))
    }

    fn parse_labelled_statement(&mut self, mut labels: Vec<String>) -> ParseResult<Statement> {
        let start = self.start_node();
        let expression = self.parse_expression()?;

        let label = match expression {
            Expression::Identifier(label) if self.check_punctuator(":") => label,
            expression => {
                self.consume_semicolon()?;
                return Ok(Statement::Expression(Box::new(ExpressionStatement {
                    expression,
                    directive: None,
                    meta: self.finalize(start),
                })));
            }
        };
        self.next_token()?;

        let name = label.name.clone();
        if self.context.label_set.contains_key(&name) {
            return Err(self.throw_error(messages::REDECLARATION, &["Label", &name]));
        }
        self.context.label_set.insert(name.clone(), false);

        let body = if self.check_keyword("class") {
            let token = self.lookahead.clone();
            self.tolerate_unexpected_token(&token, None)?;
            let mut declaration =
                Statement::ClassDeclaration(Box::new(self.parse_class_declaration(false)?));
            self.deliver(&mut declaration);
            Ok(declaration)
        } else if self.check_keyword("function") {
            let token = self.lookahead.clone();
            let declaration = self.parse_function_declaration(false)?;
            if self.context.strict {
                self.tolerate_unexpected_token(&token, Some(messages::STRICT_FUNCTION))?;
            } else if declaration.generator {
                self.tolerate_unexpected_token(&token, Some(messages::GENERATOR_IN_LEGACY_CONTEXT))?;
            }
            let mut declaration = Statement::FunctionDeclaration(Box::new(declaration));
            self.deliver(&mut declaration);
            Ok(declaration)
        } else {
            labels.push(name.clone());
            self.context.label_chain = labels;
            self.parse_statement()
        };
        self.context.label_chain.clear();
        self.context.label_set.remove(&name);

        Ok(Statement::Labeled(Box::new(LabeledStatement {
            label: *label,
            body: body?,
            meta: self.finalize(start),
        })))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("throw")?;
        if self.has_line_terminator {
            return Err(self.throw_error(messages::NEWLINE_AFTER_THROW, &[]));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::Throw(Box::new(ThrowStatement {
            argument,
            meta: self.finalize(start),
        })))
    }

    fn parse_catch_clause(&mut self) -> ParseResult<CatchClause> {
        let start = self.start_node();
        self.expect_keyword("catch")?;

        let mut param = None;
        if self.consume_punctuator("(")? {
            if self.check_punctuator(")") {
                let token = self.lookahead.clone();
                return Err(self.unexpected_token_error(&token, None));
            }
            let mut params = Vec::new();
            let pattern = self.parse_pattern(&mut params, None)?;
            let mut seen = HashSet::new();
            for token in &params {
                if !seen.insert(token.value.as_str()) {
                    self.tolerate_error(messages::DUPLICATE_BINDING, &[token.value.as_str()])?;
                }
            }
            if self.context.strict {
                if let Pattern::Identifier(id) = &pattern {
                    if Scanner::is_restricted_word(&id.name) {
                        self.tolerate_error(messages::STRICT_CATCH_VARIABLE, &[])?;
                    }
                }
            }
            self.expect_punctuator(")")?;
            param = Some(pattern);
        }
        let body = self.parse_block()?;
        Ok(CatchClause {
            param,
            body,
            meta: self.finalize(start),
        })
    }

    fn parse_try_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("try")?;
        let block = self.parse_block()?;
        let handler = if self.check_keyword("catch") {
            Some(self.parse_catch_clause()?)
        } else {
            None
        };
        let finalizer = if self.check_keyword("finally") {
            self.next_token()?;
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.throw_error(messages::NO_CATCH_OR_FINALLY, &[]));
        }
        Ok(Statement::Try(Box::new(TryStatement {
            block,
            handler,
            finalizer,
            meta: self.finalize(start),
        })))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ForInLeft, Statement, VariableKind};
    use crate::options::Options;
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
    fn test_directive_prologue() {
        let body = parse("'use strict'; \"other\"; a;");
        let directives: Vec<_> = body
            .iter()
            .map(|s| match s {
                Statement::Expression(stmt) => stmt.directive.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(
            directives,
            vec![Some("use strict".to_string()), Some("other".to_string()), None]
        );
    }

    #[test]
    fn test_directive_stops_at_non_literal() {
        let body = parse("'a' + b; 'c';");
        assert!(matches!(&body[0], Statement::Expression(s) if s.directive.is_none()));
        assert!(matches!(&body[1], Statement::Expression(s) if s.directive.is_none()));
    }

    #[test]
    fn test_use_strict_enables_strict_checks() {
        assert_eq!(
            error("'use strict'; with (a) {}"),
            "Strict mode code may not include a with statement"
        );
        assert_eq!(
            error("'use strict'; var eval;"),
            "Variable name may not be eval or arguments in strict mode"
        );
        assert_eq!(
            error("'\\01'; 'use strict';"),
            "Octal literals are not allowed in strict mode."
        );
    }

    #[test]
    fn test_lexical_declarations() {
        let body = parse("let a = 1, [b] = c; const d = 2;");
        let Statement::VariableDeclaration(decl) = &body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(decl.kind, VariableKind::Let);
        assert_eq!(decl.declarations.len(), 2);
        assert_eq!(error("const a;"), "Missing initializer in const declaration");
        assert_eq!(error("let let = 1;"), "let is disallowed as a lexically bound name");
    }

    #[test]
    fn test_let_as_identifier_in_sloppy_code() {
        let body = parse("let = 1; let;");
        assert!(matches!(&body[0], Statement::Expression(_)));
    }

    #[test]
    fn test_for_variants() {
        assert!(matches!(&parse("for (;;) {}")[0], Statement::For(_)));
        assert!(matches!(&parse("for (var i = 0; i < 1; i++) {}")[0], Statement::For(_)));
        assert!(matches!(&parse("for (a in b) {}")[0], Statement::ForIn(_)));
        let body = parse("for (const [k, v] of m) {}");
        let Statement::ForOf(stmt) = &body[0] else {
            panic!("expected for-of");
        };
        assert!(matches!(stmt.left, ForInLeft::VariableDeclaration(_)));
        assert!(!stmt.is_await);
        assert!(matches!(&parse("for (let in x) {}")[0], Statement::ForIn(_)));
    }

    #[test]
    fn test_for_in_head_errors() {
        assert_eq!(
            error("for (let a = 1 of b) {}"),
            "for-of loop variable declaration may not have an initializer."
        );
        assert_eq!(error("for (a() in b) {}"), "Invalid left-hand side in for-in");
    }

    #[test]
    fn test_for_await_in_async_function() {
        let body = parse("async function f() { for await (x of y) {} }");
        let Statement::FunctionDeclaration(function) = &body[0] else {
            panic!("expected function");
        };
        assert!(matches!(&function.body.body[0], Statement::ForOf(s) if s.is_await));
    }

    #[test]
    fn test_labels_and_jumps() {
        parse("a: while (1) { continue a; }");
        parse("a: b: for (;;) { continue a; }");
        parse("a: { break a; }");
        assert_eq!(error("break;"), "Illegal break statement");
        assert_eq!(error("continue;"), "Illegal continue statement");
        assert_eq!(error("while (1) { break x; }"), "Undefined label 'x'");
        assert_eq!(
            error("a: { while (1) { continue a; } }"),
            "Illegal continue statement: 'a' does not denote an iteration statement"
        );
        assert_eq!(error("a: a: ;"), "Label 'a' has already been declared");
    }

    #[test]
    fn test_labels_do_not_leak_into_functions() {
        assert_eq!(
            error("a: while (1) { (function () { break a; }); }"),
            "Undefined label 'a'"
        );
    }

    #[test]
    fn test_return_outside_function() {
        assert_eq!(error("return 1;"), "Illegal return statement");
        parse("function f() { return\n1 }");
    }

    #[test]
    fn test_switch() {
        let body = parse("switch (a) { case 1: b; break; default: c; }");
        let Statement::Switch(stmt) = &body[0] else {
            panic!("expected switch");
        };
        assert_eq!(stmt.cases.len(), 2);
        assert_eq!(stmt.cases[0].consequent.len(), 2);
        assert_eq!(
            error("switch (a) { default: default: }"),
            "More than one default clause in switch statement"
        );
    }

    #[test]
    fn test_try_forms() {
        parse("try {} catch (e) {} finally {}");
        parse("try {} catch {}");
        assert_eq!(error("try {}"), "Missing catch or finally after try");
        assert_eq!(error("throw\n1"), "Illegal newline after throw");
    }

    #[test]
    fn test_nested_import_is_rejected() {
        assert_eq!(error("{ import a from 'a' }"), "Unexpected token import");
    }

    #[test]
    fn test_tolerant_block_recovery() {
        let options = Options::new().with_tolerant(true);
        let program = Parser::new("function f() { a b; c; }\nd;", options)
            .parse_program()
            .unwrap();
        assert_eq!(program.errors.as_ref().map(Vec::len), Some(1));
        assert_eq!(program.body.len(), 2);
        let Statement::FunctionDeclaration(function) = &program.body[0] else {
            panic!("expected function");
        };
        assert_eq!(function.body.body.len(), 1);
    }
}
