//! `import` and `export` declarations.

use super::{ParseResult, Parser};
use crate::ast::{
    Declaration, ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultValue,
    ExportNamedDeclaration, ExportSpecifier, ImportDeclaration, ImportDeclarationSpecifier,
    ImportDefaultSpecifier, ImportNamespaceSpecifier, ImportSpecifier, Literal, Statement,
};
use crate::messages;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// The string literal naming a module.
    fn parse_module_specifier(&mut self) -> ParseResult<Literal> {
        let start = self.start_node();
        if self.lookahead.kind != TokenKind::StringLiteral {
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, Some(messages::INVALID_MODULE_SPECIFIER)));
        }
        let token = self.next_token()?;
        Ok(self.literal_from_token(&token, start))
    }

    /// `from` must follow an import clause or a re-export.
    fn expect_from_clause(&mut self) -> ParseResult<()> {
        if self.check_contextual("from") {
            self.next_token()?;
            return Ok(());
        }
        let token = self.lookahead.clone();
        let message = if token.kind == TokenKind::EOF {
            messages::MISSING_FROM_CLAUSE
        } else {
            messages::UNEXPECTED_TOKEN
        };
        Err(self.error_at(token.start, message, &[token.value.as_str()]))
    }

    fn parse_import_specifier(&mut self) -> ParseResult<ImportSpecifier> {
        let start = self.start_node();
        let (imported, local) = if self.lookahead.kind == TokenKind::Identifier {
            let imported = self.parse_variable_identifier()?;
            let local = if self.check_contextual("as") {
                self.next_token()?;
                self.parse_variable_identifier()?
            } else {
                imported.clone()
            };
            (imported, local)
        } else {
            let imported = self.parse_identifier_name()?;
            if !self.check_contextual("as") {
                return Err(self.unexpected_token_error(&self.lookahead, None));
            }
            self.next_token()?;
            (imported, self.parse_variable_identifier()?)
        };
        Ok(ImportSpecifier {
            local,
            imported,
            meta: self.finalize(start),
        })
    }

    fn parse_named_imports(&mut self, specifiers: &mut Vec<ImportDeclarationSpecifier>) -> ParseResult<()> {
        self.expect_punctuator("{")?;
        while !self.check_punctuator("}") {
            let specifier = self.parse_import_specifier()?;
            specifiers.push(ImportDeclarationSpecifier::Named(Box::new(specifier)));
            self.expect_comma_unless("}")?;
        }
        self.expect_punctuator("}")
    }

    fn parse_import_namespace_specifier(&mut self) -> ParseResult<ImportDeclarationSpecifier> {
        let start = self.start_node();
        self.expect_punctuator("*")?;
        if !self.check_contextual("as") {
            return Err(self.throw_error(messages::NO_AS_AFTER_IMPORT_NAMESPACE, &[]));
        }
        self.next_token()?;
        let local = self.parse_variable_identifier()?;
        Ok(ImportDeclarationSpecifier::Namespace(Box::new(ImportNamespaceSpecifier {
            local,
            meta: self.finalize(start),
        })))
    }

    pub(crate) fn parse_import_declaration(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("import")?;

        let mut specifiers = Vec::new();
        let source = if self.lookahead.kind == TokenKind::StringLiteral {
            self.parse_module_specifier()?
        } else {
            if self.check_punctuator("{") {
                self.parse_named_imports(&mut specifiers)?;
            } else if self.check_punctuator("*") {
                specifiers.push(self.parse_import_namespace_specifier()?);
            } else if self.lookahead.kind == TokenKind::Identifier {
                let default_start = self.start_node();
                let local = self.parse_variable_identifier()?;
                specifiers.push(ImportDeclarationSpecifier::Default(Box::new(
                    ImportDefaultSpecifier {
                        local,
                        meta: self.finalize(default_start),
                    },
                )));
                if self.consume_punctuator(",")? {
                    if self.check_punctuator("*") {
                        specifiers.push(self.parse_import_namespace_specifier()?);
                    } else if self.check_punctuator("{") {
                        self.parse_named_imports(&mut specifiers)?;
                    } else {
                        let token = self.lookahead.clone();
                        return Err(self.unexpected_token_error(&token, None));
                    }
                }
            } else {
                return Err(self.unexpected_token_error(&self.lookahead, None));
            }
            self.expect_from_clause()?;
            self.parse_module_specifier()?
        };
        self.consume_semicolon()?;

        Ok(Statement::ImportDeclaration(Box::new(ImportDeclaration {
            specifiers,
            source,
            meta: self.finalize(start),
        })))
    }

    fn parse_export_specifier(&mut self) -> ParseResult<ExportSpecifier> {
        let start = self.start_node();
        let local = self.parse_identifier_name()?;
        let exported = if self.check_contextual("as") {
            self.next_token()?;
            self.parse_identifier_name()?
        } else {
            local.clone()
        };
        Ok(ExportSpecifier {
            local,
            exported,
            meta: self.finalize(start),
        })
    }

    fn parse_export_default(&mut self, start: core_types::SourcePosition) -> ParseResult<Statement> {
        self.next_token()?;
        let declaration = if self.check_keyword("function") || self.match_async_function() {
            ExportDefaultValue::Function(Box::new(self.parse_function_declaration(true)?))
        } else if self.check_keyword("class") {
            ExportDefaultValue::Class(Box::new(self.parse_class_declaration(true)?))
        } else {
            if self.check_contextual("from") {
                let token = self.lookahead.clone();
                return Err(self.unexpected_token_error(&token, None));
            }
            let expression = self.isolate_cover_grammar(|parser| parser.parse_assignment_expression())?;
            self.consume_semicolon()?;
            ExportDefaultValue::Expression(expression)
        };
        Ok(Statement::ExportDefaultDeclaration(Box::new(ExportDefaultDeclaration {
            declaration,
            meta: self.finalize(start),
        })))
    }

    fn parse_export_all(&mut self, start: core_types::SourcePosition) -> ParseResult<Statement> {
        self.expect_punctuator("*")?;
        let exported = if self.check_contextual("as") {
            self.next_token()?;
            Some(self.parse_identifier_name()?)
        } else {
            None
        };
        self.expect_from_clause()?;
        let source = self.parse_module_specifier()?;
        self.consume_semicolon()?;
        Ok(Statement::ExportAllDeclaration(Box::new(ExportAllDeclaration {
            source,
            exported,
            meta: self.finalize(start),
        })))
    }

    fn parse_export_named_specifiers(&mut self, start: core_types::SourcePosition) -> ParseResult<Statement> {
        let mut specifiers = Vec::new();
        let mut exports_reserved_name = false;
        self.expect_punctuator("{")?;
        while !self.check_punctuator("}") {
            exports_reserved_name |= self.lookahead.kind == TokenKind::Keyword;
            specifiers.push(self.parse_export_specifier()?);
            self.expect_comma_unless("}")?;
        }
        self.expect_punctuator("}")?;

        let source = if self.check_contextual("from") {
            self.next_token()?;
            let source = self.parse_module_specifier()?;
            Some(source)
        } else if exports_reserved_name {
            // `export { default }` only makes sense as a re-export
            self.expect_from_clause()?;
            None
        } else {
            None
        };
        self.consume_semicolon()?;

        Ok(Statement::ExportNamedDeclaration(Box::new(ExportNamedDeclaration {
            declaration: None,
            specifiers,
            source,
            meta: self.finalize(start),
        })))
    }

    pub(crate) fn parse_export_declaration(&mut self) -> ParseResult<Statement> {
        let start = self.start_node();
        self.expect_keyword("export")?;

        if self.check_keyword("default") {
            return self.parse_export_default(start);
        }
        if self.check_punctuator("*") {
            return self.parse_export_all(start);
        }

        let declaration = if self.check_keyword("var") {
            Declaration::Variable(Box::new(self.parse_variable_statement()?))
        } else if self.check_keyword("const") || self.check_contextual("let") {
            Declaration::Variable(Box::new(self.parse_lexical_declaration()?))
        } else if self.check_keyword("function") || self.match_async_function() {
            Declaration::Function(Box::new(self.parse_function_declaration(false)?))
        } else if self.check_keyword("class") {
            Declaration::Class(Box::new(self.parse_class_declaration(false)?))
        } else if self.check_punctuator("{") {
            return self.parse_export_named_specifiers(start);
        } else {
            let token = self.lookahead.clone();
            return Err(self.unexpected_token_error(&token, None));
        };

        Ok(Statement::ExportNamedDeclaration(Box::new(ExportNamedDeclaration {
            declaration: Some(declaration),
            specifiers: Vec::new(),
            source: None,
            meta: self.finalize(start),
        })))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Declaration, ExportDefaultValue, ImportDeclarationSpecifier, Statement};
    use crate::options::{Options, SourceType};
    use crate::parser::Parser;

    fn module(source: &str) -> Vec<Statement> {
        let options = Options::new().with_source_type(SourceType::Module);
        Parser::new(source, options).parse_program().unwrap().body
    }

    fn module_error(source: &str) -> String {
        let options = Options::new().with_source_type(SourceType::Module);
        Parser::new(source, options).parse_program().unwrap_err().description
    }

    #[test]
    fn test_import_forms() {
        let body = module(
            "import 'a'; import b from 'b'; import * as c from 'c'; import d, { e, f as g } from 'd';",
        );
        assert_eq!(body.len(), 4);
        let Statement::ImportDeclaration(import) = &body[3] else {
            panic!("expected import");
        };
        assert_eq!(import.specifiers.len(), 3);
        assert!(matches!(import.specifiers[0], ImportDeclarationSpecifier::Default(_)));
        let ImportDeclarationSpecifier::Named(named) = &import.specifiers[2] else {
            panic!("expected named specifier");
        };
        assert_eq!(named.imported.name, "f");
        assert_eq!(named.local.name, "g");
    }

    #[test]
    fn test_import_errors() {
        assert_eq!(module_error("import * from 'a';"), "Unexpected token");
        assert_eq!(module_error("import a 'a';"), "Unexpected token a");
        assert_eq!(module_error("import { a } from b;"), "Unexpected token");
    }

    #[test]
    fn test_export_forms() {
        let body = module(
            "export var a = 1; export let b; export function c() {} export class D {} export { a as x, b }; export * from 'm'; export * as ns from 'n'; export { y } from 'o';",
        );
        assert_eq!(body.len(), 8);
        let Statement::ExportNamedDeclaration(named) = &body[0] else {
            panic!("expected named export");
        };
        assert!(matches!(named.declaration, Some(Declaration::Variable(_))));
        let Statement::ExportAllDeclaration(all) = &body[6] else {
            panic!("expected export all");
        };
        assert_eq!(all.exported.as_ref().map(|id| id.name.as_str()), Some("ns"));
    }

    #[test]
    fn test_export_default_forms() {
        let body = module("export default function () {}");
        let Statement::ExportDefaultDeclaration(export) = &body[0] else {
            panic!("expected default export");
        };
        let ExportDefaultValue::Function(function) = &export.declaration else {
            panic!("expected function");
        };
        assert!(function.id.is_none());

        let body = module("export default class {}");
        assert!(matches!(
            &body[0],
            Statement::ExportDefaultDeclaration(e) if matches!(e.declaration, ExportDefaultValue::Class(_))
        ));
        let body = module("export default 1 + 2;");
        assert!(matches!(
            &body[0],
            Statement::ExportDefaultDeclaration(e) if matches!(e.declaration, ExportDefaultValue::Expression(_))
        ));
    }

    #[test]
    fn test_export_default_needs_from() {
        assert_eq!(module_error("export { default };"), "Unexpected token ;");
    }

    #[test]
    fn test_import_in_script_is_an_error() {
        let err = Parser::new("import a from 'a';", Options::default())
            .parse_program()
            .unwrap_err();
        assert_eq!(err.description, "Unexpected token");
        assert_eq!(err.index, 0);
    }

    #[test]
    fn test_import_meta_and_call() {
        module("import.meta.url; import('x');");
        let err = Parser::new("import.meta", Options::default())
            .parse_program()
            .unwrap_err();
        assert_eq!(err.description, "Unexpected token import");
    }
}
