//! Per-node callback run while the tree is built.
//!
//! The delegate sees every node once, children before parents, with the
//! [`Program`] last. Each statement is handed over as soon as it is finished
//! and before it is linked into its parent, together with the expressions,
//! patterns and other nodes it owns. Statements nested inside it were handed
//! over when they were finished. The delegate receives a [`NodeMut`] view
//! and may rewrite the node in place or replace it with another node of the
//! same grammar category. The parser has made every grammar decision about a
//! node before the delegate sees it, so the delegate cannot change how the
//! source is parsed.
//!
//! # Example
//!
//! ```
//! use esparse::{parse_with_delegate, NodeMut, Options};
//! use esparse::ast::Node;
//!
//! let mut types = Vec::new();
//! parse_with_delegate("x = 1", Options::default(), &mut |node: NodeMut<'_>| {
//!     types.push(node.type_name());
//! })
//! .unwrap();
//! assert_eq!(types.last(), Some(&"Program"));
//! ```

use crate::ast::{Program, Statement};
use crate::visit::{walk_program, NodeMut, VisitMut, WalkField};
use tracing::trace;

/// Callback invoked for every finished node.
pub trait Delegate {
    /// Inspect or rewrite `node`.
    fn visit(&mut self, node: NodeMut<'_>);
}

impl<F> Delegate for F
where
    F: FnMut(NodeMut<'_>),
{
    fn visit(&mut self, node: NodeMut<'_>) {
        self(node)
    }
}

/// Walks one finished node, stopping at statements delivered before it.
struct Delivery<'d> {
    delegate: &'d mut dyn Delegate,
    /// The walk starts at a statement that has not been delivered yet
    root_statement: bool,
    delivered: usize,
}

impl VisitMut for Delivery<'_> {
    fn walk_into(&mut self, node: &NodeMut<'_>) -> bool {
        match node {
            NodeMut::Statement(_) => std::mem::take(&mut self.root_statement),
            _ => true,
        }
    }

    fn leave(&mut self, node: NodeMut<'_>) {
        self.delivered += 1;
        self.delegate.visit(node);
    }
}

/// Hand a finished statement and the nodes it owns to `delegate`.
pub(crate) fn deliver_statement(statement: &mut Statement, delegate: &mut dyn Delegate) {
    let mut delivery = Delivery {
        delegate,
        root_statement: true,
        delivered: 0,
    };
    statement.walk_field(&mut delivery);
    trace!(nodes = delivery.delivered, "statement delivered");
}

/// Hand the finished program to `delegate`; its statements were delivered already.
pub(crate) fn deliver_program(program: &mut Program, delegate: &mut dyn Delegate) {
    let mut delivery = Delivery {
        delegate,
        root_statement: false,
        delivered: 0,
    };
    walk_program(program, &mut delivery);
    trace!(nodes = delivery.delivered, "program delivered");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Expression, Literal, LiteralValue, Node};
    use crate::options::Options;
    use crate::parser::Parser;

    fn parse_with(source: &str, delegate: &mut dyn Delegate) -> Program {
        Parser::new(source, Options::default())
            .with_delegate(delegate)
            .parse_program()
            .unwrap()
    }

    struct Count(usize);

    impl VisitMut for Count {
        fn leave(&mut self, _node: NodeMut<'_>) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_program_is_last_and_every_node_seen_once() {
        let mut names = Vec::new();
        let mut program = parse_with(
            "if (a) { b(); } else c;\nfunction f(x) { return [x]; }",
            &mut |node: NodeMut<'_>| names.push(node.type_name()),
        );
        assert_eq!(names.last(), Some(&"Program"));
        assert_eq!(names.iter().filter(|name| **name == "Program").count(), 1);
        assert_eq!(names.first(), Some(&"Identifier"));

        let mut count = Count(0);
        walk_program(&mut program, &mut count);
        assert_eq!(names.len(), count.0);
    }

    #[test]
    fn test_children_before_parents() {
        let mut names = Vec::new();
        parse_with("if (a) b; else c;", &mut |node: NodeMut<'_>| names.push(node.type_name()));
        let position = |name: &str| names.iter().position(|seen| *seen == name).unwrap();
        assert!(position("ExpressionStatement") < position("IfStatement"));
        assert!(position("IfStatement") < position("Program"));
        // the test is delivered with the if statement, after its branches
        assert_eq!(names[names.len() - 3], "Identifier");
    }

    #[test]
    fn test_statements_delivered_during_parse() {
        let mut names = Vec::new();
        let error = Parser::new("a;\nb c", Options::default())
            .with_delegate(&mut |node: NodeMut<'_>| names.push(node.type_name()))
            .parse_program()
            .unwrap_err();
        assert_eq!(error.line_number, 2);
        assert_eq!(names, vec!["Identifier", "ExpressionStatement"]);
    }

    #[test]
    fn test_rewrites_do_not_change_grammar_decisions() {
        let mut blank = |node: NodeMut<'_>| {
            if let NodeMut::Expression(Expression::Literal(literal)) = node {
                literal.value = LiteralValue::String(String::new());
            }
        };
        let error = Parser::new("'use strict'; with (a) {}", Options::default())
            .with_delegate(&mut blank)
            .parse_program()
            .unwrap_err();
        assert_eq!(error.description, "Strict mode code may not include a with statement");
    }

    #[test]
    fn test_replace_expression() {
        struct Fold;
        impl Delegate for Fold {
            fn visit(&mut self, node: NodeMut<'_>) {
                let NodeMut::Expression(expression) = node else {
                    return;
                };
                let folded = match &*expression {
                    Expression::Binary(binary) if binary.operator == BinaryOperator::Add => {
                        match (&binary.left, &binary.right) {
                            (Expression::Literal(left), Expression::Literal(right)) => {
                                match (&left.value, &right.value) {
                                    (LiteralValue::Number(a), LiteralValue::Number(b)) => Some(Literal {
                                        value: LiteralValue::Number(a + b),
                                        raw: None,
                                        regex: None,
                                        bigint: None,
                                        meta: binary.meta.clone(),
                                    }),
                                    _ => None,
                                }
                            }
                            _ => None,
                        }
                    }
                    _ => None,
                };
                if let Some(folded) = folded {
                    *expression = Expression::Literal(Box::new(folded));
                }
            }
        }

        let program = parse_with("x = 1 + 2 + 3;", &mut Fold);
        let Statement::Expression(stmt) = &program.body[0] else {
            panic!("expected expression statement");
        };
        let Expression::Assignment(assign) = &stmt.expression else {
            panic!("expected assignment");
        };
        let Expression::Literal(literal) = &assign.right else {
            panic!("expected folded literal");
        };
        assert_eq!(literal.value, LiteralValue::Number(6.0));
    }
}
