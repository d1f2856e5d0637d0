//! Mutable tree walker.
//!
//! Every node type implements [`Walk`]; [`walk_program`] drives a
//! [`VisitMut`] over a whole tree. Each node is entered before its children
//! and left after them, so `leave` sees the tree in post-order with the
//! [`Program`] last. A grammar category value (an [`Expression`], a
//! [`Statement`], ...) and the node it wraps are one node: the visitor sees
//! it once, through the category view.

use crate::ast::*;
use crate::token::{RegexParts, Token};
use crate::options::SourceType;
use core_types::ParseError;

/// Callbacks invoked while walking a tree.
pub trait VisitMut {
    /// Whether `node` is walked at all; `false` skips it and its children.
    fn walk_into(&mut self, _node: &NodeMut<'_>) -> bool {
        true
    }

    /// Called before the children of `node` are walked.
    fn enter(&mut self, _node: &mut dyn Node) {}

    /// Called after the children of `node` are walked.
    fn leave(&mut self, node: NodeMut<'_>);
}

/// A node type whose child nodes can be walked.
pub trait Walk: Node {
    /// Walk the child nodes of `self`, but not `self`.
    fn walk_children(&mut self, visitor: &mut dyn VisitMut);
}

/// A field of a node: a child node, a collection of them, or plain data.
pub trait WalkField {
    /// Walk the nodes held by this field.
    fn walk_field(&mut self, visitor: &mut dyn VisitMut);
}

impl<T: WalkField> WalkField for Option<T> {
    fn walk_field(&mut self, visitor: &mut dyn VisitMut) {
        if let Some(value) = self {
            value.walk_field(visitor);
        }
    }
}

impl<T: WalkField> WalkField for Vec<T> {
    fn walk_field(&mut self, visitor: &mut dyn VisitMut) {
        for value in self.iter_mut() {
            value.walk_field(visitor);
        }
    }
}

macro_rules! leaf_fields {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WalkField for $ty {
                fn walk_field(&mut self, _visitor: &mut dyn VisitMut) {}
            }
        )*
    };
}

leaf_fields!(
    String,
    bool,
    SourceType,
    LiteralValue,
    RegexParts,
    TemplateElementValue,
    Comment,
    Token,
    ParseError,
);

macro_rules! node_mut {
    ($($variant:ident),* $(,)?) => {
        /// Mutable view of one node, handed to [`VisitMut::leave`].
        ///
        /// Category views ([`NodeMut::Expression`], [`NodeMut::Statement`],
        /// ...) allow the node to be replaced by any other node of the same
        /// category.
        pub enum NodeMut<'n> {
            $(
                #[allow(missing_docs)]
                $variant(&'n mut $variant),
            )*
        }

        impl Node for NodeMut<'_> {
            fn meta(&self) -> &NodeMeta {
                match self {
                    $( NodeMut::$variant(node) => node.meta(), )*
                }
            }
            fn meta_mut(&mut self) -> &mut NodeMeta {
                match self {
                    $( NodeMut::$variant(node) => node.meta_mut(), )*
                }
            }
            fn type_name(&self) -> &'static str {
                match self {
                    $( NodeMut::$variant(node) => node.type_name(), )*
                }
            }
        }

        $(
            impl WalkField for $variant {
                fn walk_field(&mut self, visitor: &mut dyn VisitMut) {
                    if !visitor.walk_into(&NodeMut::$variant(self)) {
                        return;
                    }
                    visitor.enter(self);
                    self.walk_children(visitor);
                    visitor.leave(NodeMut::$variant(self));
                }
            }
        )*
    };
}

node_mut!(
    Program,
    Statement,
    Declaration,
    Expression,
    Pattern,
    ArgumentListElement,
    ObjectExpressionProperty,
    ObjectPatternProperty,
    ArrowBody,
    ForInit,
    ForInLeft,
    ImportDeclarationSpecifier,
    ExportDefaultValue,
    Identifier,
    Literal,
    FunctionExpression,
    BlockStatement,
    ClassBody,
    MethodDefinition,
    TemplateLiteral,
    TemplateElement,
    SwitchCase,
    CatchClause,
    VariableDeclarator,
    ExportSpecifier,
    JSXElementName,
    JSXMemberObject,
    JSXAttributeName,
    JSXAttributeItem,
    JSXAttributeValue,
    JSXExpressionKind,
    JSXChild,
    JSXOpeningElement,
    JSXClosingElement,
    JSXOpeningFragment,
    JSXClosingFragment,
    JSXIdentifier,
);

/// Walk every node of `program`, ending with `program` itself.
pub fn walk_program(program: &mut Program, visitor: &mut dyn VisitMut) {
    program.walk_field(visitor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::parser::Parser;

    #[derive(Default)]
    struct Recorder {
        entered: Vec<&'static str>,
        left: Vec<&'static str>,
    }

    impl VisitMut for Recorder {
        fn enter(&mut self, node: &mut dyn Node) {
            self.entered.push(node.type_name());
        }

        fn leave(&mut self, node: NodeMut<'_>) {
            self.left.push(node.type_name());
        }
    }

    fn record(source: &str) -> Recorder {
        let mut program = Parser::new(source, Options::default()).parse_program().unwrap();
        let mut recorder = Recorder::default();
        walk_program(&mut program, &mut recorder);
        recorder
    }

    #[test]
    fn test_post_order_ends_with_program() {
        let recorder = record("a + 1;");
        assert_eq!(
            recorder.left,
            vec!["Identifier", "Literal", "BinaryExpression", "ExpressionStatement", "Program"]
        );
        assert_eq!(recorder.entered.first(), Some(&"Program"));
    }

    #[test]
    fn test_each_node_visited_once() {
        let recorder = record("function f(a, [b]) { return a; }");
        assert_eq!(recorder.entered.len(), recorder.left.len());
        assert_eq!(recorder.left.iter().filter(|name| **name == "Program").count(), 1);
        assert_eq!(recorder.left.iter().filter(|name| **name == "Identifier").count(), 4);
    }

    #[test]
    fn test_walk_into_prunes_subtrees() {
        struct SkipStatements(Vec<&'static str>);
        impl VisitMut for SkipStatements {
            fn walk_into(&mut self, node: &NodeMut<'_>) -> bool {
                !matches!(node, NodeMut::Statement(_))
            }
            fn leave(&mut self, node: NodeMut<'_>) {
                self.0.push(node.type_name());
            }
        }

        let mut program = Parser::new("a; b;", Options::default()).parse_program().unwrap();
        let mut visitor = SkipStatements(Vec::new());
        walk_program(&mut program, &mut visitor);
        assert_eq!(visitor.0, vec!["Program"]);
    }

    #[test]
    fn test_replace_through_category_view() {
        struct Rename;
        impl VisitMut for Rename {
            fn leave(&mut self, node: NodeMut<'_>) {
                if let NodeMut::Expression(Expression::Identifier(id)) = node {
                    id.name = id.name.to_uppercase();
                }
            }
        }

        let mut program = Parser::new("x = y;", Options::default()).parse_program().unwrap();
        walk_program(&mut program, &mut Rename);
        let Statement::Expression(stmt) = &program.body[0] else {
            panic!("expected expression statement");
        };
        let Expression::Assignment(assign) = &stmt.expression else {
            panic!("expected assignment");
        };
        assert_eq!(assign.right.as_identifier_name(), Some("Y"));
        // the target is a pattern, not an expression
        assert!(matches!(&assign.left, Pattern::Identifier(id) if id.name == "x"));
    }
}
