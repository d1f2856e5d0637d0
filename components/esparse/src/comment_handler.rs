//! Attaches comments to nodes after a parse.
//!
//! A first walk records the span and parent of every node. Each comment is
//! then placed under the innermost node containing it and assigned:
//!
//! 1. as a leading comment of the next sibling if that sibling starts on
//!    the line the comment ends on;
//! 2. as a trailing comment of the previous sibling if that sibling ends on
//!    the line the comment starts on;
//! 3. as a leading comment of the next sibling, or failing that a trailing
//!    comment of the previous one;
//! 4. as an inner comment of a node with no children.
//!
//! A second walk, visiting nodes in the same order, stores the comments on
//! the node metadata.

use crate::ast::{Comment, Node, Program};
use crate::visit::{walk_program, NodeMut, VisitMut};
use core_types::Span;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Leading,
    Trailing,
    Inner,
}

struct NodeEntry {
    span: Span,
    children: Vec<usize>,
}

/// First walk: spans and the child lists, indexed in enter order.
#[derive(Default)]
struct Outline {
    nodes: Vec<NodeEntry>,
    stack: Vec<usize>,
}

impl VisitMut for Outline {
    fn enter(&mut self, node: &mut dyn Node) {
        let index = self.nodes.len();
        if let Some(&parent) = self.stack.last() {
            self.nodes[parent].children.push(index);
        }
        self.nodes.push(NodeEntry {
            span: node.meta().span,
            children: Vec::new(),
        });
        self.stack.push(index);
    }

    fn leave(&mut self, _node: NodeMut<'_>) {
        self.stack.pop();
    }
}

impl Outline {
    fn contains(&self, index: usize, comment: &Comment) -> bool {
        let span = self.nodes[index].span;
        span.start.offset <= comment.span.start.offset && comment.span.end.offset <= span.end.offset
    }

    /// Innermost node containing `comment`; the root contains everything.
    fn enclosing(&self, comment: &Comment) -> usize {
        let mut current = 0;
        while let Some(&child) = self.nodes[current]
            .children
            .iter()
            .find(|&&child| self.contains(child, comment))
        {
            current = child;
        }
        current
    }

    fn place(&self, comment: &Comment) -> (usize, Slot) {
        let parent = self.enclosing(comment);
        let children = &self.nodes[parent].children;
        let preceding = children
            .iter()
            .copied()
            .filter(|&child| self.nodes[child].span.end.offset <= comment.span.start.offset)
            .max_by_key(|&child| self.nodes[child].span.end.offset);
        let following = children
            .iter()
            .copied()
            .filter(|&child| self.nodes[child].span.start.offset >= comment.span.end.offset)
            .min_by_key(|&child| self.nodes[child].span.start.offset);

        let next_on_line = following
            .filter(|&next| self.nodes[next].span.start.line == comment.span.end.line);
        let previous_on_line = preceding
            .filter(|&previous| self.nodes[previous].span.end.line == comment.span.start.line);

        match (next_on_line, previous_on_line) {
            (Some(next), _) => (next, Slot::Leading),
            (None, Some(previous)) => (previous, Slot::Trailing),
            (None, None) => match (following, preceding) {
                (Some(next), _) => (next, Slot::Leading),
                (None, Some(previous)) => (previous, Slot::Trailing),
                (None, None) => (parent, Slot::Inner),
            },
        }
    }
}

/// Second walk: store the comments placed on each node.
struct Attacher {
    next_index: usize,
    placed: HashMap<usize, Vec<(Slot, Comment)>>,
}

impl VisitMut for Attacher {
    fn enter(&mut self, node: &mut dyn Node) {
        let index = self.next_index;
        self.next_index += 1;
        let Some(comments) = self.placed.remove(&index) else {
            return;
        };
        let meta = node.meta_mut();
        for (slot, comment) in comments {
            let list = match slot {
                Slot::Leading => &mut meta.leading_comments,
                Slot::Trailing => &mut meta.trailing_comments,
                Slot::Inner => &mut meta.inner_comments,
            };
            list.get_or_insert_with(Vec::new).push(comment);
        }
    }

    fn leave(&mut self, _node: NodeMut<'_>) {}
}

/// Attach `comments` (in source order) to the nodes of `program`.
pub fn attach_comments(program: &mut Program, comments: &[Comment]) {
    if comments.is_empty() {
        return;
    }

    let mut outline = Outline::default();
    walk_program(program, &mut outline);

    let mut placed: HashMap<usize, Vec<(Slot, Comment)>> = HashMap::new();
    for comment in comments {
        let (index, slot) = outline.place(comment);
        placed.entry(index).or_default().push((slot, comment.clone()));
    }
    debug!(comments = comments.len(), nodes = outline.nodes.len(), "attaching comments");

    let mut attacher = Attacher {
        next_index: 0,
        placed,
    };
    walk_program(program, &mut attacher);
}
