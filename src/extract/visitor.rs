//! Visitor pattern for walking document trees.
//!
//! [`walk`] drives a [`DocumentVisitor`] over a tree in reading order
//! (depth-first, pre-order). Visitors see each table node together with the
//! chain of containers above it, which is what title association needs.
//!
//! # Example
//!
//! ```
//! use aivdm_extract::extract::visitor::{walk, DocumentVisitor};
//! use aivdm_extract::model::{DocumentNode, TableBlock};
//!
//! struct TableCounter(usize);
//!
//! impl<'a> DocumentVisitor<'a> for TableCounter {
//!     fn visit_table(&mut self, _table: &'a DocumentNode, _ancestors: &[&'a DocumentNode]) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let doc = DocumentNode::document(None)
//!     .with_child(DocumentNode::table(TableBlock::new(), 1));
//! let mut counter = TableCounter(0);
//! walk(&doc, &mut counter);
//! assert_eq!(counter.0, 1);
//! ```

use crate::model::DocumentNode;

/// Action returned by [`DocumentVisitor::enter_node`] to control traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitAction {
    /// Descend into the node's children.
    #[default]
    Continue,

    /// Do not descend into this node.
    SkipChildren,
}

impl VisitAction {
    /// Check if this action prunes the subtree.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitAction::SkipChildren)
    }
}

/// Trait for visiting document nodes during a walk.
///
/// `ancestors` always runs from the root (first) to the direct parent
/// (last). All methods have no-op defaults.
pub trait DocumentVisitor<'a> {
    /// Called before descending into a node that has children.
    fn enter_node(&mut self, node: &'a DocumentNode, ancestors: &[&'a DocumentNode]) -> VisitAction {
        let _ = (node, ancestors);
        VisitAction::Continue
    }

    /// Called for every table node, in reading order.
    fn visit_table(&mut self, table: &'a DocumentNode, ancestors: &[&'a DocumentNode]) {
        let _ = (table, ancestors);
    }

    /// Called after all children of an entered node were walked.
    fn leave_node(&mut self, node: &'a DocumentNode, ancestors: &[&'a DocumentNode]) {
        let _ = (node, ancestors);
    }
}

/// Walk `root` depth-first in reading order.
///
/// Table children are reported through `visit_table`; children that have
/// children of their own are entered and walked recursively. The root itself
/// is entered but never reported as a table. Nodes without children
/// contribute nothing.
pub fn walk<'a, V>(root: &'a DocumentNode, visitor: &mut V)
where
    V: DocumentVisitor<'a> + ?Sized,
{
    if visitor.enter_node(root, &[]).should_skip() {
        return;
    }
    let mut ancestors = vec![root];
    walk_children(root, &mut ancestors, visitor);
    ancestors.pop();
    visitor.leave_node(root, &ancestors);
}

fn walk_children<'a, V>(node: &'a DocumentNode, ancestors: &mut Vec<&'a DocumentNode>, visitor: &mut V)
where
    V: DocumentVisitor<'a> + ?Sized,
{
    for child in &node.children {
        if child.is_table() {
            visitor.visit_table(child, ancestors);
        }
        if child.has_children() {
            if visitor.enter_node(child, ancestors).should_skip() {
                continue;
            }
            ancestors.push(child);
            walk_children(child, ancestors, visitor);
            ancestors.pop();
            visitor.leave_node(child, ancestors);
        }
    }
}
