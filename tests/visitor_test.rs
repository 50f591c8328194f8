//! Integration tests for the document visitor.

use aivdm_extract::extract::visitor::{walk, DocumentVisitor, VisitAction};
use aivdm_extract::model::{DocumentNode, TableBlock};

/// Custom visitor that tracks visit counts.
struct CountingVisitor {
    entered: usize,
    left: usize,
    table_count: usize,
    max_depth: usize,
}

impl CountingVisitor {
    fn new() -> Self {
        Self {
            entered: 0,
            left: 0,
            table_count: 0,
            max_depth: 0,
        }
    }
}

impl<'a> DocumentVisitor<'a> for CountingVisitor {
    fn enter_node(&mut self, _node: &'a DocumentNode, ancestors: &[&'a DocumentNode]) -> VisitAction {
        self.entered += 1;
        self.max_depth = self.max_depth.max(ancestors.len());
        VisitAction::Continue
    }

    fn visit_table(&mut self, _table: &'a DocumentNode, _ancestors: &[&'a DocumentNode]) {
        self.table_count += 1;
    }

    fn leave_node(&mut self, _node: &'a DocumentNode, _ancestors: &[&'a DocumentNode]) {
        self.left += 1;
    }
}

/// Visitor that refuses to enter appendix sections.
struct SkipAppendix {
    tables: Vec<String>,
}

impl<'a> DocumentVisitor<'a> for SkipAppendix {
    fn enter_node(&mut self, node: &'a DocumentNode, _ancestors: &[&'a DocumentNode]) -> VisitAction {
        if node.title_or_empty().starts_with("Appendix") {
            VisitAction::SkipChildren
        } else {
            VisitAction::Continue
        }
    }

    fn visit_table(&mut self, table: &'a DocumentNode, ancestors: &[&'a DocumentNode]) {
        let parent = ancestors.last().map(|n| n.title_or_empty()).unwrap_or("");
        self.tables.push(parent.to_string());
        assert!(table.is_table());
    }
}

fn sample() -> DocumentNode {
    DocumentNode::document(Some("AIVDM".to_string()))
        .with_child(
            DocumentNode::section("Type 6: Binary Addressed Message", 1)
                .with_child(DocumentNode::paragraph("intro", 2))
                .with_child(DocumentNode::table(TableBlock::new(), 2)),
        )
        .with_child(
            DocumentNode::section("Appendix", 1)
                .with_child(DocumentNode::block(2).with_child(DocumentNode::table(TableBlock::new(), 3))),
        )
}

#[test]
fn test_counting_visitor() {
    let doc = sample();
    let mut visitor = CountingVisitor::new();
    walk(&doc, &mut visitor);

    // root, two sections, one block
    assert_eq!(visitor.entered, 4);
    assert_eq!(visitor.left, 4);
    assert_eq!(visitor.table_count, 2);
    assert_eq!(visitor.max_depth, 2);
}

#[test]
fn test_skip_children_prunes_subtree() {
    let doc = sample();
    let mut visitor = SkipAppendix { tables: Vec::new() };
    walk(&doc, &mut visitor);
    assert_eq!(visitor.tables, vec!["Type 6: Binary Addressed Message"]);
}

#[test]
fn test_visit_action_default() {
    assert_eq!(VisitAction::default(), VisitAction::Continue);
    assert!(!VisitAction::Continue.should_skip());
    assert!(VisitAction::SkipChildren.should_skip());
}

#[test]
fn test_dyn_visitor() {
    let doc = sample();
    let mut visitor = CountingVisitor::new();
    let dyn_visitor: &mut dyn DocumentVisitor<'_> = &mut visitor;
    walk(&doc, dyn_visitor);
    assert_eq!(visitor.table_count, 2);
}
