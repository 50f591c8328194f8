//! Table discovery and title association.

use log::debug;

use crate::model::{DocumentNode, TableBlock};

use super::visitor::{walk, DocumentVisitor};

/// A table found in a document, with the titles around it.
#[derive(Debug, Clone)]
pub struct LocatedTable<'a> {
    /// The table node
    pub node: &'a DocumentNode,

    /// The table content
    pub table: &'a TableBlock,

    /// Position among all tables of the document (0-indexed)
    pub index: usize,

    /// Own title, else the nearest titled ancestor's title
    pub title: Option<String>,

    /// Containers above the table, nearest first
    pub ancestors: Vec<&'a DocumentNode>,
}

impl<'a> LocatedTable<'a> {
    /// Get the resolved title, or an empty string if there is none.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Titled nodes from the table itself outwards, nearest first.
    ///
    /// The first entry (if any) is the node that supplied the resolved title.
    pub fn titled_chain(&self) -> impl Iterator<Item = (&'a DocumentNode, &'a str)> + '_ {
        std::iter::once(self.node)
            .chain(self.ancestors.iter().copied())
            .filter_map(|node| node.title.as_deref().map(|title| (node, title)))
    }
}

/// Resolve a table's title: its own, else that of the nearest titled
/// ancestor however far up it is, else `None`.
///
/// `ancestors` runs from the root to the direct parent.
pub fn resolve_title(table: &DocumentNode, ancestors: &[&DocumentNode]) -> Option<String> {
    table
        .title
        .as_deref()
        .or_else(|| ancestors.iter().rev().find_map(|node| node.title.as_deref()))
        .map(str::to_string)
}

/// Visitor that collects table nodes in reading order.
#[derive(Debug, Default)]
pub struct TableCollector<'a> {
    tables: Vec<&'a DocumentNode>,
}

impl<'a> TableCollector<'a> {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Consume the collector and return the tables found.
    pub fn into_tables(self) -> Vec<&'a DocumentNode> {
        self.tables
    }
}

impl<'a> DocumentVisitor<'a> for TableCollector<'a> {
    fn visit_table(&mut self, table: &'a DocumentNode, _ancestors: &[&'a DocumentNode]) {
        self.tables.push(table);
    }
}

/// Visitor that collects tables together with their resolved titles.
#[derive(Debug, Default)]
pub struct TitledTableCollector<'a> {
    tables: Vec<LocatedTable<'a>>,
}

impl<'a> TitledTableCollector<'a> {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Consume the collector and return the tables found.
    pub fn into_tables(self) -> Vec<LocatedTable<'a>> {
        self.tables
    }
}

impl<'a> DocumentVisitor<'a> for TitledTableCollector<'a> {
    fn visit_table(&mut self, node: &'a DocumentNode, ancestors: &[&'a DocumentNode]) {
        let Some(table) = node.as_table() else {
            return;
        };
        let title = resolve_title(node, ancestors);
        debug!(
            "table #{} at level {}: {:?}",
            self.tables.len(),
            node.level,
            title
        );
        self.tables.push(LocatedTable {
            node,
            table,
            index: self.tables.len(),
            title,
            ancestors: ancestors.iter().rev().copied().collect(),
        });
    }
}

/// Collect every table node below `root`, in document order.
///
/// Tables may sit at any depth inside sections or other containers. A tree
/// without tables yields an empty vector.
pub fn locate(root: &DocumentNode) -> Vec<&DocumentNode> {
    let mut collector = TableCollector::new();
    walk(root, &mut collector);
    collector.into_tables()
}

/// Collect every table below `root` with its resolved title, in document
/// order.
pub fn locate_with_titles(root: &DocumentNode) -> Vec<LocatedTable<'_>> {
    let mut collector = TitledTableCollector::new();
    walk(root, &mut collector);
    collector.into_tables()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(title: Option<&str>, level: u8) -> DocumentNode {
        let node = DocumentNode::table(TableBlock::with_header(["Field"]), level);
        match title {
            Some(t) => node.titled(t),
            None => node,
        }
    }

    #[test]
    fn test_locate_empty_tree() {
        let doc = DocumentNode::document(None)
            .with_child(DocumentNode::section("Intro", 1).with_child(DocumentNode::paragraph("text", 2)));
        assert!(locate(&doc).is_empty());
        assert!(locate(&DocumentNode::document(None)).is_empty());
    }

    #[test]
    fn test_locate_scattered_tables_in_order() {
        let doc = DocumentNode::document(None)
            .with_child(table(Some("first"), 1))
            .with_child(
                DocumentNode::section("s", 1)
                    .with_child(DocumentNode::paragraph("p", 2))
                    .with_child(
                        DocumentNode::block(2)
                            .with_child(DocumentNode::block(3).with_child(table(Some("deep"), 4))),
                    )
                    .with_child(table(Some("after"), 2)),
            )
            .with_child(table(Some("last"), 1));

        let titles: Vec<_> = locate(&doc).iter().map(|t| t.title_or_empty()).collect();
        assert_eq!(titles, vec!["first", "deep", "after", "last"]);
    }

    #[test]
    fn test_root_table_is_not_reported() {
        let root = table(Some("root"), 0);
        assert!(locate(&root).is_empty());
    }

    #[test]
    fn test_title_own_wins() {
        let doc = DocumentNode::document(None)
            .with_child(DocumentNode::section("Type 5: Static and Voyage Related Data", 1).with_child(table(Some("Table 12"), 2)));
        let tables = locate_with_titles(&doc);
        assert_eq!(tables[0].title.as_deref(), Some("Table 12"));
    }

    #[test]
    fn test_title_inherited_two_levels_up() {
        let doc = DocumentNode::document(None).with_child(
            DocumentNode::section("Type 4: Base Station Report", 1)
                .with_child(DocumentNode::block(2).with_child(table(None, 3))),
        );
        let tables = locate_with_titles(&doc);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].title.as_deref(), Some("Type 4: Base Station Report"));
        assert_eq!(tables[0].ancestors.len(), 3);
        assert_eq!(tables[0].ancestors[0].kind, crate::model::NodeKind::Block);
    }

    #[test]
    fn test_title_absent_everywhere() {
        let doc = DocumentNode::document(None).with_child(DocumentNode::block(1).with_child(table(None, 2)));
        let tables = locate_with_titles(&doc);
        assert_eq!(tables[0].title, None);
        assert_eq!(tables[0].title_or_empty(), "");
    }

    #[test]
    fn test_titled_chain_nearest_first() {
        let doc = DocumentNode::document(Some("AIVDM".to_string())).with_child(
            DocumentNode::section("Type 6: Binary Addressed Message", 1)
                .with_child(DocumentNode::block(2).with_child(table(Some("Table 14"), 3))),
        );
        let tables = locate_with_titles(&doc);
        let chain: Vec<_> = tables[0].titled_chain().map(|(_, title)| title).collect();
        assert_eq!(chain, vec!["Table 14", "Type 6: Binary Addressed Message", "AIVDM"]);
    }

    #[test]
    fn test_indexes_follow_document_order() {
        let doc = DocumentNode::document(None)
            .with_child(table(None, 1))
            .with_child(DocumentNode::section("s", 1).with_child(table(None, 2)));
        let indexes: Vec<_> = locate_with_titles(&doc).iter().map(|t| t.index).collect();
        assert_eq!(indexes, vec![0, 1]);
    }
}
