//! Document tree types.

use super::TableBlock;
use serde::{Deserialize, Serialize};

/// A node in a parsed document tree.
///
/// Sections, delimited containers, paragraphs and tables all share this
/// shape; what distinguishes them is [`NodeKind`]. Only containers carry
/// children, but an empty `children` vector is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Section heading or block title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Nesting depth (0 = document root)
    #[serde(default)]
    pub level: u8,

    /// What this node is
    #[serde(flatten)]
    pub kind: NodeKind,

    /// Child nodes in reading order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

/// The kind of a [`DocumentNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// The document root
    Document,

    /// A titled section
    Section,

    /// A delimited container (sidebar, example block, ...)
    Block,

    /// A paragraph of text
    Paragraph {
        /// Paragraph text
        text: String,
    },

    /// A table
    Table(TableBlock),
}

impl DocumentNode {
    /// Create an empty document root.
    pub fn document(title: Option<String>) -> Self {
        Self {
            title,
            level: 0,
            kind: NodeKind::Document,
            children: Vec::new(),
        }
    }

    /// Create a section at the given level.
    pub fn section(title: impl Into<String>, level: u8) -> Self {
        Self {
            title: Some(title.into()),
            level,
            kind: NodeKind::Section,
            children: Vec::new(),
        }
    }

    /// Create an untitled delimited container.
    pub fn block(level: u8) -> Self {
        Self {
            title: None,
            level,
            kind: NodeKind::Block,
            children: Vec::new(),
        }
    }

    /// Create a paragraph.
    pub fn paragraph(text: impl Into<String>, level: u8) -> Self {
        Self {
            title: None,
            level,
            kind: NodeKind::Paragraph { text: text.into() },
            children: Vec::new(),
        }
    }

    /// Create a table node.
    pub fn table(table: TableBlock, level: u8) -> Self {
        Self {
            title: None,
            level,
            kind: NodeKind::Table(table),
            children: Vec::new(),
        }
    }

    /// Set the title and return self.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a child and return self.
    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a child node.
    pub fn add_child(&mut self, child: DocumentNode) {
        self.children.push(child);
    }

    /// Check if this node is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, NodeKind::Table(_))
    }

    /// Get the table content if this node is a table.
    pub fn as_table(&self) -> Option<&TableBlock> {
        match &self.kind {
            NodeKind::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Check if this node has any children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Get the title, or an empty string if there is none.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Get the total number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}
