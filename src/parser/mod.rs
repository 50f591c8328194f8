//! Document reading module.
//!
//! Turns source documents into the generic [`DocumentNode`](crate::model::DocumentNode)
//! tree the extractor walks.

mod asciidoc;
mod options;

pub use asciidoc::AsciidocReader;
pub use options::{ErrorMode, ReadOptions};

use crate::error::Result;
use crate::model::DocumentNode;

/// Load a document tree that was serialized as JSON.
pub fn read_tree_json(source: &str) -> Result<DocumentNode> {
    Ok(serde_json::from_str(source)?)
}
