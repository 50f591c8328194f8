//! Document and output model types.
//!
//! The document side (`DocumentNode`, `TableBlock`) is the generic tree a
//! reader produces and the locator walks. The message side
//! (`FieldDescriptor`, `MessageTableStructure`, `MessageCatalog`) is what the
//! normalizer emits for a decoder generator to consume.

mod document;
mod message;
mod table;

pub use document::{DocumentNode, NodeKind};
pub use message::{FieldDescriptor, LookupTable, MessageCatalog, MessageTableStructure};
pub use table::TableBlock;
