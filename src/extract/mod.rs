//! Table discovery and normalization.
//!
//! The pipeline runs in document order: [`locate_with_titles`] finds every
//! table and resolves its title, [`normalize`] validates a layout table and
//! turns its rows into field descriptors, and [`MessageCatalogBuilder`] ties
//! both together, keying layouts by message type id.

mod catalog;
mod locator;
mod lookup;
mod normalizer;
mod options;
pub mod visitor;

pub use catalog::{extract, select_table, MessageCatalogBuilder};
pub use locator::{
    locate, locate_with_titles, resolve_title, LocatedTable, TableCollector, TitledTableCollector,
};
pub use lookup::{clean_caption, lookup_for_table, lookup_key, MAX_LOOKUP_SPAN};
pub use normalizer::{
    normalize, normalize_node, normalize_table, normalize_table_with, parse_bit_range, validate_header,
    EXPECTED_HEADER, PLACEHOLDER_FIELD,
};
pub use options::{ExtractOptions, DEFAULT_LOOKUP_CAPTIONS, DEFAULT_TITLE_PATTERN};
pub use visitor::{walk, DocumentVisitor, VisitAction};
