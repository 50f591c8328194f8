//! # aivdm-extract
//!
//! Extracts AIS message bit layouts from the AIVDM/AIVDO protocol
//! description and normalizes them into JSON for decoder generators.
//!
//! ## Quick Start
//!
//! ```no_run
//! use aivdm_extract::{extract_file, render};
//!
//! fn main() -> aivdm_extract::Result<()> {
//!     let catalog = extract_file("AIVDM.txt")?;
//!     let json = render::to_json(&catalog, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Reading**: AsciiDoc source (or a JSON document tree) becomes a
//!   [`DocumentNode`] tree
//! - **Locating**: every table is collected in reading order and given the
//!   title of its nearest titled container
//! - **Normalizing**: layout tables are checked against the
//!   `Field | Len | Description | Member | T | Units` schema and each row
//!   becomes a [`FieldDescriptor`] with numeric start/end bits
//! - **Cataloging**: layouts are keyed by the message type ids named in
//!   their section titles

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, InputFormat};
pub use error::{Error, Result};
pub use extract::{
    locate, locate_with_titles, normalize, select_table, ExtractOptions, LocatedTable,
    MessageCatalogBuilder,
};
pub use model::{
    DocumentNode, FieldDescriptor, LookupTable, MessageCatalog, MessageTableStructure, NodeKind,
    TableBlock,
};
pub use parser::{AsciidocReader, ErrorMode, ReadOptions};
pub use render::JsonFormat;

use std::fs;
use std::path::Path;

/// Read a document file into a tree.
///
/// AsciiDoc and JSON trees are told apart by [`detect_format_from_path`].
///
/// # Example
///
/// ```no_run
/// use aivdm_extract::read_file;
///
/// let doc = read_file("AIVDM.txt").unwrap();
/// println!("Nodes: {}", doc.descendant_count());
/// ```
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<DocumentNode> {
    read_file_with_options(path, ReadOptions::default())
}

/// Read a document file with custom options.
pub fn read_file_with_options<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<DocumentNode> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    log::debug!("reading {} as {}", path.display(), format);
    let source = fs::read_to_string(path)?;
    read_source(&source, format, options)
}

/// Read document source text, detecting its format from the content.
pub fn read_str(source: &str, options: ReadOptions) -> Result<DocumentNode> {
    let format = detect_format_from_bytes(source.as_bytes())?;
    read_source(source, format, options)
}

fn read_source(source: &str, format: InputFormat, options: ReadOptions) -> Result<DocumentNode> {
    match format {
        InputFormat::AsciiDoc => AsciidocReader::with_options(options).read_str(source),
        InputFormat::JsonTree => parser::read_tree_json(source),
    }
}

/// Extract the message catalog from a document file.
///
/// # Example
///
/// ```no_run
/// use aivdm_extract::extract_file;
///
/// let catalog = extract_file("AIVDM.txt").unwrap();
/// for (id, message) in &catalog.message_types {
///     println!("{}: {} ({} fields)", id, message.name, message.fields.len());
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<MessageCatalog> {
    extract_file_with_options(path, ExtractOptions::default())
}

/// Extract the message catalog from a document file with custom options.
///
/// # Example
///
/// ```no_run
/// use aivdm_extract::{extract_file_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new().lenient().with_lookups(true);
/// let catalog = extract_file_with_options("AIVDM.txt", options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<MessageCatalog> {
    let doc = read_file(path)?;
    extract::extract(&doc, options)
}

/// Extract a document file straight to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let catalog = extract_file(path)?;
    render::to_json(&catalog, format)
}

/// Builder for reading a document and extracting from it.
///
/// # Example
///
/// ```no_run
/// use aivdm_extract::Extractor;
///
/// let json = Extractor::new()
///     .lenient()
///     .with_lookups()
///     .read("AIVDM.txt")?
///     .to_json(aivdm_extract::JsonFormat::Pretty)?;
/// # Ok::<(), aivdm_extract::Error>(())
/// ```
pub struct Extractor {
    read_options: ReadOptions,
    extract_options: ExtractOptions,
}

impl Extractor {
    /// Create a new extractor builder.
    pub fn new() -> Self {
        Self {
            read_options: ReadOptions::default(),
            extract_options: ExtractOptions::default(),
        }
    }

    /// Report and skip failing blocks and tables instead of aborting.
    pub fn lenient(mut self) -> Self {
        self.read_options = self.read_options.lenient();
        self.extract_options = self.extract_options.lenient();
        self
    }

    /// Collect code lookup tables too.
    pub fn with_lookups(mut self) -> Self {
        self.extract_options = self.extract_options.with_lookups(true);
        self
    }

    /// Drop `?` placeholder rows from layout tables.
    pub fn skip_placeholder_rows(mut self) -> Self {
        self.extract_options = self.extract_options.with_placeholder_rows_skipped(true);
        self
    }

    /// Set the message section title pattern.
    pub fn with_title_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.extract_options = self.extract_options.with_title_pattern(pattern);
        self
    }

    /// Set the lookup table captions.
    pub fn with_lookup_captions<S: Into<String>>(mut self, captions: impl IntoIterator<Item = S>) -> Self {
        self.extract_options = self.extract_options.with_lookup_captions(captions);
        self
    }

    /// Read a document file and return a result wrapper.
    pub fn read<P: AsRef<Path>>(self, path: P) -> Result<ExtractResult> {
        let document = read_file_with_options(path, self.read_options)?;
        Ok(ExtractResult {
            document,
            extract_options: self.extract_options,
        })
    }

    /// Read document source text.
    pub fn read_str(self, source: &str) -> Result<ExtractResult> {
        let document = read_str(source, self.read_options)?;
        Ok(ExtractResult {
            document,
            extract_options: self.extract_options,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A read document, ready for extraction.
pub struct ExtractResult {
    /// The document tree
    pub document: DocumentNode,
    /// Extract options to use
    extract_options: ExtractOptions,
}

impl ExtractResult {
    /// Build the message catalog.
    pub fn catalog(&self) -> Result<MessageCatalog> {
        extract::extract(&self.document, self.extract_options.clone())
    }

    /// Build the catalog and render it as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.catalog()?, format)
    }

    /// All tables of the document with their resolved titles.
    pub fn tables(&self) -> Vec<LocatedTable<'_>> {
        locate_with_titles(&self.document)
    }

    /// Normalize the first table whose resolved title matches `pattern`.
    pub fn table(&self, pattern: &str) -> Result<MessageTableStructure> {
        let tables = self.tables();
        let located = select_table(&tables, pattern)?;
        normalize(located)
    }

    /// Get the document.
    pub fn document(&self) -> &DocumentNode {
        &self.document
    }
}
