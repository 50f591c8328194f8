//! Error types for aivdm-extract.

use std::io;
use thiserror::Error;

/// Result type alias for aivdm-extract operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading a document or extracting tables.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is neither AsciiDoc text nor a JSON document tree.
    #[error("Unknown input format: expected AsciiDoc text or a JSON document tree")]
    UnknownFormat,

    /// The document source could not be read into a tree.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-indexed source line
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A node handed to the normalizer is not a table.
    #[error("Node {0:?} is not a table")]
    NotATable(String),

    /// The table header does not match the expected column schema.
    #[error(
        "suspicious headers for {title:?}: column {position} expected {expected:?}, found {}",
        display_actual(.actual)
    )]
    SchemaMismatch {
        /// Resolved title of the offending table
        title: String,
        /// 0-indexed column position of the first mismatch
        position: usize,
        /// Expected column name at that position
        expected: String,
        /// Actual column name, or `None` when the header is too short
        actual: Option<String>,
    },

    /// A bit-range cell cannot be split into two endpoints.
    #[error("malformed bit range {value:?} in row {row} of {title:?}")]
    MalformedRange {
        /// Resolved title of the offending table
        title: String,
        /// 0-indexed body row
        row: usize,
        /// The raw cell text
        value: String,
    },

    /// A numeric cell is not an unsigned integer.
    #[error("column {column:?} in row {row} of {title:?} is not an integer: {value:?}")]
    NotAnInteger {
        /// Resolved title of the offending table
        title: String,
        /// 0-indexed body row
        row: usize,
        /// Lower-cased column name
        column: String,
        /// The offending text
        value: String,
    },

    /// A lookup table key is neither `N` nor `N-M`.
    #[error("unexpected lookup key {key:?} in {title:?}")]
    MalformedLookup {
        /// Resolved title of the lookup table
        title: String,
        /// The offending key cell
        key: String,
    },

    /// No table (or not the required table) was found.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// A title pattern failed to compile or lacks a required group.
    #[error("Invalid title pattern: {0}")]
    InvalidPattern(String),
}

fn display_actual(actual: &Option<String>) -> String {
    match actual {
        Some(a) => format!("{:?}", a),
        None => "nothing".to_string(),
    }
}

impl Error {
    /// Whether this error is confined to a single table, so a caller
    /// processing many tables can skip it and continue.
    pub fn is_table_local(&self) -> bool {
        matches!(
            self,
            Error::NotATable(_)
                | Error::SchemaMismatch { .. }
                | Error::MalformedRange { .. }
                | Error::NotAnInteger { .. }
                | Error::MalformedLookup { .. }
        )
    }
}
