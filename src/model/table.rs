//! Table types.

use serde::{Deserialize, Serialize};

/// Text content of a table block: one header row and the body rows.
///
/// Cells hold plain text as the reader extracted it. Rows are not required
/// to have the same width as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Header cells (empty = no header)
    #[serde(default)]
    pub header: Vec<String>,

    /// Body rows, each an ordered list of cells
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl TableBlock {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the given header cells.
    pub fn with_header<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a body row from text values.
    pub fn add_row<S: Into<String>>(&mut self, values: impl IntoIterator<Item = S>) {
        self.rows.push(values.into_iter().map(Into::into).collect());
    }

    /// Add a body row and return self.
    pub fn row<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.add_row(values);
        self
    }

    /// Get the number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (header width, else first row width).
    pub fn column_count(&self) -> usize {
        if !self.header.is_empty() {
            return self.header.len();
        }
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the table has a header row.
    pub fn has_header(&self) -> bool {
        !self.header.is_empty()
    }

    /// Check if the table has neither header nor body.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Get a cell from a body row, if present.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        std::iter::once(&self.header)
            .filter(|h| !h.is_empty())
            .chain(self.rows.iter())
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = TableBlock::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_table_with_data() {
        let table = TableBlock::with_header(["Field", "Len", "Description"])
            .row(["0-5", "6", "Message Type"])
            .row(["6-7", "2", "Repeat Indicator"]);

        assert!(table.has_header());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.cell(1, 2), Some("Repeat Indicator"));
        assert_eq!(table.cell(2, 0), None);
    }

    #[test]
    fn test_headerless_column_count() {
        let table = TableBlock::new().row(["0", "Under way using engine"]);
        assert!(!table.has_header());
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_plain_text() {
        let table = TableBlock::with_header(["Key", "Value"]).row(["0", "Not available"]);
        assert_eq!(table.plain_text(), "Key\tValue\n0\tNot available");
    }
}
