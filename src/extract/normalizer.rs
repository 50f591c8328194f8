//! Field table normalization.
//!
//! Validates a layout table's header against [`EXPECTED_HEADER`] and turns
//! each body row into a [`FieldDescriptor`].

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{DocumentNode, FieldDescriptor, MessageTableStructure, TableBlock};

use super::locator::LocatedTable;

/// Column schema every message layout table must start with.
pub const EXPECTED_HEADER: [&str; 6] = ["Field", "Len", "Description", "Member", "T", "Units"];

/// `Field` cell of rows that stand in for bits not yet documented.
pub const PLACEHOLDER_FIELD: &str = "?";

/// Normalize a located table into a message structure named after its
/// resolved title.
pub fn normalize(located: &LocatedTable<'_>) -> Result<MessageTableStructure> {
    normalize_table(located.table, located.title_or_empty())
}

/// Normalize a bare table node, using `title` for the structure name and
/// error messages.
pub fn normalize_node(node: &DocumentNode, title: &str) -> Result<MessageTableStructure> {
    let table = node
        .as_table()
        .ok_or_else(|| Error::NotATable(title.to_string()))?;
    normalize_table(table, title)
}

/// Normalize table content into a message structure.
pub fn normalize_table(table: &TableBlock, title: &str) -> Result<MessageTableStructure> {
    normalize_table_with(table, title, false)
}

/// Normalize table content, optionally dropping placeholder rows whose
/// `Field` cell is [`PLACEHOLDER_FIELD`].
///
/// Row numbers in errors still count the dropped rows.
pub fn normalize_table_with(table: &TableBlock, title: &str, skip_placeholders: bool) -> Result<MessageTableStructure> {
    validate_header(&table.header, title)?;

    let fields = table
        .rows
        .iter()
        .enumerate()
        .filter(|(row, cells)| {
            let placeholder = skip_placeholders && cells.first().is_some_and(|f| f.trim() == PLACEHOLDER_FIELD);
            if placeholder {
                debug!("{:?} row {}: skipping placeholder row", title, row);
            }
            !placeholder
        })
        .map(|(row, cells)| normalize_row(&table.header, cells, title, row))
        .collect::<Result<Vec<_>>>()?;

    Ok(MessageTableStructure::new(title, fields))
}

/// Check the header against [`EXPECTED_HEADER`], position by position.
///
/// Fails at the first position whose cell differs or is missing. Cells past
/// the expected six are not checked.
pub fn validate_header(header: &[String], title: &str) -> Result<()> {
    for (position, expected) in EXPECTED_HEADER.iter().enumerate() {
        let actual = header.get(position);
        if actual.map(String::as_str) != Some(*expected) {
            return Err(Error::SchemaMismatch {
                title: title.to_string(),
                position,
                expected: expected.to_string(),
                actual: actual.cloned(),
            });
        }
    }
    Ok(())
}

fn normalize_row(header: &[String], cells: &[String], title: &str, row: usize) -> Result<FieldDescriptor> {
    let values: HashMap<String, &str> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_lowercase(), cells.get(i).map(String::as_str).unwrap_or("")))
        .collect();
    let column = |name: &str| values.get(name).copied().unwrap_or("");

    let field = column("field");
    let (start_bit, end_bit) = parse_bit_range(field, title, row)?;
    let length_bits = parse_integer(column("len"), "len", title, row)?;

    let descriptor = FieldDescriptor {
        field_name: field.to_string(),
        length_bits,
        description: column("description").to_string(),
        member_name: column("member").to_string(),
        type_code: column("t").to_string(),
        units: column("units").to_string(),
        start_bit,
        end_bit,
    };

    if !descriptor.is_consistent() {
        warn!(
            "{:?} row {}: range {} spans {} bits but len is {}",
            title,
            row,
            field,
            descriptor.range_width(),
            length_bits
        );
    }

    Ok(descriptor)
}

/// Parse a bit range cell: `"start-end"`, or a single bit offset.
///
/// The cell is split on its first `-`; both sides must be present, parse as
/// unsigned integers, and satisfy `start <= end`.
pub fn parse_bit_range(value: &str, title: &str, row: usize) -> Result<(u32, u32)> {
    let malformed = || Error::MalformedRange {
        title: title.to_string(),
        row,
        value: value.to_string(),
    };

    let (start, end) = match value.split_once('-') {
        Some((start, end)) => {
            if start.trim().is_empty() || end.trim().is_empty() {
                return Err(malformed());
            }
            let start = parse_integer(start, "field", title, row)?;
            let end = parse_integer(end, "field", title, row)?;
            (start, end)
        }
        None => {
            if value.trim().is_empty() {
                return Err(malformed());
            }
            let bit = parse_integer(value, "field", title, row)?;
            (bit, bit)
        }
    };

    if end < start {
        return Err(malformed());
    }
    Ok((start, end))
}

fn parse_integer(value: &str, column: &str, title: &str, row: usize) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| Error::NotAnInteger {
        title: title.to_string(),
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}
