//! Code lookup tables (navigation status, ship type, ...).

use crate::error::{Error, Result};
use crate::model::{LookupTable, TableBlock};

/// Widest code range a single lookup row may cover.
pub const MAX_LOOKUP_SPAN: u32 = u8::MAX as u32;

/// Strip a leading "Table N." and "Codes for" from a table caption.
///
/// "Table 7. Codes for Ship Type" becomes "Ship Type".
pub fn clean_caption(title: &str) -> String {
    let mut caption = title.trim();

    if let Some(rest) = caption.strip_prefix("Table") {
        let rest = rest.trim_start();
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 {
            if let Some(after) = rest[digits..].strip_prefix('.') {
                caption = after.trim_start();
            }
        }
    }

    if let Some(rest) = caption.strip_prefix("Codes for") {
        caption = rest.trim_start();
    }

    caption.to_string()
}

/// Turn a caption into a catalog key: lower case, whitespace runs as `_`.
pub fn lookup_key(caption: &str) -> String {
    caption
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Read a two-column code table into a lookup.
///
/// The first cell of each body row is a code (`N`) or an inclusive code
/// range (`N-M`, at most [`MAX_LOOKUP_SPAN`] wide); the second cell is the
/// text. Empty rows are ignored.
pub fn lookup_for_table(table: &TableBlock, title: &str) -> Result<LookupTable> {
    let mut lookup = LookupTable::new();

    for row in &table.rows {
        let Some(key) = row.first().map(|k| k.trim()) else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        let value = row.get(1).map(|v| v.trim()).unwrap_or("");
        let malformed = || Error::MalformedLookup {
            title: title.to_string(),
            key: key.to_string(),
        };

        let (first, last) = match key.split_once('-') {
            Some((first, last)) => (parse_code(first).ok_or_else(malformed)?, parse_code(last).ok_or_else(malformed)?),
            None => {
                let code = parse_code(key).ok_or_else(malformed)?;
                (code, code)
            }
        };
        if last < first || last - first > MAX_LOOKUP_SPAN {
            return Err(malformed());
        }

        for code in first..=last {
            lookup.insert(code, value.to_string());
        }
    }

    Ok(lookup)
}

fn parse_code(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
