//! Input format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Supported document source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// AsciiDoc source text
    AsciiDoc,
    /// A document tree serialized as JSON
    JsonTree,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::AsciiDoc => write!(f, "AsciiDoc"),
            InputFormat::JsonTree => write!(f, "JSON document tree"),
        }
    }
}

const SNIFF_LEN: usize = 512;

/// Detect the input format from a file path.
///
/// The extension decides when it is known (`.json`, `.adoc`, `.asciidoc`,
/// `.txt`); otherwise the first bytes of the file are inspected.
///
/// # Example
/// ```no_run
/// use aivdm_extract::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("AIVDM.txt").unwrap();
/// println!("Reading {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => return Ok(InputFormat::JsonTree),
        Some("adoc") | Some("asciidoc") | Some("txt") => return Ok(InputFormat::AsciiDoc),
        _ => {}
    }

    let file = File::open(path)?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    BufReader::new(file)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    detect_format_from_bytes(&head)
}

/// Detect the input format from the leading bytes of a document.
///
/// Empty input and input containing NUL bytes are rejected with
/// `Error::UnknownFormat`.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    if data.is_empty() || data.contains(&0) {
        return Err(Error::UnknownFormat);
    }

    let first = data.iter().copied().find(|b| !b.is_ascii_whitespace());
    match first {
        Some(b'{') => Ok(InputFormat::JsonTree),
        Some(_) => Ok(InputFormat::AsciiDoc),
        None => Err(Error::UnknownFormat),
    }
}
