//! Normalized message layout types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One bit field of an AIS message, normalized from a layout table row.
///
/// The serialized key names (`field`, `len`, `t`, `start`, ...) are what the
/// decoder generator reads, so they are fixed independently of the Rust
/// field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Original bit range text, e.g. "0-5"
    #[serde(rename = "field")]
    pub field_name: String,

    /// Length in bits as stated by the table
    #[serde(rename = "len")]
    pub length_bits: u32,

    /// Human readable description
    pub description: String,

    /// Member name used by decoders
    #[serde(rename = "member")]
    pub member_name: String,

    /// Semantic type code (u, i, e, b, t, x, I4, ...)
    #[serde(rename = "t")]
    pub type_code: String,

    /// Units or value notes
    pub units: String,

    /// First bit offset
    #[serde(rename = "start")]
    pub start_bit: u32,

    /// Last bit offset (inclusive)
    #[serde(rename = "end")]
    pub end_bit: u32,
}

impl FieldDescriptor {
    /// Bit span implied by the range, `end - start + 1`.
    pub fn range_width(&self) -> u32 {
        self.end_bit.saturating_sub(self.start_bit) + 1
    }

    /// Whether the stated length agrees with the bit range.
    pub fn is_consistent(&self) -> bool {
        self.range_width() == self.length_bits
    }
}

/// The normalized layout of one message table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTableStructure {
    /// Message name (resolved table or section title)
    pub name: String,

    /// Fields in bit-layout order
    pub fields: Vec<FieldDescriptor>,
}

impl MessageTableStructure {
    /// Create a structure from a name and its fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Total bits covered, taken from the last field's end offset.
    pub fn bit_length(&self) -> u32 {
        self.fields.last().map(|f| f.end_bit + 1).unwrap_or(0)
    }

    /// Look up a field by member name.
    pub fn field(&self, member: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.member_name == member)
    }
}

/// Code lookup table (e.g. navigation status), code to text.
pub type LookupTable = BTreeMap<u32, String>;

/// Everything extracted from one document.
///
/// Message type ids serialize as JSON object keys ("1", "2", ...) and stay in
/// numeric order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCatalog {
    /// Message layouts keyed by AIS message type id
    #[serde(rename = "message types")]
    pub message_types: BTreeMap<u32, MessageTableStructure>,

    /// Code lookup tables keyed by normalized caption
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lookups: BTreeMap<String, LookupTable>,
}

impl MessageCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a message layout by type id.
    pub fn get(&self, message_type: u32) -> Option<&MessageTableStructure> {
        self.message_types.get(&message_type)
    }

    /// Number of message types in the catalog.
    pub fn len(&self) -> usize {
        self.message_types.len()
    }

    /// Check if no message types were extracted.
    pub fn is_empty(&self) -> bool {
        self.message_types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_type_field() -> FieldDescriptor {
        FieldDescriptor {
            field_name: "0-5".to_string(),
            length_bits: 6,
            description: "Message Type".to_string(),
            member_name: "type".to_string(),
            type_code: "u".to_string(),
            units: "-".to_string(),
            start_bit: 0,
            end_bit: 5,
        }
    }

    #[test]
    fn test_field_json_keys() {
        let json = serde_json::to_string(&message_type_field()).unwrap();
        assert_eq!(
            json,
            r#"{"field":"0-5","len":6,"description":"Message Type","member":"type","t":"u","units":"-","start":0,"end":5}"#
        );
    }

    #[test]
    fn test_field_consistency() {
        let mut field = message_type_field();
        assert_eq!(field.range_width(), 6);
        assert!(field.is_consistent());
        field.length_bits = 7;
        assert!(!field.is_consistent());
    }

    #[test]
    fn test_structure_helpers() {
        let structure = MessageTableStructure::new("Position Report", vec![message_type_field()]);
        assert_eq!(structure.bit_length(), 6);
        assert!(structure.field("type").is_some());
        assert!(structure.field("mmsi").is_none());
    }

    #[test]
    fn test_catalog_keys_numeric_order() {
        let mut catalog = MessageCatalog::new();
        for id in [10, 2, 1] {
            catalog
                .message_types
                .insert(id, MessageTableStructure::new(format!("Type {}", id), Vec::new()));
        }
        let json = serde_json::to_string(&catalog).unwrap();
        let one = json.find("\"1\"").unwrap();
        let two = json.find("\"2\"").unwrap();
        let ten = json.find("\"10\"").unwrap();
        assert!(one < two && two < ten);
        assert!(json.starts_with("{\"message types\""));
        assert!(!json.contains("lookups"));
    }
}
