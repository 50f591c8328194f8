//! JSON rendering for extracted catalogs.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::MessageCatalog;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a catalog to JSON.
pub fn to_json(catalog: &MessageCatalog, format: JsonFormat) -> Result<String> {
    value_to_json(catalog, format)
}

/// Convert any serializable output (a single structure, a document tree) to
/// JSON.
pub fn value_to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(Error::from)
}

/// Parse a catalog back from JSON.
pub fn from_json(json: &str) -> Result<MessageCatalog> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDescriptor, MessageTableStructure};

    fn catalog() -> MessageCatalog {
        let mut catalog = MessageCatalog::new();
        catalog.message_types.insert(
            4,
            MessageTableStructure::new(
                "Base Station Report",
                vec![FieldDescriptor {
                    field_name: "0-5".to_string(),
                    length_bits: 6,
                    description: "Message Type".to_string(),
                    member_name: "type".to_string(),
                    type_code: "u".to_string(),
                    units: "Constant: 4".to_string(),
                    start_bit: 0,
                    end_bit: 5,
                }],
            ),
        );
        catalog
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&catalog(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"message types\""));
        assert!(json.contains("\"4\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&catalog(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.contains(r#""start":0,"end":5"#));
    }

    #[test]
    fn test_round_trip() {
        let original = catalog();
        let json = to_json(&original, JsonFormat::Pretty).unwrap();
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
