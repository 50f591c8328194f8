//! Plain text rendering for extracted catalogs.

use std::fmt::Write;

use crate::model::MessageCatalog;

/// Render a catalog as a readable bit-layout listing.
///
/// One block per message type, one line per field:
/// `start-end  len  member  t  description`.
pub fn to_text(catalog: &MessageCatalog) -> String {
    let mut output = String::new();

    for (id, message) in &catalog.message_types {
        let _ = writeln!(output, "Type {}: {} ({} bits)", id, message.name, message.bit_length());
        let member_width = message
            .fields
            .iter()
            .map(|f| f.member_name.len())
            .max()
            .unwrap_or(0);
        for field in &message.fields {
            let _ = writeln!(
                output,
                "  {:>3}-{:<3} {:>3}  {:<width$}  {:<2}  {}",
                field.start_bit,
                field.end_bit,
                field.length_bits,
                field.member_name,
                field.type_code,
                field.description,
                width = member_width
            );
        }
        output.push('\n');
    }

    for (key, lookup) in &catalog.lookups {
        let _ = writeln!(output, "Lookup {} ({} codes)", key, lookup.len());
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDescriptor, LookupTable, MessageTableStructure};

    #[test]
    fn test_to_text() {
        let mut catalog = MessageCatalog::new();
        catalog.message_types.insert(
            1,
            MessageTableStructure::new(
                "Position Report Class A",
                vec![FieldDescriptor {
                    field_name: "6-7".to_string(),
                    length_bits: 2,
                    description: "Repeat Indicator".to_string(),
                    member_name: "repeat".to_string(),
                    type_code: "u".to_string(),
                    units: String::new(),
                    start_bit: 6,
                    end_bit: 7,
                }],
            ),
        );
        let mut status = LookupTable::new();
        status.insert(0, "Under way using engine".to_string());
        catalog.lookups.insert("navigation_status".to_string(), status);

        let text = to_text(&catalog);
        assert!(text.starts_with("Type 1: Position Report Class A (8 bits)"));
        assert!(text.contains("    6-7     2  repeat  u   Repeat Indicator"));
        assert!(text.ends_with("Lookup navigation_status (1 codes)"));
    }
}
