//! Message catalog assembly.
//!
//! Selects message layout tables by the title of the section they sit in,
//! normalizes them and keys them by AIS message type id.

use log::{debug, warn};
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{DocumentNode, MessageCatalog, MessageTableStructure};
use crate::parser::ErrorMode;

use super::locator::{locate_with_titles, LocatedTable};
use super::lookup::{clean_caption, lookup_for_table, lookup_key};
use super::normalizer::normalize_table_with;
use super::options::ExtractOptions;

/// Builds a [`MessageCatalog`] from a document tree.
///
/// # Example
///
/// ```
/// use aivdm_extract::extract::{ExtractOptions, MessageCatalogBuilder};
/// use aivdm_extract::model::{DocumentNode, TableBlock};
///
/// let table = TableBlock::with_header(["Field", "Len", "Description", "Member", "T", "Units"])
///     .row(["0-5", "6", "Message Type", "type", "u", "Constant: 4"]);
/// let doc = DocumentNode::document(None).with_child(
///     DocumentNode::section("Type 4: Base Station Report", 1)
///         .with_child(DocumentNode::table(table, 2)),
/// );
///
/// let builder = MessageCatalogBuilder::new(ExtractOptions::default())?;
/// let catalog = builder.build(&doc)?;
/// assert_eq!(catalog.get(4).unwrap().name, "Base Station Report");
/// # Ok::<(), aivdm_extract::Error>(())
/// ```
#[derive(Debug)]
pub struct MessageCatalogBuilder {
    options: ExtractOptions,
    title_pattern: Regex,
}

/// The message section a table belongs to.
struct MessageHeading<'a> {
    /// Node whose title matched
    node: &'a DocumentNode,
    ids: Vec<u32>,
    name: String,
}

impl MessageCatalogBuilder {
    /// Create a builder, compiling the title pattern.
    pub fn new(options: ExtractOptions) -> Result<Self> {
        let title_pattern = compile_pattern(&options.title_pattern)?;
        if !title_pattern.capture_names().any(|name| name == Some("ids")) {
            return Err(Error::InvalidPattern(format!(
                "{:?} has no `ids` group",
                options.title_pattern
            )));
        }
        Ok(Self {
            options,
            title_pattern,
        })
    }

    /// Get the options this builder was created with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the catalog from a document tree.
    ///
    /// Fails with `Error::TableNotFound` if no message table was produced.
    pub fn build(&self, root: &DocumentNode) -> Result<MessageCatalog> {
        let tables = locate_with_titles(root);
        debug!("located {} tables", tables.len());

        let mut catalog = MessageCatalog::new();
        let mut claimed: Vec<&DocumentNode> = Vec::new();

        for located in &tables {
            let caption = clean_caption(located.title_or_empty());
            if self.is_lookup_caption(&caption) {
                if self.options.include_lookups {
                    self.add_lookup(&mut catalog, located, &caption)?;
                }
                continue;
            }

            let Some(heading) = self.message_heading(located) else {
                debug!("table #{} {:?}: not a message table", located.index, located.title);
                continue;
            };

            // Only the first table of a message section is its layout.
            if claimed.iter().any(|node| std::ptr::eq(*node, heading.node)) {
                debug!(
                    "table #{} {:?}: later table in a claimed section",
                    located.index, located.title
                );
                continue;
            }
            claimed.push(heading.node);

            let structure = match normalize_table_with(
                located.table,
                located.title_or_empty(),
                self.options.skip_placeholder_rows,
            ) {
                Ok(structure) => structure,
                Err(err) => {
                    self.recover(err, located)?;
                    continue;
                }
            };

            for &id in &heading.ids {
                if catalog.message_types.contains_key(&id) {
                    warn!(
                        "message type {} already extracted, ignoring table #{} {:?}",
                        id, located.index, located.title
                    );
                    continue;
                }
                debug!("message type {}: {} ({} fields)", id, heading.name, structure.fields.len());
                catalog.message_types.insert(
                    id,
                    MessageTableStructure::new(heading.name.clone(), structure.fields.clone()),
                );
            }
        }

        if catalog.is_empty() {
            return Err(Error::TableNotFound(format!(
                "no message table under a title matching {:?}",
                self.options.title_pattern
            )));
        }
        Ok(catalog)
    }

    fn is_lookup_caption(&self, caption: &str) -> bool {
        self.options.lookup_captions.iter().any(|c| c == caption)
    }

    fn add_lookup(&self, catalog: &mut MessageCatalog, located: &LocatedTable<'_>, caption: &str) -> Result<()> {
        let key = lookup_key(caption);
        if catalog.lookups.contains_key(&key) {
            warn!("lookup {:?} already extracted, ignoring table #{}", key, located.index);
            return Ok(());
        }
        match lookup_for_table(located.table, located.title_or_empty()) {
            Ok(lookup) => {
                debug!("lookup {}: {} codes", key, lookup.len());
                catalog.lookups.insert(key, lookup);
                Ok(())
            }
            Err(err) => self.recover(err, located),
        }
    }

    /// Find the nearest title (the table's own first) matching the pattern.
    fn message_heading<'a>(&self, located: &LocatedTable<'a>) -> Option<MessageHeading<'a>> {
        located.titled_chain().find_map(|(node, title)| {
            let caps = self.title_pattern.captures(title)?;
            let ids: Vec<u32> = caps
                .name("ids")?
                .as_str()
                .split(|c: char| !c.is_ascii_digit())
                .filter_map(|digits| digits.parse().ok())
                .collect();
            if ids.is_empty() {
                return None;
            }
            let name = caps
                .name("name")
                .map(|m| m.as_str().trim())
                .filter(|name| !name.is_empty())
                .unwrap_or(title)
                .to_string();
            Some(MessageHeading { node, ids, name })
        })
    }

    /// Apply the error mode to a failure of one table.
    fn recover(&self, err: Error, located: &LocatedTable<'_>) -> Result<()> {
        match self.options.error_mode {
            ErrorMode::Lenient if err.is_table_local() => {
                warn!("skipping table #{} {:?}: {}", located.index, located.title, err);
                Ok(())
            }
            _ => Err(err),
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern(e.to_string()))
}

/// Extract a message catalog from a document tree.
pub fn extract(root: &DocumentNode, options: ExtractOptions) -> Result<MessageCatalog> {
    MessageCatalogBuilder::new(options)?.build(root)
}

/// Select the first located table whose resolved title matches `pattern`.
pub fn select_table<'t, 'a>(tables: &'t [LocatedTable<'a>], pattern: &str) -> Result<&'t LocatedTable<'a>> {
    let regex = compile_pattern(pattern)?;
    tables
        .iter()
        .find(|t| t.title.as_deref().is_some_and(|title| regex.is_match(title)))
        .ok_or_else(|| Error::TableNotFound(format!("no table titled like {:?}", pattern)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::normalizer::EXPECTED_HEADER;
    use crate::model::TableBlock;

    fn layout(first_field: &str) -> TableBlock {
        TableBlock::with_header(EXPECTED_HEADER)
            .row(["0-5", "6", "Message Type", "type", "u", first_field])
            .row(["6-7", "2", "Repeat Indicator", "repeat", "u", "Message repeat count"])
    }

    fn broken_layout() -> TableBlock {
        TableBlock::with_header(["Field", "Length", "Description", "Member", "T", "Units"])
    }

    fn section(title: &str, tables: Vec<TableBlock>) -> DocumentNode {
        tables
            .into_iter()
            .fold(DocumentNode::section(title, 1), |section, table| {
                section.with_child(DocumentNode::table(table, 2))
            })
    }

    fn sample() -> DocumentNode {
        DocumentNode::document(Some("AIVDM/AIVDO protocol decoding".to_string()))
            .with_child(section(
                "AIS Payload Interpretation",
                vec![TableBlock::with_header(["Type", "Name"]).row(["1", "Position Report Class A"])],
            ))
            .with_child(
                section("Types 1, 2 and 3: Position Report Class A", vec![layout("Constant: 1-3")]).with_child(
                    DocumentNode::table(
                        TableBlock::with_header(["Code", "Status"])
                            .row(["0", "Under way using engine"])
                            .row(["1", "At anchor"]),
                        2,
                    )
                    .titled("Table 3. Navigation Status"),
                ),
            )
            .with_child(section("Type 4: Base Station Report", vec![layout("Constant: 4")]))
            .with_child(section("Type 5: Static and Voyage Related Data", vec![layout("Constant: 5"), broken_layout()]))
    }

    #[test]
    fn test_build_catalog() {
        let catalog = extract(&sample(), ExtractOptions::default()).unwrap();
        let ids: Vec<_> = catalog.message_types.keys().copied().collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(catalog.get(1).unwrap().name, "Position Report Class A");
        assert_eq!(catalog.get(3), catalog.get(1));
        assert_eq!(catalog.get(4).unwrap().name, "Base Station Report");
        assert_eq!(catalog.get(4).unwrap().fields[0].units, "Constant: 4");
        assert_ne!(catalog.get(4), catalog.get(5));
        assert!(catalog.lookups.is_empty());
    }

    #[test]
    fn test_lookups_collected_when_enabled() {
        let options = ExtractOptions::new().with_lookups(true);
        let catalog = extract(&sample(), options).unwrap();
        let status = &catalog.lookups["navigation_status"];
        assert_eq!(status[&1], "At anchor");
        // The lookup table never counts as a message layout.
        assert_eq!(catalog.get(1).unwrap().fields.len(), 2);
    }

    #[test]
    fn test_strict_mode_aborts_on_bad_table() {
        let doc = DocumentNode::document(None)
            .with_child(section("Type 6: Binary Addressed Message", vec![broken_layout()]))
            .with_child(section("Type 7: Binary Acknowledge", vec![layout("Constant: 7")]));
        let err = extract(&doc, ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { position: 1, .. }));
    }

    #[test]
    fn test_lenient_mode_skips_bad_table() {
        let doc = DocumentNode::document(None)
            .with_child(section("Type 6: Binary Addressed Message", vec![broken_layout()]))
            .with_child(section("Type 7: Binary Acknowledge", vec![layout("Constant: 7")]));
        let catalog = extract(&doc, ExtractOptions::new().lenient()).unwrap();
        assert!(catalog.get(6).is_none());
        assert_eq!(catalog.get(7).unwrap().name, "Binary Acknowledge");
    }

    #[test]
    fn test_table_not_found() {
        let doc = DocumentNode::document(None).with_child(section("Introduction", vec![layout("-")]));
        assert!(matches!(
            extract(&doc, ExtractOptions::default()),
            Err(Error::TableNotFound(_))
        ));
        assert!(matches!(
            extract(&DocumentNode::document(None), ExtractOptions::default()),
            Err(Error::TableNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let doc = DocumentNode::document(None)
            .with_child(section("Type 8: Binary Broadcast Message", vec![layout("first")]))
            .with_child(section("Type 8: Binary Broadcast Message (again)", vec![layout("second")]));
        let catalog = extract(&doc, ExtractOptions::default()).unwrap();
        assert_eq!(catalog.get(8).unwrap().fields[0].units, "first");
    }

    #[test]
    fn test_own_title_matching_pattern() {
        let doc = DocumentNode::document(None).with_child(
            DocumentNode::block(1).with_child(DocumentNode::table(layout("-"), 2).titled("Type 9: SAR Aircraft")),
        );
        let catalog = extract(&doc, ExtractOptions::default()).unwrap();
        assert_eq!(catalog.get(9).unwrap().name, "SAR Aircraft");
    }

    #[test]
    fn test_custom_pattern() {
        let doc = DocumentNode::document(None).with_child(section("Message 21", vec![layout("-")]));
        let options = ExtractOptions::new().with_title_pattern(r"^Message (?P<ids>\d+)$");
        let catalog = extract(&doc, options).unwrap();
        assert_eq!(catalog.get(21).unwrap().name, "Message 21");
    }

    #[test]
    fn test_invalid_patterns() {
        let no_group = ExtractOptions::new().with_title_pattern(r"^Type (\d+)");
        assert!(matches!(
            MessageCatalogBuilder::new(no_group),
            Err(Error::InvalidPattern(_))
        ));
        let bad = ExtractOptions::new().with_title_pattern(r"^Type (?P<ids>\d+");
        assert!(matches!(MessageCatalogBuilder::new(bad), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_select_table() {
        let doc = sample();
        let tables = locate_with_titles(&doc);
        let found = select_table(&tables, "Base Station").unwrap();
        assert_eq!(found.title_or_empty(), "Type 4: Base Station Report");
        assert!(matches!(
            select_table(&tables, "^Type 27"),
            Err(Error::TableNotFound(_))
        ));
        assert!(matches!(select_table(&tables, "("), Err(Error::InvalidPattern(_))));
    }
}
