//! Extraction options and configuration.

use crate::parser::ErrorMode;

/// Default pattern for message section titles.
///
/// Matches "Type 4: Base Station Report", "Types 1, 2 and 3: Position
/// Report Class A" and the serial-comma "Types 1, 2, and 3". The `ids` group lists the message type ids and the
/// `name` group is the message name.
pub const DEFAULT_TITLE_PATTERN: &str =
    r"^Types?\s+(?P<ids>\d+(?:\s*(?:,\s*and|,|and)\s*\d+)*)\s*:?\s*(?P<name>.*)$";

/// Captions of the code tables collected when lookups are enabled.
pub const DEFAULT_LOOKUP_CAPTIONS: [&str; 2] = ["Navigation Status", "Ship Type"];

/// Options for building a message catalog.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Whether a failing table aborts the run or is skipped
    pub error_mode: ErrorMode,

    /// Regex selecting message sections by title; must have an `ids` group
    pub title_pattern: String,

    /// Whether to collect code lookup tables
    pub include_lookups: bool,

    /// Captions of lookup tables to collect
    pub lookup_captions: Vec<String>,

    /// Drop rows whose `Field` cell is `?` instead of failing on them
    pub skip_placeholder_rows: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip failing tables).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the title pattern.
    pub fn with_title_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.title_pattern = pattern.into();
        self
    }

    /// Enable or disable lookup table collection.
    pub fn with_lookups(mut self, include: bool) -> Self {
        self.include_lookups = include;
        self
    }

    /// Drop `?` placeholder rows from layout tables.
    pub fn with_placeholder_rows_skipped(mut self, skip: bool) -> Self {
        self.skip_placeholder_rows = skip;
        self
    }

    /// Set the lookup captions to collect.
    pub fn with_lookup_captions<S: Into<String>>(mut self, captions: impl IntoIterator<Item = S>) -> Self {
        self.lookup_captions = captions.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            title_pattern: DEFAULT_TITLE_PATTERN.to_string(),
            include_lookups: false,
            lookup_captions: DEFAULT_LOOKUP_CAPTIONS.iter().map(|c| c.to_string()).collect(),
            skip_placeholder_rows: false,
        }
    }
}
