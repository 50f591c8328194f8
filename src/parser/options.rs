//! Reading options and configuration.

/// Options for reading a document source into a tree.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to keep paragraph nodes in the tree
    pub keep_paragraphs: bool,

    /// Whether to trim surrounding whitespace from table cells
    pub trim_cells: bool,
}

impl ReadOptions {
    /// Create new read options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (close unterminated blocks at end of input).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable paragraph nodes.
    pub fn with_paragraphs(mut self, keep: bool) -> Self {
        self.keep_paragraphs = keep;
        self
    }

    /// Drop paragraph nodes, keeping only structure and tables.
    pub fn tables_only(mut self) -> Self {
        self.keep_paragraphs = false;
        self
    }

    /// Enable or disable cell trimming.
    pub fn with_trim_cells(mut self, trim: bool) -> Self {
        self.trim_cells = trim;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            keep_paragraphs: true,
            trim_cells: true,
        }
    }
}

/// Error handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Report invalid content and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_options_builder() {
        let options = ReadOptions::new()
            .lenient()
            .tables_only()
            .with_trim_cells(false);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.keep_paragraphs);
        assert!(!options.trim_cells);
    }

    #[test]
    fn test_default_options() {
        let options = ReadOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.keep_paragraphs);
        assert!(options.trim_cells);
    }
}
