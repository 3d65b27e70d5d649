use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised by the inline selector grammar used in link and image titles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A second `#id` was declared.
    #[error("selector `{selector}` declares id twice (`#{first}` and `#{second}`)")]
    DuplicateId {
        /// Full selector text
        selector: String,
        /// The id seen first
        first: String,
        /// The repeated id
        second: String,
    },
    /// Text remained after extracting ids, classes and attributes.
    #[error("bad selector `{selector}`: cannot parse `{rest}`")]
    Unparsed {
        /// Full selector text
        selector: String,
        /// Leftover text
        rest: String,
    },
}

/// Errors that can occur while tokenizing and rendering a document.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    Parse {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Malformed selector in a link or image title.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

impl MarkupError {
    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}
