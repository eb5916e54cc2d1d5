//! Error types for conversion operations

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting a grantha between formats.
///
/// Structural and hash errors abort the whole conversion. Marker-level
/// anomalies never surface here; they are logged and recovered locally.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// The Markdown input does not start with a `---` frontmatter block
    #[error("No YAML frontmatter found at the start of the document")]
    FrontmatterMissing,

    /// The opening `---` has no matching closing line
    #[error("Frontmatter block opened on line 1 is never closed")]
    FrontmatterUnterminated,

    /// The frontmatter parsed as YAML but its contents are unusable
    #[error("Invalid frontmatter: {0}")]
    InvalidFrontmatter(String),

    /// The body does not follow the heading grammar
    #[error("Structural error at line {line}: {reason}")]
    Structure { line: usize, reason: String },

    /// A passage ref disagrees with the declared structure depth
    #[error("Ref '{reference}' has {found} component(s) but the structure declares {expected} level(s)")]
    RefDepth {
        reference: String,
        expected: usize,
        found: usize,
    },

    /// The document has no main passages
    #[error("Grantha '{0}' has no passages")]
    NoPassages(String),

    /// A ref component is not a positive integer
    #[error("Ref '{0}' is not a dotted sequence of positive integers")]
    InvalidRef(String),

    /// Main passages are not in strictly increasing ref order
    #[error("Passage refs must be strictly increasing: '{previous}' is followed by '{current}'")]
    RefOrder { previous: String, current: String },

    /// Decoding succeeded but the recomputed content hash disagrees
    #[error(
        "Validation hash mismatch! Expected: {expected}, Got: {actual}. \
         This indicates data loss or corruption during conversion."
    )]
    ValidationHashMismatch { expected: String, actual: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConvertError {
    pub(crate) fn structure(line: usize, reason: impl Into<String>) -> Self {
        ConvertError::Structure {
            line,
            reason: reason.into(),
        }
    }

    /// True for errors that mean text was lost or altered, as opposed to
    /// input that could not be read at all.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, ConvertError::ValidationHashMismatch { .. })
    }
}
