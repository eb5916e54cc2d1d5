//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing granthas.

use crate::error::{ConvertError, Result};
use crate::model::Grantha;
use crate::EncodeOptions;

/// Trait for grantha formats
///
/// Implementors provide conversion between a string representation and [`Grantha`].
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<Grantha> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "json", "markdown")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → Grantha)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Grantha → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a grantha
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<Grantha> {
        Err(ConvertError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a grantha into source text
    ///
    /// `options` selects the scripts and commentaries to write. Lossless
    /// formats may ignore it.
    fn serialize(&self, _doc: &Grantha, _options: &EncodeOptions) -> Result<String> {
        Err(ConvertError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
