//! JSON format: the canonical, lossless representation.
//!
//! Output is pretty-printed with non-ASCII text written as-is and a trailing
//! newline, so files diff cleanly.

use crate::error::Result;
use crate::format::Format;
use crate::model::Grantha;
use crate::EncodeOptions;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Format implementation for canonical grantha JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFormat {
    /// Spaces per indentation level.
    pub indent: usize,
}

impl Default for JsonFormat {
    fn default() -> Self {
        JsonFormat { indent: 2 }
    }
}

impl JsonFormat {
    pub fn with_indent(indent: usize) -> Self {
        JsonFormat { indent }
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Canonical grantha JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Grantha> {
        Ok(serde_json::from_str(source)?)
    }

    /// Writes the whole document; JSON carries every script and commentary.
    fn serialize(&self, doc: &Grantha, _options: &EncodeOptions) -> Result<String> {
        let indent = " ".repeat(self.indent);
        let mut out = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
        doc.serialize(&mut serializer)?;
        out.push(b'\n');
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
