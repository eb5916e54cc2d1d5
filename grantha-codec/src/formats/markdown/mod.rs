//! Markdown format implementation
//!
//! This module implements lossless, human-editable conversion between a grantha and Markdown.
//!
//! # Element Mapping Table
//!
//! | Grantha Element        | Markdown Equivalent                          | Notes                                   |
//! |------------------------|----------------------------------------------|-----------------------------------------|
//! | Identity, schema       | YAML frontmatter                             | Also records scripts, commentaries, hash |
//! | Structure level node   | Heading `## Khanda 1.2`                      | Heading depth = schema depth            |
//! | Passage content        | `<!-- sanskrit:devanagari -->` … blocks      | One marker pair per present field       |
//! | Prefatory / concluding | `# Prefatory: ref (script: "label")`         | Preceded by a `section` marker          |
//! | Commentary passage     | `### Commentary: <name>`                     | Preceded by a `commentary` marker       |
//! | Commentary prefatory   | One heading below the commentary             | Preceded by `commentary_prefatory`      |
//!
//! # Selection
//!
//! Only the scripts and commentaries named in [`EncodeOptions`] are written. English fields are
//! always written. The decoder reads the selection back from the frontmatter, so the document
//! it returns is the selected view of the original, and the validation hash covers exactly that
//! view.
//!
//! # Line-based grammar
//!
//! Passage text is opaque and is never read as Markdown. The body is scanned line by line, and
//! the only escaping it needs is a backslash before content lines that start with `#`, `<!--`
//! or `\`.

pub mod content;
pub mod frontmatter;
pub mod markers;
pub mod parser;
pub mod serializer;

use crate::error::Result;
use crate::format::Format;
use crate::model::Grantha;
use crate::EncodeOptions;

/// Format implementation for grantha Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Human-editable Markdown with YAML frontmatter and a validation hash"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Grantha> {
        parser::parse_from_markdown(source)
    }

    fn serialize(&self, doc: &Grantha, options: &EncodeOptions) -> Result<String> {
        serializer::serialize_to_markdown(doc, options)
    }
}
