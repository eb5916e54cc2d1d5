//! Lossless conversion of grantha documents between JSON and Markdown
//!
//!     A grantha is a canonical text (an upanishad, a stotra, a sutra collection) with a
//!     structure schema, passages addressed by dotted refs, optional prefatory and concluding
//!     material, and independently authored commentaries keyed to the same refs. JSON is the
//!     canonical form; Markdown is the form humans edit. This crate converts between the two
//!     and proves, with a content hash embedded in the Markdown, that nothing was lost or
//!     altered on the way.
//!
//!     This is a pure lib: no file access, no environment, no printing. It powers the grantha
//!     cli but supposes no shell.
//!
//! Architecture
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── hasher.rs               # Normalization and the validation hash
//!     ├── model                   # Grantha, passages, commentaries
//!     ├── common
//!     │   ├── hierarchy.rs        # Flat refs → arena tree
//!     │   └── commentary.rs       # Commentary ↔ passage inversion
//!     ├── formats
//!     │   ├── json
//!     │   └── markdown
//!     │       ├── content.rs      # Content-block codec
//!     │       ├── markers.rs      # Comment markers and line classification
//!     │       ├── frontmatter.rs
//!     │       ├── parser.rs       # Markdown → grantha
//!     │       ├── serializer.rs   # Grantha → Markdown
//!     │       └── mod.rs
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── fixtures
//!     ├── hash
//!     └── markdown
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     The hard part is reconstructing a nested heading layout from flat dotted refs and the
//!     reverse. Encoding builds an arena tree from the refs (./common/hierarchy.rs) and writes one
//!     heading level per structure level. Decoding walks the headings recursively, threading the
//!     depth and the enclosing ref explicitly, so the same code handles flat texts and texts four
//!     or more levels deep.
//!
//! Validation Hash
//!
//!     The hash covers the semantic characters of the selected view of the document only:
//!     whitespace, zero-width marks and punctuation are removed and the rest is NFC-normalized.
//!     The encoder embeds it in the frontmatter, and the decoder recomputes it over what it read
//!     and refuses to return a document whose hash differs.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod hasher;
pub mod model;
pub mod registry;

pub use error::{ConvertError, Result};
pub use format::Format;
pub use formats::{JsonFormat, MarkdownFormat};
pub use model::{
    Commentary, CommentaryPassage, CommentaryPrefatoryItem, Grantha, Passage, PassageContent,
    PassageType, Script, StructureLevel,
};
pub use registry::FormatRegistry;

/// What the Markdown encoder writes.
///
/// The default writes devanagari only and no commentaries. English fields
/// are always written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub scripts: Vec<Script>,
    /// Commentary ids to interleave. `None` writes no commentaries.
    pub commentaries: Option<Vec<String>>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            scripts: vec![Script::Devanagari],
            commentaries: None,
        }
    }
}

impl EncodeOptions {
    pub fn new(scripts: Vec<Script>) -> Self {
        EncodeOptions {
            scripts,
            commentaries: None,
        }
    }

    pub fn with_commentaries<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commentaries = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Select every commentary `doc` carries.
    pub fn all_commentaries(self, doc: &Grantha) -> Self {
        self.with_commentaries(doc.commentary_ids())
    }

    /// The document as it will read back after a Markdown round trip.
    pub fn selected_view(&self, doc: &Grantha) -> Grantha {
        doc.select(Some(self.scripts.as_slice()), self.commentaries.as_deref())
    }
}

/// Encode a grantha as Markdown with frontmatter and validation hash.
pub fn json_to_markdown(doc: &Grantha, options: &EncodeOptions) -> Result<String> {
    formats::markdown::serializer::serialize_to_markdown(doc, options)
}

/// Decode Markdown into a grantha.
///
/// Fails with [`ConvertError::ValidationHashMismatch`] when the recomputed
/// hash differs from the one in the frontmatter.
pub fn markdown_to_json(markdown: &str) -> Result<Grantha> {
    formats::markdown::parser::parse_from_markdown(markdown)
}

/// Whether `doc` matches the hash embedded in `markdown`, using the scripts
/// and commentaries recorded in its frontmatter.
///
/// Returns `Ok(false)` on a mismatch; errors only when the frontmatter
/// cannot be read.
pub fn verify(doc: &Grantha, markdown: &str) -> Result<bool> {
    formats::markdown::parser::verify_against_markdown(doc, markdown)
}
