//! Core data structures for grantha documents.
//!
//! These types mirror the canonical JSON shape one-to-one; both formats
//! parse into and serialize from them.

pub mod content;
pub mod document;

pub use content::{text_lines, ContentField, PassageContent, SanskritText, Script};
pub use document::{
    compare_refs, first_out_of_order, level_name, preferred_label, schema_depth,
    Commentary, CommentaryPassage, CommentaryPrefatoryItem, Grantha, Label, Passage, PassageType,
    StructureLevel,
};
