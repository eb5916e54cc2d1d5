//! HTML-comment markers and line classification.
//!
//! Two families of markers share the `<!-- … -->` syntax:
//!
//! - content tags (`<!-- sanskrit:devanagari -->`, `<!-- /english -->`)
//!   delimit the fields of a content block;
//! - metadata markers (`<!-- commentary: {json} -->`) sit on the line before
//!   a heading and carry what the heading text cannot: ids, explicit refs
//!   and full label maps.
//!
//! Any comment that is neither is an unknown tag and is ignored by readers.

use crate::model::{ContentField, Label, Script};
use serde::{Deserialize, Serialize};

const OPEN: &str = "<!--";
const CLOSE: &str = "-->";

/// Tag name of a content field, as written inside its marker.
pub fn field_tag(field: ContentField) -> &'static str {
    match field {
        ContentField::Sanskrit(Script::Devanagari) => "sanskrit:devanagari",
        ContentField::Sanskrit(Script::Roman) => "sanskrit:roman",
        ContentField::Sanskrit(Script::Kannada) => "sanskrit:kannada",
        ContentField::EnglishTranslation => "english_translation",
        ContentField::English => "english",
    }
}

fn field_for_tag(tag: &str) -> Option<ContentField> {
    ContentField::ORDER
        .into_iter()
        .find(|field| field_tag(*field) == tag)
}

pub fn open_tag(field: ContentField) -> String {
    format!("{OPEN} {} {CLOSE}", field_tag(field))
}

pub fn close_tag(field: ContentField) -> String {
    format!("{OPEN} /{} {CLOSE}", field_tag(field))
}

/// Inner text of a comment line, or `None` if the line is not a comment.
pub fn comment_body(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
    Some(inner.trim())
}

/// A comment line inside a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTag {
    Open(ContentField),
    Close(ContentField),
    Unknown,
}

pub fn parse_content_tag(body: &str) -> ContentTag {
    if let Some(name) = body.strip_prefix('/') {
        return field_for_tag(name.trim()).map_or(ContentTag::Unknown, ContentTag::Close);
    }
    field_for_tag(body).map_or(ContentTag::Unknown, ContentTag::Open)
}

/// Identifies the commentary a heading introduces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryMarker {
    pub commentary_id: String,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Type and label of a commentary prefatory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefatoryItemMarker {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

/// Ref and full label map of a prefatory, concluding or labelled passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMarker {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataMarker {
    Commentary(CommentaryMarker),
    CommentaryPrefatory(PrefatoryItemMarker),
    Section(SectionMarker),
}

impl MetadataMarker {
    pub fn kind(&self) -> &'static str {
        match self {
            MetadataMarker::Commentary(_) => "commentary",
            MetadataMarker::CommentaryPrefatory(_) => "commentary_prefatory",
            MetadataMarker::Section(_) => "section",
        }
    }

    /// Render as a single comment line with compact JSON.
    pub fn to_line(&self) -> serde_json::Result<String> {
        let payload = match self {
            MetadataMarker::Commentary(m) => serde_json::to_string(m)?,
            MetadataMarker::CommentaryPrefatory(m) => serde_json::to_string(m)?,
            MetadataMarker::Section(m) => serde_json::to_string(m)?,
        };
        Ok(format!("{OPEN} {}: {payload} {CLOSE}", self.kind()))
    }
}

/// Outcome of reading a comment body as a metadata marker.
#[derive(Debug)]
pub enum MarkerParse {
    /// Not a metadata marker at all (a content tag or an unknown comment).
    NotMetadata,
    Valid(MetadataMarker),
    /// A known marker kind whose payload could not be read.
    Malformed {
        kind: &'static str,
        error: serde_json::Error,
    },
}

pub fn parse_metadata_marker(body: &str) -> MarkerParse {
    let Some((kind, payload)) = body.split_once(':') else {
        return MarkerParse::NotMetadata;
    };
    let payload = payload.trim();

    fn read<T, F>(kind: &'static str, payload: &str, wrap: F) -> MarkerParse
    where
        T: for<'de> Deserialize<'de>,
        F: FnOnce(T) -> MetadataMarker,
    {
        match serde_json::from_str::<T>(payload) {
            Ok(marker) => MarkerParse::Valid(wrap(marker)),
            Err(error) => MarkerParse::Malformed { kind, error },
        }
    }

    match kind.trim() {
        "commentary" => read(
            "commentary",
            payload,
            MetadataMarker::Commentary,
        ),
        "commentary_prefatory" => read(
            "commentary_prefatory",
            payload,
            MetadataMarker::CommentaryPrefatory,
        ),
        "section" => read("section", payload, MetadataMarker::Section),
        _ => MarkerParse::NotMetadata,
    }
}

/// A line that would be misread as structure if written verbatim.
fn needs_escape(line: &str) -> bool {
    let rest = line.trim_start();
    rest.starts_with('#') || rest.starts_with(OPEN) || rest.starts_with('\\')
}

/// Insert a backslash before the first non-blank character when needed.
pub fn escape_line(line: &str) -> String {
    if needs_escape(line) {
        let indent = line.len() - line.trim_start().len();
        format!("{}\\{}", &line[..indent], &line[indent..])
    } else {
        line.to_string()
    }
}

/// Remove exactly one escaping backslash, if present.
pub fn unescape_line(line: &str) -> String {
    let rest = line.trim_start();
    match rest.strip_prefix('\\') {
        Some(unescaped) => {
            let indent = line.len() - rest.len();
            format!("{}{unescaped}", &line[..indent])
        }
        None => line.to_string(),
    }
}

/// An ATX heading line at `level` (1-based).
pub fn heading(level: usize, text: &str) -> String {
    format!("{} {text}", "#".repeat(level.max(1)))
        .trim_end()
        .to_string()
}

/// ATX heading level and text, for lines starting with `#`.
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let rest = line.trim_start();
    if !rest.starts_with('#') {
        return None;
    }
    let level = rest.chars().take_while(|c| *c == '#').count();
    Some((level, rest[level..].trim()))
}
