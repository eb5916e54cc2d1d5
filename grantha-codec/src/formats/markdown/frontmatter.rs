//! YAML frontmatter: everything the body cannot express.
//!
//! The frontmatter carries the document identity, the structure schema that
//! maps heading depth to level names, the script and commentary selection
//! the body was written with, and the validation hash over that selection.

use crate::common::commentary::CommentaryMeta;
use crate::error::{ConvertError, Result};
use crate::model::{Grantha, Script, StructureLevel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DELIMITER: &str = "---";

/// Frontmatter fields, in the order they are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub grantha_id: String,
    pub canonical_title: String,
    pub text_type: String,
    pub language: String,
    pub scripts: Vec<Script>,
    pub structure_levels: Vec<StructureLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants_available: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commentaries: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commentaries_metadata: Vec<CommentaryMeta>,
    pub validation_hash: String,
}

impl Frontmatter {
    /// Frontmatter for `doc` encoded with `scripts` and the commentaries
    /// named in `commentary_ids` that the document actually carries.
    pub fn for_document(
        doc: &Grantha,
        scripts: &[Script],
        commentary_ids: Option<&[String]>,
        validation_hash: String,
    ) -> Self {
        let included: Vec<_> = doc
            .commentaries
            .iter()
            .filter(|c| commentary_ids.is_some_and(|ids| ids.contains(&c.commentary_id)))
            .collect();

        Frontmatter {
            grantha_id: doc.grantha_id.clone(),
            canonical_title: doc.canonical_title.clone(),
            text_type: doc.text_type.clone(),
            language: doc.language.clone(),
            scripts: scripts.to_vec(),
            structure_levels: doc.structure_levels.clone(),
            aliases: doc.aliases.clone(),
            variants_available: doc.variants_available.clone(),
            metadata: doc.metadata.clone(),
            commentaries: included.iter().map(|c| c.commentary_id.clone()).collect(),
            commentaries_metadata: included.into_iter().map(CommentaryMeta::from).collect(),
            validation_hash,
        }
    }

    /// Document skeleton with every collection empty.
    pub fn to_skeleton(&self) -> Grantha {
        Grantha {
            grantha_id: self.grantha_id.clone(),
            canonical_title: self.canonical_title.clone(),
            text_type: self.text_type.clone(),
            language: self.language.clone(),
            structure_levels: self.structure_levels.clone(),
            aliases: self.aliases.clone(),
            variants_available: self.variants_available.clone(),
            metadata: self.metadata.clone(),
            prefatory_material: Vec::new(),
            passages: Vec::new(),
            concluding_material: Vec::new(),
            commentaries: Vec::new(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ConvertError::InvalidFrontmatter(e.to_string()))
    }
}

/// A Markdown document split at its frontmatter delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument<'a> {
    pub yaml: String,
    pub body: Vec<&'a str>,
    /// 1-based line number of `body[0]` in the original text.
    pub first_body_line: usize,
}

/// Separate the frontmatter block from the body.
///
/// Leading blank lines and a byte-order mark are tolerated before the
/// opening delimiter.
pub fn split_frontmatter(source: &str) -> Result<SplitDocument<'_>> {
    let source = source.trim_start_matches('\u{FEFF}');
    let lines: Vec<&str> = source.lines().collect();

    let open = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .filter(|&i| lines[i].trim_end() == DELIMITER)
        .ok_or(ConvertError::FrontmatterMissing)?;

    let close = lines[open + 1..]
        .iter()
        .position(|line| line.trim_end() == DELIMITER)
        .map(|offset| open + 1 + offset)
        .ok_or(ConvertError::FrontmatterUnterminated)?;

    Ok(SplitDocument {
        yaml: lines[open + 1..close].join("\n"),
        body: lines[close + 1..].to_vec(),
        first_body_line: close + 2,
    })
}

/// Assemble frontmatter and body into the final document text.
pub fn join_frontmatter(yaml: &str, body: &str) -> String {
    format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{body}")
}
