//! The grantha document and its collections.

use super::content::{PassageContent, Script};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Per-script display text, e.g. `{"devanagari": "शान्तिपाठः"}`.
pub type Label = BTreeMap<String, String>;

/// A canonical text with its structure, passages and commentaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grantha {
    pub grantha_id: String,
    pub canonical_title: String,
    pub text_type: String,
    pub language: String,
    pub structure_levels: Vec<StructureLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants_available: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefatory_material: Vec<Passage>,
    pub passages: Vec<Passage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concluding_material: Vec<Passage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commentaries: Vec<Commentary>,
}

/// One level of the structure schema (e.g. Mundaka → Khanda → Mantra).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureLevel {
    pub key: String,
    #[serde(
        rename = "scriptNames",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub script_names: Option<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StructureLevel>,
}

impl StructureLevel {
    pub fn new(key: impl Into<String>) -> Self {
        StructureLevel {
            key: key.into(),
            script_names: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: StructureLevel) -> Self {
        self.children.push(child);
        self
    }

    /// Builds a linear schema from level names, outermost first.
    pub fn chain<I, S>(keys: I) -> Vec<StructureLevel>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        let mut current: Option<StructureLevel> = None;
        for key in keys.into_iter().rev() {
            let mut level = StructureLevel::new(key);
            if let Some(child) = current.take() {
                level.children.push(child);
            }
            current = Some(level);
        }
        current.into_iter().collect()
    }
}

/// Number of levels in a schema, following the first child at each level.
pub fn schema_depth(levels: &[StructureLevel]) -> usize {
    let mut depth = 0;
    let mut current = levels.first();
    while let Some(level) = current {
        depth += 1;
        current = level.children.first();
    }
    depth
}

/// Level name for a 0-indexed depth. Past the end of the schema the deepest
/// key is reused.
pub fn level_name(levels: &[StructureLevel], depth: usize) -> &str {
    let Some(mut current) = levels.first() else {
        return "Passage";
    };
    for _ in 0..depth {
        match current.children.first() {
            Some(child) => current = child,
            None => break,
        }
    }
    &current.key
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassageType {
    #[default]
    Main,
    Prefatory,
    Concluding,
}

/// A passage of the main text, or a prefatory/concluding item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub passage_type: PassageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    pub content: PassageContent,
}

impl Passage {
    pub fn main(reference: impl Into<String>, content: PassageContent) -> Self {
        Passage {
            reference: reference.into(),
            passage_type: PassageType::Main,
            label: None,
            content,
        }
    }

    pub fn section(
        passage_type: PassageType,
        reference: impl Into<String>,
        label: Option<Label>,
        content: PassageContent,
    ) -> Self {
        Passage {
            reference: reference.into(),
            passage_type,
            label,
            content,
        }
    }
}

/// An independently authored exposition keyed to the same refs as the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commentary {
    pub commentary_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary_title: Option<String>,
    #[serde(default, skip_serializing_if = "Label::is_empty")]
    pub commentator: Label,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub passages: Vec<CommentaryPassage>,
}

impl Commentary {
    /// Human-readable name used in commentary headings.
    pub fn display_name(&self) -> &str {
        ["devanagari", "latin", "roman"]
            .iter()
            .find_map(|key| self.commentator.get(*key))
            .map(String::as_str)
            .unwrap_or(&self.commentary_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryPassage {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub content: PassageContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefatory_material: Vec<CommentaryPrefatoryItem>,
}

/// Introductory material a commentator places before a passage's comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryPrefatoryItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    pub content: PassageContent,
}

impl CommentaryPrefatoryItem {
    /// Heading text: the devanagari label, any label, or the item type.
    pub fn heading_text(&self) -> &str {
        self.label
            .as_ref()
            .and_then(preferred_label)
            .unwrap_or(&self.item_type)
    }
}

/// The label shown in headings: devanagari when available, otherwise the
/// first entry in key order.
pub fn preferred_label(label: &Label) -> Option<&str> {
    label
        .get(Script::Devanagari.as_str())
        .or_else(|| label.values().next())
        .map(String::as_str)
}

/// Compares dotted refs component-wise as integers (`2.9` < `2.10`).
/// Components that are not integers fall back to string comparison.
pub fn compare_refs(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// The first adjacent pair of refs that is not strictly increasing under
/// [`compare_refs`], if any.
pub fn first_out_of_order<'a, I>(refs: I) -> Option<(&'a str, &'a str)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut previous: Option<&str> = None;
    for current in refs {
        if let Some(prev) = previous {
            if compare_refs(prev, current) != Ordering::Less {
                return Some((prev, current));
            }
        }
        previous = Some(current);
    }
    None
}

impl Grantha {
    /// Ids of every commentary carried by the document, in document order.
    pub fn commentary_ids(&self) -> Vec<String> {
        self.commentaries
            .iter()
            .map(|c| c.commentary_id.clone())
            .collect()
    }

    /// The document as it should look after a round trip under the given
    /// selection: unselected scripts and empty passages dropped, and only
    /// the requested commentaries kept.
    pub fn select(&self, scripts: Option<&[Script]>, commentary_ids: Option<&[String]>) -> Grantha {
        let keep = |passages: &[Passage]| -> Vec<Passage> {
            passages
                .iter()
                .map(|p| Passage {
                    content: p.content.select(scripts),
                    ..p.clone()
                })
                .filter(|p| !p.content.is_empty())
                .collect()
        };

        let commentaries = self
            .commentaries
            .iter()
            .filter(|c| commentary_ids.is_some_and(|ids| ids.contains(&c.commentary_id)))
            .map(|c| Commentary {
                passages: c
                    .passages
                    .iter()
                    .map(|p| CommentaryPassage {
                        reference: p.reference.clone(),
                        content: p.content.select(scripts),
                        prefatory_material: p
                            .prefatory_material
                            .iter()
                            .map(|item| CommentaryPrefatoryItem {
                                content: item.content.select(scripts),
                                ..item.clone()
                            })
                            .collect(),
                    })
                    .filter(|p| !p.content.is_empty() || !p.prefatory_material.is_empty())
                    .collect(),
                ..c.clone()
            })
            .filter(|c| !c.passages.is_empty())
            .collect();

        Grantha {
            prefatory_material: keep(&self.prefatory_material),
            passages: keep(&self.passages),
            concluding_material: keep(&self.concluding_material),
            commentaries,
            ..self.clone()
        }
    }
}
