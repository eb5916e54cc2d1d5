//! Commentary bookkeeping shared by the Markdown encoder and decoder.
//!
//! Encoding goes from "commentaries, each holding passages" to "passages,
//! each holding the commentaries on them": [`CommentaryMap`] inverts the
//! relation so the writer can emit every entry right after the passage it
//! comments on. Decoding goes back the other way: [`CommentaryAccumulator`]
//! collects entries per commentary id in encounter order and rebuilds the
//! commentary list once the scan is done.

use crate::model::{Commentary, CommentaryPassage, Label, Script};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One commentary passage scheduled for emission.
#[derive(Debug, Clone, Copy)]
pub struct CommentaryEntry<'a> {
    /// Position in document order (commentary, then passage).
    pub seq: usize,
    pub commentary: &'a Commentary,
    pub passage: &'a CommentaryPassage,
}

/// Commentary passages of the selected commentaries, keyed by ref.
#[derive(Debug, Default)]
pub struct CommentaryMap<'a> {
    by_ref: HashMap<&'a str, Vec<CommentaryEntry<'a>>>,
}

impl<'a> CommentaryMap<'a> {
    /// Index every passage of the commentaries named in `commentary_ids`.
    ///
    /// Passages whose selected content is empty and which carry no prefatory
    /// items are skipped: there would be nothing to emit for them.
    pub fn build(
        commentaries: &'a [Commentary],
        commentary_ids: Option<&[String]>,
        scripts: Option<&[Script]>,
    ) -> Self {
        let mut by_ref: HashMap<&'a str, Vec<CommentaryEntry<'a>>> = HashMap::new();
        let Some(ids) = commentary_ids else {
            return CommentaryMap { by_ref };
        };

        let selected = commentaries
            .iter()
            .filter(|c| ids.contains(&c.commentary_id));
        let mut seq = 0;
        for commentary in selected {
            for passage in &commentary.passages {
                let has_content = passage.content.fields(scripts).next().is_some();
                if has_content || !passage.prefatory_material.is_empty() {
                    by_ref
                        .entry(passage.reference.as_str())
                        .or_default()
                        .push(CommentaryEntry {
                            seq,
                            commentary,
                            passage,
                        });
                }
                seq += 1;
            }
        }
        CommentaryMap { by_ref }
    }

    /// Remove and return the entries for `reference`, in document order.
    pub fn take(&mut self, reference: &str) -> Vec<CommentaryEntry<'a>> {
        self.by_ref.remove(reference).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ref.is_empty()
    }

    /// Entries never claimed by a passage, in document order.
    pub fn into_orphans(self) -> Vec<CommentaryEntry<'a>> {
        let mut orphans: Vec<_> = self.by_ref.into_values().flatten().collect();
        orphans.sort_by_key(|entry| entry.seq);
        orphans
    }
}

/// Display metadata for a commentary, carried in the frontmatter because the
/// body only holds the commentary id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryMeta {
    pub commentary_id: String,
    #[serde(default, skip_serializing_if = "Label::is_empty")]
    pub commentator: Label,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl From<&Commentary> for CommentaryMeta {
    fn from(commentary: &Commentary) -> Self {
        CommentaryMeta {
            commentary_id: commentary.commentary_id.clone(),
            commentator: commentary.commentator.clone(),
            commentary_title: commentary.commentary_title.clone(),
            metadata: commentary.metadata.clone(),
        }
    }
}

/// Collects decoded commentary passages per commentary id.
#[derive(Debug, Default)]
pub struct CommentaryAccumulator {
    order: Vec<String>,
    passages: HashMap<String, Vec<CommentaryPassage>>,
}

impl CommentaryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, commentary_id: &str, passage: CommentaryPassage) {
        if !self.passages.contains_key(commentary_id) {
            self.order.push(commentary_id.to_string());
        }
        self.passages
            .entry(commentary_id.to_string())
            .or_default()
            .push(passage);
    }

    /// Rebuild the commentary list.
    ///
    /// Commentaries come out in `declared` order, followed by any id seen in
    /// the body but not declared. Ids that collected no passages are dropped.
    /// Display metadata is attached from `meta` by id.
    pub fn finish(mut self, declared: &[String], meta: &[CommentaryMeta]) -> Vec<Commentary> {
        let mut ids: Vec<String> = declared
            .iter()
            .filter(|id| self.passages.contains_key(id.as_str()))
            .cloned()
            .collect();
        for id in &self.order {
            if !ids.contains(id) {
                tracing::warn!(
                    commentary_id = %id,
                    "commentary found in body but not listed in frontmatter"
                );
                ids.push(id.clone());
            }
        }

        ids.into_iter()
            .filter_map(|id| {
                let passages = self.passages.remove(&id)?;
                let info = meta.iter().find(|m| m.commentary_id == id);
                Some(Commentary {
                    commentary_title: info.and_then(|m| m.commentary_title.clone()),
                    commentator: info.map(|m| m.commentator.clone()).unwrap_or_default(),
                    metadata: info.and_then(|m| m.metadata.clone()),
                    commentary_id: id,
                    passages,
                })
            })
            .collect()
    }
}
