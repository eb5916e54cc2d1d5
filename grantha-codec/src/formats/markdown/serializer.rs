//! Markdown serialization (grantha → Markdown)
//!
//! Pipeline: passages → hierarchy tree → headings and content blocks, with
//! selected commentaries interleaved right after the passage they comment on.
//!
//! Body layout, top to bottom:
//!
//! 1. prefatory sections (`# Prefatory: <ref> (<script>: "<label>")`)
//! 2. the main hierarchy, one heading level per structure level
//! 3. concluding sections (`# Concluding: …`)
//! 4. commentary passages whose ref matched no passage
//!
//! Every heading that needs more than its text to be read back is preceded
//! by a metadata marker line (see [`super::markers`]).

use super::content::format_content;
use super::frontmatter::{join_frontmatter, Frontmatter};
use super::markers::{
    heading, CommentaryMarker, MetadataMarker, PrefatoryItemMarker, SectionMarker,
};
use crate::common::commentary::{CommentaryEntry, CommentaryMap};
use crate::common::hierarchy::{build_hierarchy_tree, HierarchyTree, NodeId};
use crate::error::{ConvertError, Result};
use crate::hasher::{format_hash, hash_grantha};
use crate::model::{
    first_out_of_order, level_name, Grantha, Label, Passage, PassageContent, PassageType, Script,
    StructureLevel,
};
use crate::EncodeOptions;
use std::collections::HashMap;

/// Heading text prefix of prefatory sections.
pub const PREFATORY_PREFIX: &str = "Prefatory:";
/// Heading text prefix of concluding sections.
pub const CONCLUDING_PREFIX: &str = "Concluding:";
/// Heading text prefix of commentary entries.
pub const COMMENTARY_PREFIX: &str = "Commentary:";

/// Serialize a grantha to Markdown with YAML frontmatter.
///
/// The source document must carry at least one main passage. Its selected
/// view may still come out empty, and the decoder accepts that.
pub fn serialize_to_markdown(doc: &Grantha, options: &EncodeOptions) -> Result<String> {
    let scripts = options.scripts.as_slice();
    let commentary_ids = options.commentaries.as_deref();

    if doc.passages.is_empty() {
        return Err(ConvertError::NoPassages(doc.grantha_id.clone()));
    }

    if let Some((previous, current)) =
        first_out_of_order(doc.passages.iter().map(|p| p.reference.as_str()))
    {
        return Err(ConvertError::RefOrder {
            previous: previous.to_string(),
            current: current.to_string(),
        });
    }
    let tree = build_hierarchy_tree(&doc.structure_levels, &doc.passages)?;

    tracing::debug!(
        grantha_id = %doc.grantha_id,
        passages = doc.passages.len(),
        scripts = ?scripts,
        commentaries = ?commentary_ids,
        "encoding grantha to markdown"
    );

    let digest = hash_grantha(doc, Some(scripts), commentary_ids);
    let frontmatter =
        Frontmatter::for_document(doc, scripts, commentary_ids, format_hash(&digest));

    let mut writer = BodyWriter {
        levels: &doc.structure_levels,
        scripts: Some(scripts),
        commentaries: CommentaryMap::build(&doc.commentaries, commentary_ids, Some(scripts)),
        last_seq: HashMap::new(),
        out: String::new(),
    };
    writer.write_sections(PassageType::Prefatory, &doc.prefatory_material)?;
    for child in tree.children(HierarchyTree::ROOT) {
        writer.write_node(&tree, child, 0)?;
    }
    writer.write_sections(PassageType::Concluding, &doc.concluding_material)?;
    writer.write_orphans()?;

    Ok(join_frontmatter(&frontmatter.to_yaml()?, &writer.finish()))
}

/// `<Level> <ref>` heading text for a main hierarchy node.
pub fn main_heading_text(levels: &[StructureLevel], depth: usize, reference: &str) -> String {
    format!("{} {reference}", level_name(levels, depth))
}

/// Heading text of a prefatory or concluding section.
pub fn section_heading_text(kind: PassageType, reference: &str, label: Option<&Label>) -> String {
    let prefix = match kind {
        PassageType::Concluding => CONCLUDING_PREFIX,
        PassageType::Prefatory | PassageType::Main => PREFATORY_PREFIX,
    };
    let shown = label.and_then(|label| {
        label
            .get_key_value(Script::Devanagari.as_str())
            .or_else(|| label.iter().next())
    });
    match shown {
        Some((script, text)) => format!("{prefix} {reference} ({script}: \"{text}\")"),
        None => format!("{prefix} {reference}"),
    }
}

struct BodyWriter<'a> {
    levels: &'a [StructureLevel],
    scripts: Option<&'a [Script]>,
    commentaries: CommentaryMap<'a>,
    /// Last emitted position per commentary id.
    last_seq: HashMap<&'a str, usize>,
    out: String,
}

impl<'a> BodyWriter<'a> {
    fn line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn marker(&mut self, marker: &MetadataMarker) -> Result<()> {
        let line = marker.to_line()?;
        self.line(&line);
        Ok(())
    }

    fn heading(&mut self, level: usize, text: &str) {
        self.line(&heading(level, text));
        self.out.push('\n');
    }

    fn content(&mut self, content: &PassageContent) {
        self.out.push_str(&format_content(content, self.scripts));
    }

    fn write_sections(&mut self, kind: PassageType, items: &'a [Passage]) -> Result<()> {
        for item in items {
            let entries = self.commentaries.take(&item.reference);
            if item.content.fields(self.scripts).next().is_none() && entries.is_empty() {
                continue;
            }
            self.marker(&MetadataMarker::Section(SectionMarker {
                reference: item.reference.clone(),
                label: item.label.clone(),
            }))?;
            self.heading(
                1,
                &section_heading_text(kind, &item.reference, item.label.as_ref()),
            );
            self.content(&item.content);
            self.write_commentaries(entries, 2)?;
        }
        Ok(())
    }

    /// Emit node `id` at 0-indexed `depth`, then its children at `depth + 1`.
    fn write_node(
        &mut self,
        tree: &HierarchyTree<'a>,
        id: NodeId,
        depth: usize,
    ) -> Result<()> {
        let node = tree.node(id);
        if let Some(label) = node.passages.iter().find_map(|p| p.label.as_ref()) {
            self.marker(&MetadataMarker::Section(SectionMarker {
                reference: node.reference.clone(),
                label: Some(label.clone()),
            }))?;
        }
        self.heading(
            depth + 1,
            &main_heading_text(self.levels, depth, &node.reference),
        );
        for passage in &node.passages {
            self.content(&passage.content);
        }

        let entries = self.commentaries.take(&node.reference);
        self.write_commentaries(entries, depth + 2)?;

        for child in tree.children(id) {
            self.write_node(tree, child, depth + 1)?;
        }
        Ok(())
    }

    /// Emit commentary entries with their headings at `level`.
    fn write_commentaries(&mut self, entries: Vec<CommentaryEntry<'a>>, level: usize) -> Result<()> {
        for entry in entries {
            let id = entry.commentary.commentary_id.as_str();
            if let Some(last) = self.last_seq.insert(id, entry.seq) {
                if last > entry.seq {
                    tracing::warn!(
                        commentary_id = %id,
                        reference = %entry.passage.reference,
                        "commentary passages do not follow the order of the text; \
                         the decoded document will list them in text order"
                    );
                }
            }

            self.marker(&MetadataMarker::Commentary(CommentaryMarker {
                commentary_id: id.to_string(),
                reference: Some(entry.passage.reference.clone()),
            }))?;
            self.heading(
                level,
                &format!("{COMMENTARY_PREFIX} {}", entry.commentary.display_name()),
            );
            self.content(&entry.passage.content);

            for item in &entry.passage.prefatory_material {
                self.marker(&MetadataMarker::CommentaryPrefatory(PrefatoryItemMarker {
                    item_type: item.item_type.clone(),
                    label: item.label.clone(),
                }))?;
                self.heading(level + 1, item.heading_text());
                self.content(&item.content);
            }
        }
        Ok(())
    }

    fn write_orphans(&mut self) -> Result<()> {
        let orphans = std::mem::take(&mut self.commentaries).into_orphans();
        for entry in &orphans {
            tracing::warn!(
                commentary_id = %entry.commentary.commentary_id,
                reference = %entry.passage.reference,
                "commentary ref matches no passage; writing it after the text"
            );
        }
        self.write_commentaries(orphans, 1)
    }

    fn finish(self) -> String {
        let body = self.out.trim_end();
        if body.is_empty() {
            String::new()
        } else {
            format!("{body}\n")
        }
    }
}
