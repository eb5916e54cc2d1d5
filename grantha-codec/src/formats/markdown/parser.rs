//! Markdown parsing (Markdown → grantha)
//!
//! Pipeline: frontmatter split → heading blocks → recursive descent over
//! heading levels → hash check.
//!
//! The body is first cut into blocks, one per heading, each holding the
//! metadata marker that preceded the heading (if any) and the lines up to
//! the next heading. The reader then walks the blocks with an explicit
//! `(depth, ref prefix)` pair: a main heading at depth `d` must carry a ref
//! of `d + 1` components extending the enclosing ref. Commentary headings
//! are recognised by their marker, never by their text.
//!
//! Structural problems abort with the offending line number. Marker-level
//! problems are logged and the affected heading is read without its marker.

use super::content::parse_content_block;
use super::frontmatter::{split_frontmatter, Frontmatter};
use super::markers::{
    comment_body, parse_heading, parse_metadata_marker, CommentaryMarker, MarkerParse,
    MetadataMarker,
};
use super::serializer::{COMMENTARY_PREFIX, CONCLUDING_PREFIX, PREFATORY_PREFIX};
use crate::common::commentary::CommentaryAccumulator;
use crate::common::hierarchy::parse_ref;
use crate::error::{ConvertError, Result};
use crate::hasher::{hash_grantha, parse_hash};
use crate::model::{
    compare_refs, first_out_of_order, schema_depth, CommentaryPassage, CommentaryPrefatoryItem,
    Grantha, Label, Passage, PassageType, Script,
};

/// Parse Markdown with frontmatter into a grantha, verifying its hash.
pub fn parse_from_markdown(source: &str) -> Result<Grantha> {
    let split = split_frontmatter(source)?;
    let frontmatter = Frontmatter::from_yaml(&split.yaml)?;
    let expected = expected_digest(&frontmatter)?.to_string();

    let blocks = scan_blocks(&split.body, split.first_body_line);
    let mut reader = BodyReader {
        blocks: &blocks,
        pos: 0,
        schema_depth: schema_depth(&frontmatter.structure_levels),
        prefatory: Vec::new(),
        passages: Vec::new(),
        concluding: Vec::new(),
        commentaries: CommentaryAccumulator::new(),
    };
    reader.read_body()?;

    let mut passages = reader.passages;
    passages.sort_by(|a, b| compare_refs(&a.reference, &b.reference));
    if let Some((previous, current)) =
        first_out_of_order(passages.iter().map(|p| p.reference.as_str()))
    {
        return Err(ConvertError::RefOrder {
            previous: previous.to_string(),
            current: current.to_string(),
        });
    }

    let mut doc = frontmatter.to_skeleton();
    doc.prefatory_material = reader.prefatory;
    doc.passages = passages;
    doc.concluding_material = reader.concluding;
    doc.commentaries = reader
        .commentaries
        .finish(&frontmatter.commentaries, &frontmatter.commentaries_metadata);

    tracing::debug!(
        grantha_id = %doc.grantha_id,
        passages = doc.passages.len(),
        prefatory = doc.prefatory_material.len(),
        concluding = doc.concluding_material.len(),
        commentaries = doc.commentaries.len(),
        "decoded markdown body"
    );

    let actual = hash_grantha(
        &doc,
        Some(frontmatter.scripts.as_slice()),
        Some(frontmatter.commentaries.as_slice()),
    );
    if actual != expected {
        return Err(ConvertError::ValidationHashMismatch { expected, actual });
    }
    Ok(doc)
}

/// Whether `doc` hashes to the value embedded in `markdown`'s frontmatter
/// under the scripts and commentaries recorded there.
pub fn verify_against_markdown(doc: &Grantha, markdown: &str) -> Result<bool> {
    let split = split_frontmatter(markdown)?;
    let frontmatter = Frontmatter::from_yaml(&split.yaml)?;
    let expected = expected_digest(&frontmatter)?;
    let actual = hash_grantha(
        doc,
        Some(frontmatter.scripts.as_slice()),
        Some(frontmatter.commentaries.as_slice()),
    );
    Ok(actual == expected)
}

/// Digest part of the frontmatter's validation hash.
fn expected_digest(frontmatter: &Frontmatter) -> Result<&str> {
    parse_hash(&frontmatter.validation_hash).ok_or_else(|| {
        ConvertError::InvalidFrontmatter(format!(
            "validation_hash '{}' is not of the form sha256:<64 hex digits>",
            frontmatter.validation_hash
        ))
    })
}

/// A heading, the marker attached to it and the lines below it.
#[derive(Debug, Clone, PartialEq)]
struct Block<'a> {
    /// 1-based line number of the heading.
    line: usize,
    level: usize,
    title: &'a str,
    marker: Option<MetadataMarker>,
    body: Vec<&'a str>,
}

fn scan_blocks<'a>(lines: &[&'a str], first_line: usize) -> Vec<Block<'a>> {
    let mut blocks: Vec<Block<'a>> = Vec::new();
    let mut pending: Option<(usize, MetadataMarker)> = None;

    for (offset, &line) in lines.iter().enumerate() {
        let number = first_line + offset;

        if let Some((level, title)) = parse_heading(line) {
            blocks.push(Block {
                line: number,
                level,
                title,
                marker: pending.take().map(|(_, marker)| marker),
                body: Vec::new(),
            });
            continue;
        }

        if let Some(body) = comment_body(line) {
            match parse_metadata_marker(body) {
                MarkerParse::Valid(marker) => {
                    if let Some((at, stale)) = pending.replace((number, marker)) {
                        warn_dangling(at, &stale);
                    }
                    continue;
                }
                MarkerParse::Malformed { kind, error } => {
                    tracing::warn!(
                        line = number,
                        kind,
                        %error,
                        "malformed metadata marker; the next heading is read without it"
                    );
                    if let Some((at, stale)) = pending.take() {
                        warn_dangling(at, &stale);
                    }
                    continue;
                }
                MarkerParse::NotMetadata => {}
            }
        }

        if !line.trim().is_empty() {
            if let Some((at, stale)) = pending.take() {
                warn_dangling(at, &stale);
            }
        }
        match blocks.last_mut() {
            Some(block) => block.body.push(line),
            None if !line.trim().is_empty() => {
                tracing::warn!(line = number, "text before the first heading is ignored");
            }
            None => {}
        }
    }

    if let Some((at, stale)) = pending {
        warn_dangling(at, &stale);
    }
    blocks
}

fn warn_dangling(line: usize, marker: &MetadataMarker) {
    tracing::warn!(
        line,
        kind = marker.kind(),
        "metadata marker is not followed by a heading; ignored"
    );
}

struct BodyReader<'b, 'a> {
    blocks: &'b [Block<'a>],
    pos: usize,
    schema_depth: usize,
    prefatory: Vec<Passage>,
    passages: Vec<Passage>,
    concluding: Vec<Passage>,
    commentaries: CommentaryAccumulator,
}

impl<'b, 'a> BodyReader<'b, 'a> {
    fn peek(&self) -> Option<&'b Block<'a>> {
        self.blocks.get(self.pos)
    }

    /// Consume the next block if it sits below `parent_level`.
    ///
    /// A block more than one level below is a structural error.
    fn next_child(&mut self, parent_level: usize) -> Result<Option<&'b Block<'a>>> {
        let Some(block) = self.peek() else {
            return Ok(None);
        };
        if block.level <= parent_level {
            return Ok(None);
        }
        if block.level > parent_level + 1 {
            return Err(ConvertError::structure(
                block.line,
                format!(
                    "heading level {} skips a level below level {parent_level}",
                    block.level
                ),
            ));
        }
        self.pos += 1;
        Ok(Some(block))
    }

    fn read_body(&mut self) -> Result<()> {
        while let Some(block) = self.next_child(0)? {
            if let Some(rest) = block.title.strip_prefix(PREFATORY_PREFIX) {
                self.read_section(block, PassageType::Prefatory, rest)?;
            } else if let Some(rest) = block.title.strip_prefix(CONCLUDING_PREFIX) {
                self.read_section(block, PassageType::Concluding, rest)?;
            } else if let Some(MetadataMarker::Commentary(marker)) = &block.marker {
                self.read_commentary(block, marker, None)?;
            } else if block.title.starts_with(COMMENTARY_PREFIX) {
                self.skip_unmarked_commentary(block);
            } else {
                self.read_main(block, 0, &[])?;
            }
        }
        Ok(())
    }

    fn read_section(&mut self, block: &'b Block<'a>, kind: PassageType, rest: &str) -> Result<()> {
        let (reference, label) = match &block.marker {
            Some(MetadataMarker::Section(marker)) => {
                (marker.reference.clone(), marker.label.clone())
            }
            other => {
                tracing::warn!(
                    line = block.line,
                    found = other.as_ref().map(MetadataMarker::kind),
                    "section heading has no section marker; reading ref and label from the heading"
                );
                parse_section_heading(rest)
            }
        };

        while let Some(child) = self.next_child(block.level)? {
            self.read_attachment(child, &reference)?;
        }

        let content = parse_content_block(block.body.iter().copied());
        if !content.is_empty() {
            let section = Passage::section(kind, reference, label, content);
            match kind {
                PassageType::Concluding => self.concluding.push(section),
                PassageType::Prefatory | PassageType::Main => self.prefatory.push(section),
            }
        }
        Ok(())
    }

    /// A heading below a section or leaf passage: only commentaries belong there.
    fn read_attachment(&mut self, block: &'b Block<'a>, reference: &str) -> Result<()> {
        match &block.marker {
            Some(MetadataMarker::Commentary(marker)) => {
                self.read_commentary(block, marker, Some(reference))
            }
            _ if block.title.starts_with(COMMENTARY_PREFIX) => {
                self.skip_unmarked_commentary(block);
                Ok(())
            }
            _ => Err(ConvertError::structure(
                block.line,
                format!(
                    "heading '{}' is nested below '{reference}', which cannot have sub-headings \
                     other than commentaries",
                    block.title
                ),
            )),
        }
    }

    /// Read a main hierarchy heading at 0-indexed `depth` whose ref must
    /// extend `prefix`, and everything nested below it.
    fn read_main(&mut self, block: &'b Block<'a>, depth: usize, prefix: &[u64]) -> Result<()> {
        let reference = heading_ref(block.title);
        let components = parse_ref(reference).map_err(|_| {
            ConvertError::structure(
                block.line,
                format!("heading '{}' does not end in a dotted ref", block.title),
            )
        })?;
        if components.len() != depth + 1 || components[..depth] != *prefix {
            let parent = if prefix.is_empty() {
                "the document root".to_string()
            } else {
                join_ref(prefix)
            };
            return Err(ConvertError::structure(
                block.line,
                format!("ref '{reference}' is not nested directly under {parent}"),
            ));
        }

        let label = match &block.marker {
            Some(MetadataMarker::Section(marker)) => marker.label.clone(),
            Some(other) => {
                tracing::warn!(
                    line = block.line,
                    kind = other.kind(),
                    "unexpected metadata marker before a passage heading; ignored"
                );
                None
            }
            None => None,
        };

        let is_leaf = depth + 1 == self.schema_depth;
        while let Some(child) = self.next_child(block.level)? {
            if is_leaf {
                self.read_attachment(child, reference)?;
                continue;
            }
            match &child.marker {
                Some(MetadataMarker::Commentary(marker)) => {
                    self.read_commentary(child, marker, Some(reference))?;
                }
                _ if child.title.starts_with(COMMENTARY_PREFIX) => {
                    self.skip_unmarked_commentary(child);
                }
                _ => self.read_main(child, depth + 1, &components)?,
            }
        }

        let content = parse_content_block(block.body.iter().copied());
        if content.is_empty() {
            return Ok(());
        }
        if !is_leaf {
            return Err(ConvertError::RefDepth {
                reference: reference.to_string(),
                expected: self.schema_depth,
                found: components.len(),
            });
        }
        self.passages.push(Passage {
            reference: reference.to_string(),
            passage_type: PassageType::Main,
            label,
            content,
        });
        Ok(())
    }

    fn read_commentary(
        &mut self,
        block: &'b Block<'a>,
        marker: &CommentaryMarker,
        enclosing: Option<&str>,
    ) -> Result<()> {
        let reference = marker
            .reference
            .as_deref()
            .or(enclosing)
            .map(str::to_string);

        let mut prefatory_material = Vec::new();
        while let Some(item) = self.next_child(block.level)? {
            if let Some(nested) = self.peek().filter(|next| next.level > item.level) {
                return Err(ConvertError::structure(
                    nested.line,
                    "commentary prefatory items cannot have sub-headings",
                ));
            }
            prefatory_material.push(read_prefatory_item(item));
        }

        let Some(reference) = reference else {
            tracing::warn!(
                line = block.line,
                commentary_id = %marker.commentary_id,
                "commentary has no ref and no enclosing passage; skipped"
            );
            return Ok(());
        };

        let content = parse_content_block(block.body.iter().copied());
        if content.is_empty() && prefatory_material.is_empty() {
            return Ok(());
        }
        self.commentaries.push(
            &marker.commentary_id,
            CommentaryPassage {
                reference,
                content,
                prefatory_material,
            },
        );
        Ok(())
    }

    fn skip_unmarked_commentary(&mut self, block: &'b Block<'a>) {
        tracing::warn!(
            line = block.line,
            title = block.title,
            "commentary heading has no valid commentary marker; skipping it"
        );
        while self.peek().is_some_and(|next| next.level > block.level) {
            self.pos += 1;
        }
    }
}

fn read_prefatory_item(block: &Block<'_>) -> CommentaryPrefatoryItem {
    let (item_type, label) = match &block.marker {
        Some(MetadataMarker::CommentaryPrefatory(marker)) => {
            (marker.item_type.clone(), marker.label.clone())
        }
        _ => {
            tracing::warn!(
                line = block.line,
                "commentary sub-heading has no commentary_prefatory marker; \
                 using the heading text as its label"
            );
            let label = (!block.title.is_empty()).then(|| {
                Label::from([(Script::Devanagari.to_string(), block.title.to_string())])
            });
            (String::new(), label)
        }
    };
    CommentaryPrefatoryItem {
        item_type,
        label,
        content: parse_content_block(block.body.iter().copied()),
    }
}

/// The ref at the end of a main heading (`Khanda 1.2` → `1.2`).
fn heading_ref(title: &str) -> &str {
    title.rsplit(char::is_whitespace).next().unwrap_or(title)
}

fn join_ref(components: &[u64]) -> String {
    components
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Recover ref and label from `<ref> (<script>: "<label>")`.
fn parse_section_heading(rest: &str) -> (String, Option<Label>) {
    let rest = rest.trim();
    let labelled = rest.split_once(" (").and_then(|(reference, tail)| {
        let inner = tail.strip_suffix(')')?;
        let (script, quoted) = inner.split_once(':')?;
        let text = quoted.trim().strip_prefix('"')?.strip_suffix('"')?;
        let label = Label::from([(script.trim().to_string(), text.to_string())]);
        Some((reference.trim().to_string(), Some(label)))
    });
    labelled.unwrap_or_else(|| (rest.to_string(), None))
}
