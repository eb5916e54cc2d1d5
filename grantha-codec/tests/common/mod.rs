//! Shared builders and fixtures for the integration tests.

use grantha_codec::model::Label;
use grantha_codec::{
    Commentary, CommentaryPassage, Grantha, Passage, PassageContent, PassageType, StructureLevel,
};

/// Load a JSON grantha from `tests/fixtures`.
pub fn fixture(name: &str) -> Grantha {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let source = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {path}: {e}"));
    serde_json::from_str(&source).unwrap_or_else(|e| panic!("invalid fixture {path}: {e}"))
}

pub fn mundaka() -> Grantha {
    fixture("mundaka_excerpt.json")
}

pub fn label(text: &str) -> Label {
    Label::from([("devanagari".to_string(), text.to_string())])
}

/// A grantha over `levels` with one devanagari passage per ref.
pub fn grantha(levels: &[&str], passages: &[(&str, &str)]) -> Grantha {
    Grantha {
        grantha_id: "test-grantha".into(),
        canonical_title: "परीक्षा".into(),
        text_type: "stotra".into(),
        language: "sanskrit".into(),
        structure_levels: StructureLevel::chain(levels.iter().copied()),
        aliases: None,
        variants_available: None,
        metadata: None,
        prefatory_material: vec![],
        passages: passages
            .iter()
            .map(|(reference, text)| Passage::main(*reference, PassageContent::devanagari(*text)))
            .collect(),
        concluding_material: vec![],
        commentaries: vec![],
    }
}

pub fn commentary(id: &str, commentator: &str, passages: &[(&str, &str)]) -> Commentary {
    Commentary {
        commentary_id: id.into(),
        commentary_title: None,
        commentator: label(commentator),
        metadata: None,
        passages: passages
            .iter()
            .map(|(reference, text)| CommentaryPassage {
                reference: reference.to_string(),
                content: PassageContent::devanagari(*text),
                prefatory_material: vec![],
            })
            .collect(),
    }
}

pub fn section(kind: PassageType, reference: &str, name: &str, text: &str) -> Passage {
    Passage::section(kind, reference, Some(label(name)), PassageContent::devanagari(text))
}

/// The Markdown body below the frontmatter.
pub fn body(markdown: &str) -> &str {
    markdown
        .split_once("\n---\n\n")
        .map(|(_, body)| body)
        .unwrap_or_else(|| panic!("no frontmatter in:\n{markdown}"))
}

/// Heading lines of a Markdown body as (level, text).
pub fn headings(markdown: &str) -> Vec<(usize, String)> {
    body(markdown)
        .lines()
        .filter(|line| line.starts_with('#'))
        .map(|line| {
            let level = line.chars().take_while(|c| *c == '#').count();
            (level, line[level..].trim().to_string())
        })
        .collect()
}
