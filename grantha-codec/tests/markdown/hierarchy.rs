//! Heading depth follows the structure schema at every depth.

use crate::common::{grantha, headings};
use grantha_codec::{json_to_markdown, markdown_to_json, ConvertError, EncodeOptions};

fn assert_depths_match_refs(levels: &[&str], passages: &[(&str, &str)]) {
    let doc = grantha(levels, passages);
    let markdown = json_to_markdown(&doc, &EncodeOptions::default()).unwrap();

    for (level, text) in headings(&markdown) {
        let (name, reference) = text.rsplit_once(' ').unwrap();
        assert_eq!(reference.split('.').count(), level, "heading '{text}'");
        assert_eq!(name, levels[level - 1]);
    }
    assert_eq!(markdown_to_json(&markdown).unwrap(), doc);
}

#[test]
fn test_flat_text() {
    assert_depths_match_refs(&["Sutra"], &[("1", "अथ"), ("2", "इति"), ("3", "च")]);
}

#[test]
fn test_two_levels() {
    assert_depths_match_refs(
        &["Adhyaya", "Shloka"],
        &[("1.1", "क"), ("1.2", "ख"), ("2.1", "ग")],
    );
}

#[test]
fn test_three_levels() {
    assert_depths_match_refs(
        &["Mundaka", "Khanda", "Mantra"],
        &[("1.1.1", "क"), ("1.1.2", "ख"), ("1.2.1", "ग"), ("3.2.11", "घ")],
    );
}

#[test]
fn test_four_levels() {
    assert_depths_match_refs(
        &["Kanda", "Sarga", "Varga", "Shloka"],
        &[("1.1.1.1", "क"), ("1.1.2.1", "ख"), ("1.2.1.1", "ग"), ("2.1.1.5", "घ")],
    );
}

#[test]
fn test_ancestors_are_emitted_once() {
    let doc = grantha(
        &["Adhyaya", "Shloka"],
        &[("1.1", "क"), ("1.2", "ख"), ("2.1", "ग")],
    );
    let markdown = json_to_markdown(&doc, &EncodeOptions::default()).unwrap();
    let levels: Vec<_> = headings(&markdown)
        .into_iter()
        .map(|(_, text)| text)
        .collect();
    assert_eq!(
        levels,
        ["Adhyaya 1", "Shloka 1.1", "Shloka 1.2", "Adhyaya 2", "Shloka 2.1"]
    );
}

#[test]
fn test_ref_depth_must_match_schema() {
    let doc = grantha(&["Adhyaya", "Shloka"], &[("1.1", "क"), ("2", "ख")]);
    let err = json_to_markdown(&doc, &EncodeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::RefDepth { expected: 2, found: 1, .. }
    ));
}

#[test]
fn test_non_numeric_ref_is_rejected() {
    let doc = grantha(&["Shloka"], &[("1", "क"), ("2a", "ख")]);
    let err = json_to_markdown(&doc, &EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidRef(r) if r == "2a"));
}

#[test]
fn test_zero_padded_ref_is_rejected() {
    let doc = grantha(&["Adhyaya", "Shloka"], &[("1.01", "क"), ("1.2", "ख")]);
    let err = json_to_markdown(&doc, &EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidRef(r) if r == "1.01"));

    let doc = grantha(&["Adhyaya", "Shloka"], &[("1.1", "क"), ("1.2", "ख")]);
    let markdown = json_to_markdown(&doc, &EncodeOptions::default()).unwrap();
    let edited = markdown.replace("## Shloka 1.1\n", "## Shloka 1.01\n");
    assert!(matches!(
        markdown_to_json(&edited).unwrap_err(),
        ConvertError::Structure { .. }
    ));
}

#[test]
fn test_duplicate_refs_are_rejected() {
    let doc = grantha(&["Shloka"], &[("1", "क"), ("1", "ख")]);
    let err = json_to_markdown(&doc, &EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::RefOrder { .. }));
}
