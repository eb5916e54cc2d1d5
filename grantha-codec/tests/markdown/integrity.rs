//! The validation hash catches lost or altered text, and the decoder
//! reports structural damage with line numbers.

use crate::common::{grantha, mundaka};
use grantha_codec::{json_to_markdown, markdown_to_json, verify, ConvertError, EncodeOptions, Script};

fn sample_markdown() -> String {
    let doc = grantha(&["Adhyaya", "Shloka"], &[("1.1", "पाठः १"), ("1.2", "पाठः २")]);
    json_to_markdown(&doc, &EncodeOptions::default()).unwrap()
}

fn line_of(markdown: &str, needle: &str) -> usize {
    markdown
        .lines()
        .position(|line| line == needle)
        .map(|index| index + 1)
        .unwrap_or_else(|| panic!("'{needle}' not found"))
}

#[test]
fn test_altered_letter_is_detected() {
    let tampered = sample_markdown().replace("पाठः २", "पाठः ३");
    match markdown_to_json(&tampered) {
        Err(ConvertError::ValidationHashMismatch { expected, actual }) => {
            assert_ne!(expected, actual);
            assert_eq!(actual.len(), 64);
        }
        other => panic!("expected hash mismatch, got {other:?}"),
    }
}

#[test]
fn test_removed_passage_is_detected() {
    let markdown = sample_markdown();
    let (head, _) = markdown.split_once("## Shloka 1.2").unwrap();
    let err = markdown_to_json(head).unwrap_err();
    assert!(err.is_integrity_failure());
}

#[test]
fn test_reflowed_text_still_verifies() {
    let edited = sample_markdown()
        .replace("पाठः १", "पाठः\n  १ ।")
        .replace("पाठः २", "\u{200B}पाठः २॥");
    let decoded = markdown_to_json(&edited).unwrap();
    assert_eq!(
        decoded.passages[0].content.sanskrit.devanagari.as_deref(),
        Some("पाठः\n  १ ।")
    );
}

#[test]
fn test_unselected_script_is_outside_the_hash() {
    let doc = mundaka();
    let markdown = json_to_markdown(&doc, &EncodeOptions::default()).unwrap();
    assert!(verify(&doc, &markdown).unwrap());

    let mut edited = doc.clone();
    edited.passages[0].content.sanskrit.roman = Some("changed".into());
    assert!(verify(&edited, &markdown).unwrap());

    edited.passages[0].content.sanskrit.devanagari = Some("changed".into());
    assert!(!verify(&edited, &markdown).unwrap());
}

#[test]
fn test_english_is_always_hashed() {
    let doc = mundaka();
    let markdown = json_to_markdown(&doc, &EncodeOptions::new(vec![Script::Kannada])).unwrap();
    let mut edited = doc.clone();
    edited.passages[2].content.english = Some("A different note.".into());
    assert!(!verify(&edited, &markdown).unwrap());
}

#[test]
fn test_unselected_commentary_is_outside_the_hash() {
    let doc = mundaka();
    let options = EncodeOptions::default().with_commentaries(["shankara"]);
    let markdown = json_to_markdown(&doc, &options).unwrap();

    let mut edited = doc.clone();
    edited.commentaries[1].passages[0].content.sanskrit.devanagari = Some("अन्यत्".into());
    assert!(verify(&edited, &markdown).unwrap());

    edited.commentaries[0].passages[1].content.sanskrit.devanagari = Some("अन्यत्".into());
    assert!(!verify(&edited, &markdown).unwrap());
}

#[test]
fn test_unknown_hash_algorithm_is_rejected() {
    let markdown = sample_markdown();
    let start = markdown.find("validation_hash: ").unwrap();
    let end = start + markdown[start..].find('\n').unwrap();
    let edited = format!(
        "{}validation_hash: md5:0123{}",
        &markdown[..start],
        &markdown[end..]
    );
    assert!(matches!(
        markdown_to_json(&edited).unwrap_err(),
        ConvertError::InvalidFrontmatter(_)
    ));
    assert!(verify(&grantha(&["Shloka"], &[]), &edited).is_err());
}

#[test]
fn test_skipped_heading_level_reports_line() {
    let markdown = sample_markdown().replace("## Shloka 1.2", "### Shloka 1.2");
    let expected = line_of(&markdown, "### Shloka 1.2");
    match markdown_to_json(&markdown) {
        Err(ConvertError::Structure { line, .. }) => assert_eq!(line, expected),
        other => panic!("expected structure error, got {other:?}"),
    }
}

#[test]
fn test_ref_outside_its_parent_reports_line() {
    let markdown = sample_markdown().replace("## Shloka 1.2", "## Shloka 2.2");
    let expected = line_of(&markdown, "## Shloka 2.2");
    match markdown_to_json(&markdown) {
        Err(ConvertError::Structure { line, reason }) => {
            assert_eq!(line, expected);
            assert!(reason.contains("2.2"), "{reason}");
        }
        other => panic!("expected structure error, got {other:?}"),
    }
}

#[test]
fn test_heading_without_ref_is_a_structure_error() {
    let markdown = sample_markdown().replace("## Shloka 1.2", "## Shloka");
    assert!(matches!(
        markdown_to_json(&markdown).unwrap_err(),
        ConvertError::Structure { .. }
    ));
}

#[test]
fn test_content_on_a_parent_level_is_rejected() {
    let markdown = sample_markdown().replace(
        "# Adhyaya 1\n",
        "# Adhyaya 1\n\n<!-- sanskrit:devanagari -->\nअधिकम्\n<!-- /sanskrit:devanagari -->\n",
    );
    assert!(matches!(
        markdown_to_json(&markdown).unwrap_err(),
        ConvertError::RefDepth { expected: 2, found: 1, .. }
    ));
}

#[test]
fn test_duplicate_passage_heading_is_rejected() {
    let markdown = sample_markdown().replace("## Shloka 1.2", "## Shloka 1.1");
    assert!(matches!(
        markdown_to_json(&markdown).unwrap_err(),
        ConvertError::RefOrder { .. }
    ));
}
