//! Frontmatter framing, selection bookkeeping and tolerated variations.

use crate::common::{commentary, grantha, mundaka};
use grantha_codec::{json_to_markdown, markdown_to_json, ConvertError, EncodeOptions, Script};

#[test]
fn test_frontmatter_records_selection() {
    let doc = mundaka();
    let options = EncodeOptions::new(vec![Script::Devanagari, Script::Roman])
        .with_commentaries(["anandagiri"]);
    let markdown = json_to_markdown(&doc, &options).unwrap();

    assert!(markdown.starts_with("---\ngrantha_id: mundaka-upanishad\n"));
    assert!(markdown.contains("scripts:\n- devanagari\n- roman\n"));
    assert!(markdown.contains("commentaries:\n- anandagiri\n"));
    assert!(markdown.contains("commentary_title: मुण्डकभाष्यटीका"));
    assert!(!markdown.contains("- shankara"));

    let hash_line = markdown
        .lines()
        .find_map(|line| line.strip_prefix("validation_hash: "))
        .unwrap();
    let digest = hash_line
        .trim_matches(|c| c == '\'' || c == '"')
        .strip_prefix("sha256:")
        .unwrap();
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_document_metadata_survives() {
    let doc = mundaka();
    let decoded = markdown_to_json(&json_to_markdown(&doc, &EncodeOptions::default()).unwrap())
        .unwrap();
    assert_eq!(decoded.metadata, doc.metadata);
    assert_eq!(decoded.aliases, doc.aliases);
    assert_eq!(decoded.structure_levels, doc.structure_levels);
    assert_eq!(decoded.canonical_title, "मुण्डकोपनिषत्");
}

#[test]
fn test_commentary_metadata_survives() {
    let doc = mundaka();
    let options = EncodeOptions::default().all_commentaries(&doc);
    let decoded = markdown_to_json(&json_to_markdown(&doc, &options).unwrap()).unwrap();
    assert_eq!(decoded.commentaries[1].metadata, doc.commentaries[1].metadata);
    assert_eq!(decoded.commentaries[0].commentator, doc.commentaries[0].commentator);
    assert_eq!(
        decoded.commentaries[0].commentary_title.as_deref(),
        Some("मुण्डकोपनिषद्भाष्यम्")
    );
}

#[test]
fn test_missing_frontmatter() {
    assert!(matches!(
        markdown_to_json("# Shloka 1\n\ntext\n").unwrap_err(),
        ConvertError::FrontmatterMissing
    ));
    assert!(matches!(
        markdown_to_json("").unwrap_err(),
        ConvertError::FrontmatterMissing
    ));
}

#[test]
fn test_unterminated_frontmatter() {
    let markdown = json_to_markdown(&grantha(&["Shloka"], &[("1", "क")]), &EncodeOptions::default())
        .unwrap();
    let (head, _) = markdown.split_once("\n---\n").unwrap();
    assert!(matches!(
        markdown_to_json(head).unwrap_err(),
        ConvertError::FrontmatterUnterminated
    ));
}

#[test]
fn test_invalid_yaml_is_reported() {
    let markdown = "---\ngrantha_id: [unclosed\n---\n\n# Shloka 1\n";
    assert!(matches!(
        markdown_to_json(markdown).unwrap_err(),
        ConvertError::InvalidFrontmatter(_)
    ));
}

#[test]
fn test_byte_order_mark_and_crlf_are_tolerated() {
    let mut doc = grantha(&["Adhyaya", "Shloka"], &[("1.1", "क"), ("1.2", "ख")]);
    doc.commentaries = vec![commentary("c1", "भाष्यकारः", &[("1.2", "व्याख्या")])];
    let options = EncodeOptions::default().all_commentaries(&doc);
    let markdown = json_to_markdown(&doc, &options).unwrap();
    let windows = format!("\u{FEFF}{}", markdown.replace('\n', "\r\n"));
    assert_eq!(markdown_to_json(&windows).unwrap(), doc);
}

#[test]
fn test_document_without_passages_is_rejected() {
    let doc = grantha(&["Shloka"], &[]);
    let err = json_to_markdown(&doc, &EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::NoPassages(id) if id == doc.grantha_id));
}

#[test]
fn test_selection_may_leave_every_passage_empty() {
    let doc = grantha(&["Shloka"], &[("1", "पाठः")]);
    let options = EncodeOptions::new(vec![Script::Kannada]);
    let markdown = json_to_markdown(&doc, &options).unwrap();
    assert!(markdown.ends_with("# Shloka 1\n"));
    let decoded = markdown_to_json(&markdown).unwrap();
    assert!(decoded.passages.is_empty());
    assert_eq!(decoded, options.selected_view(&doc));
}
