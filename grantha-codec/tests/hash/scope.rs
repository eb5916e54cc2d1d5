//! What the document hash covers.

use crate::common::{commentary, grantha, mundaka, section};
use grantha_codec::hasher::{format_hash, hash_grantha, hash_passage, parse_hash};
use grantha_codec::{PassageType, Script};

const DEVANAGARI: &[Script] = &[Script::Devanagari];

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn test_script_selection_changes_the_hash() {
    let doc = mundaka();
    let all = hash_grantha(&doc, None, None);
    assert_ne!(hash_grantha(&doc, Some(DEVANAGARI), None), all);
    assert_eq!(hash_grantha(&doc, Some(Script::ALL.as_slice()), None), all);
}

#[test]
fn test_commentaries_count_only_when_selected() {
    let doc = mundaka();
    let hash = |selected: &[&str]| {
        let selected = ids(selected);
        hash_grantha(&doc, Some(DEVANAGARI), Some(selected.as_slice()))
    };

    let without = hash_grantha(&doc, Some(DEVANAGARI), None);
    assert_eq!(hash(&[]), without);
    assert_eq!(hash(&["missing"]), without);

    let one = hash(&["shankara"]);
    assert_ne!(one, without);
    assert_ne!(hash(&["shankara", "anandagiri"]), one);
}

#[test]
fn test_commentary_selection_order_is_irrelevant() {
    let doc = mundaka();
    let forward = ids(&["shankara", "anandagiri"]);
    let backward = ids(&["anandagiri", "shankara"]);
    assert_eq!(
        hash_grantha(&doc, Some(DEVANAGARI), Some(forward.as_slice())),
        hash_grantha(&doc, Some(DEVANAGARI), Some(backward.as_slice()))
    );
}

#[test]
fn test_prefatory_and_concluding_are_covered() {
    let base = grantha(&["Shloka"], &[("1", "मध्यम्")]);
    let mut with_sections = base.clone();
    with_sections.prefatory_material =
        vec![section(PassageType::Prefatory, "shanti", "शान्तिः", "आदिः")];
    assert_ne!(
        hash_grantha(&with_sections, Some(DEVANAGARI), None),
        hash_grantha(&base, Some(DEVANAGARI), None)
    );

    let mut concluding = base.clone();
    concluding.concluding_material =
        vec![section(PassageType::Concluding, "end", "समाप्तिः", "आदिः")];
    // Same characters in a different position.
    assert_ne!(
        hash_grantha(&concluding, Some(DEVANAGARI), None),
        hash_grantha(&with_sections, Some(DEVANAGARI), None)
    );
}

#[test]
fn test_labels_and_ids_are_not_hashed() {
    let mut doc = grantha(&["Shloka"], &[("1", "क")]);
    doc.commentaries = vec![commentary("c1", "भाष्यकारः", &[("1", "ख")])];
    let selected = ids(&["c1"]);
    let before = hash_grantha(&doc, Some(DEVANAGARI), Some(selected.as_slice()));

    doc.grantha_id = "renamed".into();
    doc.passages[0].label = Some(crate::common::label("नाम"));
    doc.commentaries[0].commentator = crate::common::label("अन्यः");
    assert_eq!(hash_grantha(&doc, Some(DEVANAGARI), Some(selected.as_slice())), before);
}

#[test]
fn test_passage_hash_matches_single_passage_document() {
    let doc = grantha(&["Shloka"], &[("1", "ईशा वास्यम्")]);
    assert_eq!(
        hash_passage(&doc.passages[0], Some(DEVANAGARI)),
        hash_grantha(&doc, Some(DEVANAGARI), None)
    );
}

#[test]
fn test_embedded_form() {
    let digest = hash_grantha(&mundaka(), None, None);
    let embedded = format_hash(&digest);
    assert_eq!(parse_hash(&embedded), Some(digest.as_str()));
    assert_eq!(parse_hash("sha256:xyz"), None);
    assert_eq!(parse_hash(&embedded.replace("sha256", "md5")), None);
}
