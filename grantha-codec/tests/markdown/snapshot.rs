//! Snapshot of the complete body layout.

use crate::common::{body, commentary, grantha, section};
use grantha_codec::{json_to_markdown, EncodeOptions, PassageType};
use insta::assert_snapshot;

#[test]
fn test_body_layout() {
    let mut doc = grantha(&["Adhyaya", "Shloka"], &[("1.1", "पाठः १"), ("1.2", "पाठः २")]);
    doc.passages[0].content.english_translation = Some("First verse.".into());
    doc.prefatory_material = vec![section(
        PassageType::Prefatory,
        "shanti",
        "शान्तिपाठः",
        "ॐ शान्तिः",
    )];
    doc.commentaries = vec![commentary("c1", "भाष्यकारः", &[("1.1", "व्याख्यानम्")])];

    let options = EncodeOptions::default().all_commentaries(&doc);
    let markdown = json_to_markdown(&doc, &options).unwrap();
    assert_snapshot!(body(&markdown).trim_end(), @r###"
    <!-- section: {"ref":"shanti","label":{"devanagari":"शान्तिपाठः"}} -->
    # Prefatory: shanti (devanagari: "शान्तिपाठः")

    <!-- sanskrit:devanagari -->
    ॐ शान्तिः
    <!-- /sanskrit:devanagari -->

    # Adhyaya 1

    ## Shloka 1.1

    <!-- sanskrit:devanagari -->
    पाठः १
    <!-- /sanskrit:devanagari -->

    <!-- english_translation -->
    First verse.
    <!-- /english_translation -->

    <!-- commentary: {"commentary_id":"c1","ref":"1.1"} -->
    ### Commentary: भाष्यकारः

    <!-- sanskrit:devanagari -->
    व्याख्यानम्
    <!-- /sanskrit:devanagari -->

    ## Shloka 1.2

    <!-- sanskrit:devanagari -->
    पाठः २
    <!-- /sanskrit:devanagari -->
    "###);
}
