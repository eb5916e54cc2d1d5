//! Content hashing for validation of lossless conversion.
//!
//! The validation hash is computed over the *semantic* characters of a
//! document only. Whitespace, zero-width marks and a fixed set of punctuation
//! marks are removed and the remainder is NFC-normalized before hashing, so
//! reflowing a verse or retyping a danda never changes the digest while any
//! change to a letter does.
//!
//! Fields are concatenated with no separator: the digest is a function of the
//! total character content, not of which field a character lives in.

use crate::model::{ContentField, Grantha, Passage, PassageContent, Script};
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

/// Prefix of the hash as embedded in Markdown frontmatter.
pub const HASH_PREFIX: &str = "sha256:";

/// Zero-width code points removed before hashing.
pub const ZERO_WIDTH_CHARS: [char; 4] = [
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{FEFF}', // zero-width no-break space (BOM)
];

/// Punctuation removed before hashing.
pub const PUNCTUATION_CHARS: [char; 20] = [
    '\u{0964}', // danda
    '\u{0965}', // double danda
    ',', '.', ';', ':', '!', '?', '-', '\u{2014}', '\u{2013}', '(', ')', '[', ']', '{', '}', '"',
    '\'', '`',
];

fn is_insignificant(c: char) -> bool {
    c.is_whitespace() || ZERO_WIDTH_CHARS.contains(&c) || PUNCTUATION_CHARS.contains(&c)
}

/// Strip non-semantic characters and NFC-normalize.
pub fn normalize_text(text: Option<&str>) -> String {
    match text {
        None => String::new(),
        Some(text) => text
            .chars()
            .filter(|c| !is_insignificant(*c))
            .nfc()
            .collect(),
    }
}

/// SHA-256 of the normalized text, as 64 lowercase hex characters.
pub fn hash_text(text: &str) -> String {
    let normalized = normalize_text(Some(text));
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Concatenate the selected fields of `content` in canonical order.
///
/// `scripts == None` selects every script. English fields are always
/// included.
pub fn extract_content_text(content: &PassageContent, scripts: Option<&[Script]>) -> String {
    let mut out = String::new();
    for field in ContentField::ORDER {
        if !field.is_selected(scripts) {
            continue;
        }
        if let Some(text) = content.get(field) {
            out.push_str(text);
        }
    }
    out
}

/// Hash of a single passage's selected content.
pub fn hash_passage(passage: &Passage, scripts: Option<&[Script]>) -> String {
    hash_text(&extract_content_text(&passage.content, scripts))
}

/// Validation hash for a whole document.
///
/// Order: prefatory items, main passages, concluding items, then (only when
/// `commentary_ids` is non-empty) every passage of each selected commentary
/// in document order, each contributing its prefatory items before its own
/// content.
pub fn hash_grantha(
    doc: &Grantha,
    scripts: Option<&[Script]>,
    commentary_ids: Option<&[String]>,
) -> String {
    let mut combined = String::new();

    for passage in doc
        .prefatory_material
        .iter()
        .chain(&doc.passages)
        .chain(&doc.concluding_material)
    {
        combined.push_str(&extract_content_text(&passage.content, scripts));
    }

    if let Some(ids) = commentary_ids.filter(|ids| !ids.is_empty()) {
        for commentary in doc
            .commentaries
            .iter()
            .filter(|c| ids.contains(&c.commentary_id))
        {
            for passage in &commentary.passages {
                for item in &passage.prefatory_material {
                    combined.push_str(&extract_content_text(&item.content, scripts));
                }
                combined.push_str(&extract_content_text(&passage.content, scripts));
            }
        }
    }

    hash_text(&combined)
}

/// Render a digest in its embedded `sha256:<hex>` form.
pub fn format_hash(hex_digest: &str) -> String {
    format!("{HASH_PREFIX}{hex_digest}")
}

/// Strip the `sha256:` prefix from an embedded hash.
///
/// Returns `None` for other algorithm tags or a malformed digest.
pub fn parse_hash(embedded: &str) -> Option<&str> {
    let digest = embedded.trim().strip_prefix(HASH_PREFIX)?;
    let well_formed = digest.len() == 64
        && digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
    well_formed.then_some(digest)
}
