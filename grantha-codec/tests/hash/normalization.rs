//! Properties of text normalization and ref ordering.

use grantha_codec::hasher::{hash_text, normalize_text, PUNCTUATION_CHARS, ZERO_WIDTH_CHARS};
use grantha_codec::model::compare_refs;
use proptest::prelude::*;
use std::cmp::Ordering;

/// Devanagari letters and signs that survive normalization.
fn devanagari_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(vec!['क', 'ख', 'ग', 'अ', 'इ', 'ा', 'ि', 'ं', 'ः', '्', 'म', 'र']),
        1..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn noise() -> impl Strategy<Value = char> {
    let mut chars = vec![' ', '\n', '\t', '\u{00A0}'];
    chars.extend(ZERO_WIDTH_CHARS);
    chars.extend(PUNCTUATION_CHARS);
    prop::sample::select(chars)
}

proptest! {
    #[test]
    fn noise_never_changes_the_hash(
        text in devanagari_text(),
        inserts in proptest::collection::vec((any::<prop::sample::Index>(), noise()), 0..10),
    ) {
        let mut noisy: Vec<char> = text.chars().collect();
        for (index, c) in inserts {
            let at = index.index(noisy.len() + 1);
            noisy.insert(at, c);
        }
        let noisy: String = noisy.into_iter().collect();
        prop_assert_eq!(hash_text(&noisy), hash_text(&text));
    }

    #[test]
    fn line_layout_is_irrelevant(words in proptest::collection::vec(devanagari_text(), 1..8)) {
        prop_assert_eq!(hash_text(&words.join(" ")), hash_text(&words.join("\n  ")));
        prop_assert_eq!(hash_text(&words.join(" ")), hash_text(&words.concat()));
    }

    #[test]
    fn refs_order_by_number(a in 1u64..500, b in 1u64..500, c in 1u64..500) {
        let left = format!("{a}.{c}");
        let right = format!("{b}.{c}");
        prop_assert_eq!(compare_refs(&left, &right), a.cmp(&b));
        prop_assert_eq!(compare_refs(&format!("{c}.{a}"), &format!("{c}.{b}")), a.cmp(&b));
    }
}

#[test]
fn test_decomposed_and_composed_forms_hash_alike() {
    // क़ as one code point and as क + nukta
    assert_eq!(hash_text("\u{0958}"), hash_text("\u{0915}\u{093C}"));
}

#[test]
fn test_letters_matter() {
    assert_ne!(hash_text("कर्म"), hash_text("धर्म"));
    assert_ne!(hash_text("ab"), hash_text("ba"));
}

#[test]
fn test_empty_and_absent_are_equal() {
    assert_eq!(normalize_text(None), "");
    assert_eq!(normalize_text(Some(" । \u{200D}")), "");
    assert_eq!(
        hash_text(""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_numeric_ordering_examples() {
    assert_eq!(compare_refs("1.2", "1.10"), Ordering::Less);
    assert_eq!(compare_refs("2", "10"), Ordering::Less);
    assert_eq!(compare_refs("1.1", "1.1.1"), Ordering::Less);
}
