//! Passage content: one optional slot per script plus the English fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scripts a Sanskrit text can be carried in.
///
/// Declaration order is the canonical field order used by both the hasher
/// and the content-block codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Devanagari,
    Roman,
    Kannada,
}

impl Script {
    pub const ALL: [Script; 3] = [Script::Devanagari, Script::Roman, Script::Kannada];

    pub fn as_str(&self) -> &'static str {
        match self {
            Script::Devanagari => "devanagari",
            Script::Roman => "roman",
            Script::Kannada => "kannada",
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Script {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devanagari" => Ok(Script::Devanagari),
            "roman" => Ok(Script::Roman),
            "kannada" => Ok(Script::Kannada),
            other => Err(format!(
                "unknown script '{other}' (expected devanagari, roman or kannada)"
            )),
        }
    }
}

/// Returns true when `scripts` selects `script`. `None` selects every script.
pub fn is_selected(scripts: Option<&[Script]>, script: Script) -> bool {
    scripts.map_or(true, |s| s.contains(&script))
}

/// The Sanskrit text of a passage in each supported script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanskritText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devanagari: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kannada: Option<String>,
}

impl SanskritText {
    pub fn get(&self, script: Script) -> Option<&str> {
        match script {
            Script::Devanagari => self.devanagari.as_deref(),
            Script::Roman => self.roman.as_deref(),
            Script::Kannada => self.kannada.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, script: Script) -> &mut Option<String> {
        match script {
            Script::Devanagari => &mut self.devanagari,
            Script::Roman => &mut self.roman,
            Script::Kannada => &mut self.kannada,
        }
    }

    fn is_empty(&self) -> bool {
        Script::ALL.iter().all(|s| present(self.get(*s)).is_none())
    }
}

/// The text fields of a passage or commentary passage.
///
/// A slot counts as present only when it holds non-blank text; `None` and
/// `Some("")` are the same thing everywhere in this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageContent {
    #[serde(default, skip_serializing_if = "SanskritText::is_empty")]
    pub sanskrit: SanskritText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
}

/// One text field of [`PassageContent`], in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentField {
    Sanskrit(Script),
    EnglishTranslation,
    English,
}

impl ContentField {
    pub const ORDER: [ContentField; 5] = [
        ContentField::Sanskrit(Script::Devanagari),
        ContentField::Sanskrit(Script::Roman),
        ContentField::Sanskrit(Script::Kannada),
        ContentField::EnglishTranslation,
        ContentField::English,
    ];

    /// English fields carry no script tag and are always selected.
    pub fn is_selected(&self, scripts: Option<&[Script]>) -> bool {
        match self {
            ContentField::Sanskrit(script) => is_selected(scripts, *script),
            ContentField::EnglishTranslation | ContentField::English => true,
        }
    }
}

impl PassageContent {
    pub fn devanagari(text: impl Into<String>) -> Self {
        let mut content = PassageContent::default();
        content.sanskrit.devanagari = Some(text.into());
        content
    }

    pub fn get(&self, field: ContentField) -> Option<&str> {
        match field {
            ContentField::Sanskrit(script) => self.sanskrit.get(script),
            ContentField::EnglishTranslation => self.english_translation.as_deref(),
            ContentField::English => self.english.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, field: ContentField) -> &mut Option<String> {
        match field {
            ContentField::Sanskrit(script) => self.sanskrit.slot_mut(script),
            ContentField::EnglishTranslation => &mut self.english_translation,
            ContentField::English => &mut self.english,
        }
    }

    /// Present fields within the selection, in canonical order.
    pub fn fields<'a>(
        &'a self,
        scripts: Option<&'a [Script]>,
    ) -> impl Iterator<Item = (ContentField, &'a str)> + 'a {
        ContentField::ORDER
            .into_iter()
            .filter(move |field| field.is_selected(scripts))
            .filter_map(move |field| present(self.get(field)).map(|text| (field, text)))
    }

    pub fn is_empty(&self) -> bool {
        ContentField::ORDER
            .iter()
            .all(|field| present(self.get(*field)).is_none())
    }

    /// The content as it survives a round trip under `scripts`: unselected
    /// scripts and blank slots dropped, line endings folded to `\n`,
    /// remaining values trimmed.
    pub fn select(&self, scripts: Option<&[Script]>) -> PassageContent {
        let mut out = PassageContent::default();
        for (field, text) in self.fields(scripts) {
            let joined = text_lines(text).collect::<Vec<_>>().join("\n");
            *out.slot_mut(field) = Some(joined.trim().to_string());
        }
        out
    }
}

/// Lines of a field value with any trailing `\r` removed.
///
/// Markdown is read line by line, so a carriage return at the end of a line
/// cannot survive the trip. The encoder writes these lines, and
/// [`PassageContent::select`] folds values the same way.
pub fn text_lines<'a>(text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    text.lines().map(|line| line.trim_end_matches('\r'))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
