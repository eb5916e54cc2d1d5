//! Content blocks: the fields of one passage, each wrapped in a marker pair.
//!
//! ```text
//! <!-- sanskrit:devanagari -->
//! ॐ पूर्णमदः पूर्णमिदम्
//! <!-- /sanskrit:devanagari -->
//!
//! <!-- english_translation -->
//! That is full, this is full.
//! <!-- /english_translation -->
//! ```
//!
//! Only present, selected fields are written. A field's text runs until the
//! next marker line of any kind, so a missing close tag loses nothing.

use super::markers::{
    close_tag, comment_body, escape_line, open_tag, parse_content_tag, unescape_line, ContentTag,
};
use crate::model::{text_lines, ContentField, PassageContent, Script};

/// Render the present fields of `content` that `scripts` selects.
///
/// Returns an empty string when nothing is selected. Otherwise each field is
/// followed by a blank line.
pub fn format_content(content: &PassageContent, scripts: Option<&[Script]>) -> String {
    let mut out = String::new();
    for (field, text) in content.fields(scripts) {
        out.push_str(&open_tag(field));
        out.push('\n');
        for line in text_lines(text) {
            out.push_str(&escape_line(line));
            out.push('\n');
        }
        out.push_str(&close_tag(field));
        out.push_str("\n\n");
    }
    out
}

/// Read the fields of a content block.
///
/// Fields without an open marker decode to `None`, as do fields whose text
/// is blank. Lines outside any field and unknown tags are ignored.
pub fn parse_content_block<'a, I>(lines: I) -> PassageContent
where
    I: IntoIterator<Item = &'a str>,
{
    let mut content = PassageContent::default();
    let mut current: Option<(ContentField, Vec<String>)> = None;

    for line in lines {
        match comment_body(line) {
            Some(body) => {
                flush(&mut content, current.take());
                if let ContentTag::Open(field) = parse_content_tag(body) {
                    current = Some((field, Vec::new()));
                }
            }
            None => {
                if let Some((_, buffer)) = current.as_mut() {
                    buffer.push(unescape_line(line));
                }
            }
        }
    }
    flush(&mut content, current);
    content
}

fn flush(content: &mut PassageContent, field: Option<(ContentField, Vec<String>)>) {
    let Some((field, lines)) = field else {
        return;
    };
    let text = lines.join("\n");
    let text = text.trim();
    if !text.is_empty() {
        *content.slot_mut(field) = Some(text.to_string());
    }
}
