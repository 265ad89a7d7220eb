//! Vue single-file component script extraction
//!
//! Finds the top-level `<script>` blocks of a `.vue` file. Only the
//! `<script setup>` block is a script unit for the ordering check; its
//! content offset maps block-relative positions back to the file.
//!
//! This is a tag scanner, not an HTML parser: it skips `<!-- -->` comments
//! and honours quoted attribute values, which is all a component's top
//! level needs.

use crate::language::Language;

/// One `<script>` block of a component file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock<'a> {
    /// Byte offset of `content` within the file
    pub offset: usize,
    pub content: &'a str,
    pub lang: Option<&'a str>,
    pub setup: bool,
}

impl ScriptBlock<'_> {
    /// ECMAScript dialect selected by the block's `lang` attribute
    pub fn language(&self) -> Language {
        Language::from_script_lang(self.lang)
    }
}

/// Extract every `<script>` block in source order
pub fn extract_script_blocks(source: &str) -> Vec<ScriptBlock<'_>> {
    // ASCII lowering keeps byte offsets identical to `source`
    let lower = source.to_ascii_lowercase();
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(found) = lower[pos..].find('<') {
        let start = pos + found;
        let rest = &lower[start..];

        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(end) => {
                    pos = start + end + 3;
                    continue;
                }
                None => break,
            }
        }

        if !is_script_open_tag(rest) {
            pos = start + 1;
            continue;
        }

        let attrs_start = start + "<script".len();
        let Some(tag_end) = find_tag_end(source, attrs_start) else {
            break;
        };
        let raw_attrs = &source[attrs_start..tag_end];
        let content_start = tag_end + 1;

        if raw_attrs.trim_end().ends_with('/') {
            pos = content_start;
            continue;
        }

        let Some(close) = lower[content_start..].find("</script") else {
            break;
        };
        let content_end = content_start + close;

        let attrs = parse_attributes(raw_attrs);
        blocks.push(ScriptBlock {
            offset: content_start,
            content: &source[content_start..content_end],
            lang: attrs
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("lang"))
                .and_then(|(_, value)| *value),
            setup: attrs
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case("setup")),
        });

        pos = match lower[content_end..].find('>') {
            Some(gt) => content_end + gt + 1,
            None => break,
        };
    }

    blocks
}

/// The `<script setup>` block, if the component has one
pub fn script_setup_block(source: &str) -> Option<ScriptBlock<'_>> {
    extract_script_blocks(source).into_iter().find(|b| b.setup)
}

fn is_script_open_tag(rest: &str) -> bool {
    rest.strip_prefix("<script").is_some_and(|after| {
        after
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
    })
}

/// Position of the `>` closing an opening tag, skipping quoted values
fn find_tag_end(source: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in source[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(from + i),
            (None, _) => {}
        }
    }
    None
}

/// Split raw attribute text into `(name, value)` pairs
fn parse_attributes(raw: &str) -> Vec<(&str, Option<&str>)> {
    let mut attrs = Vec::new();
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' && bytes[i] != b'/' {
            i += 1;
        }
        if name_start == i {
            break;
        }
        let name = &raw[name_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let value = if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                let value_start = i + 1;
                i = value_start;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                let value = &raw[value_start..i];
                i = (i + 1).min(bytes.len());
                value
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &raw[value_start..i]
            };
            attrs.push((name, Some(value)));
        } else {
            attrs.push((name, None));
        }
    }

    attrs
}
