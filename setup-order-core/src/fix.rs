//! Reordering fixes
//!
//! The rewriter computes the canonical order once per script unit and emits a
//! single replacement covering the smallest range that contains every
//! out-of-place statement. Individual violations never produce edits of
//! their own, so edits cannot collide.
//!
//! Global invariants enforced:
//! - A `Fix` only ever holds pairwise-disjoint edits
//! - Text between classified statements (including unclassified statements)
//!   is kept in place
//! - Statements of one category keep their relative order

use crate::ast::{SourceModel, Statement, StatementKind};
use crate::classify::{classify, ClassifiedGroups};
use crate::comments::{resolve_all, spans_are_disjoint, CommentSpan};
use crate::order::{canonical_order, current_order};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Blank lines inserted between reordered statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacing {
    /// Between neighbours of the same category
    pub within_group: usize,
    /// Where the category changes
    pub between_groups: usize,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing {
            within_group: 1,
            between_groups: 2,
        }
    }
}

/// One text edit instruction
///
/// An empty `range` is an insertion, an empty `text` a removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}

impl TextEdit {
    pub fn remove(range: Range<usize>) -> Self {
        TextEdit {
            range,
            text: String::new(),
        }
    }

    pub fn insert_after(anchor: usize, text: impl Into<String>) -> Self {
        TextEdit {
            range: anchor..anchor,
            text: text.into(),
        }
    }

    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        TextEdit {
            range,
            text: text.into(),
        }
    }

    fn is_insertion(&self) -> bool {
        self.range.start == self.range.end
    }

    fn shifted(self, offset: usize) -> Self {
        TextEdit {
            range: self.range.start + offset..self.range.end + offset,
            text: self.text,
        }
    }
}

/// A set of edits that can be applied together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    edits: Vec<TextEdit>,
}

impl Fix {
    /// Build a fix, refusing edit sets that overlap
    pub fn new(mut edits: Vec<TextEdit>) -> Option<Self> {
        edits.sort_by_key(|e| (e.range.start, e.range.end));
        if edits_are_disjoint(&edits) {
            Some(Fix { edits })
        } else {
            None
        }
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Move every edit by `offset` bytes (script block to file coordinates)
    pub fn shifted(self, offset: usize) -> Self {
        Fix {
            edits: self
                .edits
                .into_iter()
                .map(|e| e.shifted(offset))
                .collect(),
        }
    }
}

/// Sorted edits must not overlap; two insertions at one point are ambiguous
fn edits_are_disjoint(sorted: &[TextEdit]) -> bool {
    sorted.windows(2).all(|pair| {
        let (a, b) = (&pair[0], &pair[1]);
        if a.range.end > b.range.start || a.range.start > a.range.end {
            return false;
        }
        !(a.is_insertion() && b.is_insertion() && a.range.start == b.range.start)
    })
}

/// Apply several fixes to `source` as one transaction
///
/// Returns `None` without touching anything if the combined edits overlap or
/// any range no longer fits the text.
pub fn apply_fixes(source: &str, fixes: &[Fix]) -> Option<String> {
    let mut edits: Vec<TextEdit> = fixes.iter().flat_map(|f| f.edits.iter().cloned()).collect();
    edits.sort_by_key(|e| (e.range.start, e.range.end));
    if !edits_are_disjoint(&edits) {
        return None;
    }

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in &edits {
        let kept = source.get(cursor..edit.range.start)?;
        source.get(edit.range.clone())?;
        output.push_str(kept);
        output.push_str(&edit.text);
        cursor = edit.range.end;
    }
    output.push_str(source.get(cursor..)?);
    Some(output)
}

/// Build the reordering fix for one script unit
///
/// Returns `None` when the unit is already in canonical order, or when the
/// comment spans involved overlap and a safe rewrite is impossible.
pub fn rewrite<M: SourceModel + ?Sized>(
    model: &M,
    groups: &ClassifiedGroups,
    spacing: Spacing,
) -> Option<Fix> {
    let slots = current_order(groups);
    let target = canonical_order(groups);
    if slots == target {
        return None;
    }

    let differs = |(a, b): (&usize, &usize)| a != b;
    let first = slots.iter().zip(&target).position(differs)?;
    let last = slots.iter().zip(&target).rposition(differs)?;

    let spans = resolve_all(model);
    if !spans_are_disjoint(slots[first..=last].iter().map(|&i| &spans[i])) {
        tracing::warn!("comment spans overlap; reorder fix withheld");
        return None;
    }

    let statements = model.statements();
    let newline = line_break(model.text());
    let range = spans[slots[first]].range.start..spans[slots[last]].range.end;
    let rest = model.slice(range.end..model.text().len());

    let mut text = String::new();
    for k in first..=last {
        let placed = target[k];
        let gap = if k < last {
            let raw = model.slice(spans[slots[k]].range.end..spans[slots[k + 1]].range.start);
            let same_group = classify(&statements[placed]) == classify(&statements[target[k + 1]]);
            let blank_lines = if same_group {
                spacing.within_group
            } else {
                spacing.between_groups
            };
            Some(normalize_gap(raw, &spans[placed], blank_lines, newline))
        } else {
            None
        };

        let followed_on_same_line = match &gap {
            Some(gap) => !starts_on_new_line(gap),
            None => !rest.trim().is_empty() && !starts_on_new_line(rest),
        };
        push_slot(&mut text, model, &statements[placed], &spans[placed], followed_on_same_line);
        if let Some(gap) = gap {
            text.push_str(&gap);
        }
    }

    if spans[target[last]].ends_with_line_comment && !starts_on_new_line(rest) {
        text.push_str(newline);
    }

    Fix::new(vec![TextEdit::replace(range, text)])
}

/// Append one slot's text
///
/// A statement ended only by a line break gets an explicit `;` when code now
/// follows it on the same line.
fn push_slot<M: SourceModel + ?Sized>(
    text: &mut String,
    model: &M,
    statement: &Statement,
    span: &CommentSpan,
    followed_on_same_line: bool,
) {
    let own_end = statement.range.end;
    let needs_terminator = followed_on_same_line
        && !span.ends_with_line_comment
        && statement.kind != StatementKind::FunctionDecl
        && !model.slice(statement.range.clone()).trim_end().ends_with(';');

    if needs_terminator {
        text.push_str(model.slice(span.range.start..own_end));
        text.push(';');
        text.push_str(model.slice(own_end..span.range.end));
    } else {
        text.push_str(model.slice(span.range.clone()));
    }
}

/// Line break used by the unit
fn line_break(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Text placed between two reordered statements
///
/// Whitespace spanning lines is normalised to `blank_lines` empty lines,
/// keeping the indentation of the following line. Anything else is kept
/// verbatim, except that a `//` comment is always followed by a line break.
fn normalize_gap(gap: &str, before: &CommentSpan, blank_lines: usize, newline: &str) -> String {
    let whitespace_only = gap.trim().is_empty();

    if whitespace_only && gap.contains('\n') {
        let indent = gap.rsplit('\n').next().unwrap_or("");
        return format!("{}{}", newline.repeat(blank_lines + 1), indent);
    }

    if before.ends_with_line_comment && !starts_on_new_line(gap) {
        return format!("{}{}", newline, gap.trim_start_matches([' ', '\t']));
    }

    gap.to_string()
}

/// True if `text` reaches a line break after optional spaces/tabs
fn starts_on_new_line(text: &str) -> bool {
    let rest = text.trim_start_matches([' ', '\t']);
    rest.starts_with('\n') || rest.starts_with("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ScriptUnit;
    use crate::classify::group;
    use crate::language::Language;

    fn fix_text(source: &str, spacing: Spacing) -> Option<String> {
        let unit = ScriptUnit::parse(source, "test.ts", Language::TypeScript).unwrap();
        let groups = group(unit.statements());
        let fix = rewrite(&unit, &groups, spacing)?;
        apply_fixes(source, &[fix])
    }

    #[test]
    fn test_no_fix_when_canonical() {
        let source = "import x from 'm'; const a = 1; function f(){}; onLoad(()=>{})";
        assert_eq!(fix_text(source, Spacing::default()), None);
    }

    #[test]
    fn test_single_line_reorder_keeps_gaps() {
        let source = "const a = 1; import x from 'm'; function f(){}; onLoad(()=>{})";
        assert_eq!(
            fix_text(source, Spacing::default()).unwrap(),
            "import x from 'm'; const a = 1; function f(){}; onLoad(()=>{})"
        );
    }

    #[test]
    fn test_replacement_covers_only_affected_range() {
        let source = "import x from 'm';\nfunction f() {}\nconst a = 1;\nonLoad(() => {});\n";
        let unit = ScriptUnit::parse(source, "test.ts", Language::TypeScript).unwrap();
        let groups = group(unit.statements());
        let fix = rewrite(&unit, &groups, Spacing::default()).unwrap();
        assert_eq!(fix.edits().len(), 1);
        let edit = &fix.edits()[0];
        assert_eq!(&source[edit.range.clone()], "function f() {}\nconst a = 1;");
        assert_eq!(edit.text, "const a = 1;\n\n\nfunction f() {}");
    }

    #[test]
    fn test_multiline_spacing() {
        let source = "const b = 2;\nconst a = 1;\nimport x from 'm';\n";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "import x from 'm';\n\n\nconst b = 2;\n\nconst a = 1;\n");

        let tight = Spacing {
            within_group: 0,
            between_groups: 1,
        };
        let fixed = fix_text(source, tight).unwrap();
        assert_eq!(fixed, "import x from 'm';\n\nconst b = 2;\nconst a = 1;\n");
    }

    #[test]
    fn test_indentation_preserved() {
        let source = "\n  onMounted(() => {});\n  function f() {}\n";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "\n  function f() {}\n\n\n  onMounted(() => {});\n");
    }

    #[test]
    fn test_leading_comment_moves_with_statement() {
        let source = "// the answer\nconst a = 42;\nimport x from 'm';\n";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "import x from 'm';\n\n\n// the answer\nconst a = 42;\n");
    }

    #[test]
    fn test_trailing_line_comment_keeps_line_break() {
        let source = "onLoad(() => {}); function f() {} // helper";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "function f() {} // helper\nonLoad(() => {});");
    }

    #[test]
    fn test_line_comment_between_adjacent_statements() {
        let source = "onLoad(() => {});function f() {} // helper";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "function f() {} // helper\nonLoad(() => {});");
    }

    #[test]
    fn test_line_comment_moved_to_end_of_range() {
        let source = "function f() {} // helper\nconst a = 1; run();";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "const a = 1;\n\n\nfunction f() {} // helper\n run();");
    }

    #[test]
    fn test_line_comment_at_end_of_range_keeps_crlf() {
        let source = "function f() {} // helper\r\nconst a = 1; run();\r\n";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "const a = 1;\r\n\r\n\r\nfunction f() {} // helper\r\n run();\r\n");
    }

    #[test]
    fn test_semicolon_added_before_code_on_same_line() {
        let source = "const a = 1; import x from 'm'";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "import x from 'm'; const a = 1;");
    }

    #[test]
    fn test_semicolon_added_with_trailing_block_comment() {
        let source = "const a = 1; import x from 'm' /* dep */";
        let unit = ScriptUnit::parse(source, "test.ts", Language::TypeScript).unwrap();
        let groups = group(unit.statements());
        let fix = rewrite(&unit, &groups, Spacing::default()).unwrap();
        let fixed = apply_fixes(source, &[fix]).unwrap();
        assert!(fixed.starts_with("import x from 'm'; "));
        ScriptUnit::parse(&fixed, "test.ts", Language::TypeScript).unwrap();
    }

    #[test]
    fn test_no_semicolon_after_function_or_line_break() {
        let source = "onLoad(() => {}) ; function f() {}";
        assert_eq!(
            fix_text(source, Spacing::default()).unwrap(),
            "function f() {} onLoad(() => {}) ;"
        );

        let source = "const a = 1\nimport x from 'm'";
        assert_eq!(
            fix_text(source, Spacing::default()).unwrap(),
            "import x from 'm'\n\n\nconst a = 1"
        );
    }

    #[test]
    fn test_unclassified_statement_stays_in_place() {
        let source = "const a = 1;\nexport default {};\nimport x from 'm';\n";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        assert_eq!(fixed, "import x from 'm';\nexport default {};\nconst a = 1;\n");
    }

    #[test]
    fn test_stable_within_category() {
        let source = "function b() {}\nconst one = 1;\nfunction a() {}\nconst two = 2;\n";
        let fixed = fix_text(source, Spacing::default()).unwrap();
        let one = fixed.find("const one").unwrap();
        let two = fixed.find("const two").unwrap();
        let b = fixed.find("function b").unwrap();
        let a = fixed.find("function a").unwrap();
        assert!(one < two && two < b && b < a);
    }

    #[test]
    fn test_fix_rejects_overlapping_edits() {
        assert!(Fix::new(vec![TextEdit::replace(0..5, "a"), TextEdit::replace(3..8, "b")]).is_none());
        assert!(Fix::new(vec![TextEdit::insert_after(4, "a"), TextEdit::insert_after(4, "b")]).is_none());
        assert!(Fix::new(vec![TextEdit::remove(0..4), TextEdit::insert_after(4, "x")]).is_some());
    }

    #[test]
    fn test_apply_edit_kinds() {
        let fix = Fix::new(vec![
            TextEdit::remove(0..4),
            TextEdit::insert_after(9, " there"),
            TextEdit::replace(11..16, "world"),
        ])
        .unwrap();
        assert_eq!(apply_fixes("say hello, WORLD", &[fix]).unwrap(), "hello there, world");
    }

    #[test]
    fn test_apply_refuses_conflicting_fixes() {
        let a = Fix::new(vec![TextEdit::replace(0..6, "x")]).unwrap();
        let b = Fix::new(vec![TextEdit::replace(4..8, "y")]).unwrap();
        assert_eq!(apply_fixes("0123456789", &[a, b]), None);
    }

    #[test]
    fn test_apply_refuses_out_of_bounds() {
        let fix = Fix::new(vec![TextEdit::replace(5..50, "x")]).unwrap();
        assert_eq!(apply_fixes("short", &[fix]), None);
    }

    #[test]
    fn test_shifted() {
        let fix = Fix::new(vec![TextEdit::replace(1..3, "x")]).unwrap().shifted(10);
        assert_eq!(fix.edits()[0].range, 11..13);
    }
}
