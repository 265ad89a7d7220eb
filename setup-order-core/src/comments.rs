//! Comment-span resolution
//!
//! Extends a statement's byte range with the comments attached to it, so a
//! moved statement carries its documentation along.
//!
//! Global invariants enforced:
//! - A resolved span always contains the statement's own range
//! - Spans never reach into a neighbouring statement's own range

use crate::ast::{CommentStyle, SourceModel};
use std::ops::Range;

/// Comment-inclusive range of one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSpan {
    pub range: Range<usize>,
    /// The span ends in a `//` comment, so whatever follows it must start
    /// on a new line
    pub ends_with_line_comment: bool,
}

impl CommentSpan {
    pub fn overlaps(&self, other: &CommentSpan) -> bool {
        self.range.start < other.range.end && other.range.start < self.range.end
    }
}

/// Resolve the comment-inclusive span of statement `index`
///
/// The first leading comment and the last trailing comment widen the
/// statement's range. Comments that would cross into the previous or next
/// statement are ignored.
pub fn resolve_comment_span<M: SourceModel + ?Sized>(model: &M, index: usize) -> CommentSpan {
    let statements = model.statements();
    let own = statements[index].range.clone();

    let lower_bound = index
        .checked_sub(1)
        .map(|prev| statements[prev].range.end)
        .unwrap_or(0);
    let upper_bound = statements
        .get(index + 1)
        .map(|next| next.range.start)
        .unwrap_or(usize::MAX);

    let start = model
        .leading_comments(index)
        .iter()
        .filter(|c| c.range.start >= lower_bound && c.range.end <= own.start)
        .map(|c| c.range.start)
        .min()
        .map_or(own.start, |first| first.min(own.start));

    let last_trailing = model
        .trailing_comments(index)
        .iter()
        .filter(|c| c.range.start >= own.end && c.range.end <= upper_bound)
        .max_by_key(|c| c.range.end);

    let (end, ends_with_line_comment) = match last_trailing {
        Some(comment) => (
            comment.range.end.max(own.end),
            comment.style == CommentStyle::Line,
        ),
        None => (own.end, false),
    };

    CommentSpan {
        range: start..end,
        ends_with_line_comment,
    }
}

/// Resolve comment spans for every statement of a unit
pub fn resolve_all<M: SourceModel + ?Sized>(model: &M) -> Vec<CommentSpan> {
    (0..model.statements().len())
        .map(|index| resolve_comment_span(model, index))
        .collect()
}

/// Check that spans are ordered and pairwise disjoint
pub fn spans_are_disjoint<'a>(spans: impl IntoIterator<Item = &'a CommentSpan>) -> bool {
    let mut previous_end = 0;
    for span in spans {
        if span.range.start < previous_end || span.range.end < span.range.start {
            return false;
        }
        previous_end = span.range.end;
    }
    true
}
