//! File-level source spans and line/column lookup

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// File-level source span
///
/// Byte offsets are relative to the start of the file on disk, not to the
/// script block that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Byte offset of the start of the span (inclusive)
    pub start: usize,
    /// Byte offset of the end of the span (exclusive)
    pub end: usize,
    /// Line number of the start (1-indexed)
    pub start_line: u32,
    /// Line number of the end (1-indexed)
    pub end_line: u32,
    /// Column number of the start (0-indexed, in bytes)
    pub start_col: u32,
}

impl SourceSpan {
    /// Create a new source span
    pub fn new(start: usize, end: usize, start_line: u32, end_line: u32, start_col: u32) -> Self {
        SourceSpan {
            start,
            end,
            start_line,
            end_line,
            start_col,
        }
    }
}

/// Byte offset to line/column index over one file
///
/// Built once per file; lookups are a binary search over line starts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { line_starts }
    }

    /// 1-indexed line and 0-indexed byte column of `offset`
    pub fn location(&self, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        ((line + 1) as u32, col as u32)
    }

    /// Build a `SourceSpan` for a file-level byte range
    pub fn span(&self, range: Range<usize>) -> SourceSpan {
        let (start_line, start_col) = self.location(range.start);
        let (end_line, _) = self.location(range.end);
        SourceSpan::new(range.start, range.end, start_line, end_line, start_col)
    }
}
