//! Source position tracking and text edits for vue-lint-rs.
//!
//! Spans are byte offsets into the original file. Fixes produced by lint
//! rules are expressed as [`TextEdit`]s over those offsets and applied by the
//! host, never by the rules themselves.

use std::ops::Range;
use thiserror::Error;

/// A span in the source code, representing a half-open range [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create an empty span at the given offset.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Create a span from a range.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }

    /// Get the length of the span.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains an offset.
    #[inline]
    pub const fn contains_offset(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Merge two spans into one that covers both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shift the span right by `delta` bytes.
    #[inline]
    pub const fn offset_by(self, delta: u32) -> Span {
        Span {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Convert to a Range<usize>.
    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Slice `text` by this span, if it is in bounds.
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(self.to_range())
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.to_range()
    }
}

/// A line index for converting between byte offsets and line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets of the start of each line.
    line_starts: Vec<u32>,
    /// Total length of the source.
    len: u32,
}

impl LineIndex {
    /// Create a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Get the line and column for a byte offset.
    /// Line and column are 0-indexed.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: offset - line_start,
        }
    }
}

/// A line and column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within line).
    pub col: u32,
}

impl LineCol {
    /// Create a new line/column position.
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Convert to 1-indexed for display.
    #[inline]
    pub const fn to_display(self) -> (u32, u32) {
        (self.line + 1, self.col + 1)
    }
}

/// Replace the bytes of `range` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextEdit {
    /// The replaced byte range.
    pub range: Span,
    /// The inserted text.
    pub replacement: String,
}

impl TextEdit {
    /// Create a replacement edit.
    pub fn replace(range: Span, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Create an edit deleting `range`.
    pub fn delete(range: Span) -> Self {
        Self::replace(range, String::new())
    }

    /// Create an edit inserting `text` at `offset`.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::replace(Span::empty(offset), text)
    }
}

/// Errors raised while applying edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The edit range lies outside the text.
    #[error("edit range {start}..{end} is out of bounds for text of length {len}")]
    OutOfBounds { start: u32, end: u32, len: u32 },
    /// The edit range splits a UTF-8 character.
    #[error("edit range {start}..{end} is not on a character boundary")]
    NotCharBoundary { start: u32, end: u32 },
    /// The edit range is reversed.
    #[error("edit range {start}..{end} is reversed")]
    Reversed { start: u32, end: u32 },
}

/// Outcome of [`apply_edits`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// The edited text.
    pub text: String,
    /// How many edits were applied.
    pub applied: usize,
    /// How many edits were dropped because they overlapped an earlier one.
    pub skipped: usize,
}

/// Apply a set of edits to `text`.
///
/// Edits are sorted by start offset. An edit overlapping one already accepted
/// is skipped, so a single pass never produces conflicting output; callers
/// that need every fix re-run the producer on the result.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<Applied, EditError> {
    let len = text.len() as u32;
    for edit in edits {
        let Span { start, end } = edit.range;
        if start > end {
            return Err(EditError::Reversed { start, end });
        }
        if end > len {
            return Err(EditError::OutOfBounds { start, end, len });
        }
        if !text.is_char_boundary(start as usize) || !text.is_char_boundary(end as usize) {
            return Err(EditError::NotCharBoundary { start, end });
        }
    }

    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.range.start, e.range.end));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0u32;
    let mut applied = 0;
    let mut skipped = 0;
    for edit in sorted {
        if edit.range.start < cursor {
            tracing::debug!(
                start = edit.range.start,
                end = edit.range.end,
                "skipping overlapping edit"
            );
            skipped += 1;
            continue;
        }
        out.push_str(&text[cursor as usize..edit.range.start as usize]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
        applied += 1;
    }
    out.push_str(&text[cursor as usize..]);

    Ok(Applied {
        text: out,
        applied,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains_offset(15));
        assert!(!span.contains_offset(5));
        assert!(!span.contains_offset(25));
        assert_eq!(span.offset_by(5), Span::new(15, 25));
    }

    #[test]
    fn test_span_merge() {
        let merged = Span::new(10, 20).merge(Span::new(15, 30));
        assert_eq!(merged, Span::new(10, 30));
    }

    #[test]
    fn test_span_slice() {
        assert_eq!(Span::new(1, 4).slice("<div>"), Some("div"));
        assert_eq!(Span::new(3, 40).slice("<div>"), None);
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("hello\nworld\nfoo");

        assert_eq!(index.line_col(0), LineCol::new(0, 0));
        assert_eq!(index.line_col(5), LineCol::new(0, 5));
        assert_eq!(index.line_col(6), LineCol::new(1, 0));
        assert_eq!(index.line_col(11), LineCol::new(1, 5));
        assert_eq!(index.line_col(12), LineCol::new(2, 0));
        assert_eq!(index.line_col(999), LineCol::new(2, 3));
    }

    #[test]
    fn test_apply_edits_in_any_order() {
        let edits = vec![
            TextEdit::delete(Span::new(10, 11)),
            TextEdit::delete(Span::new(2, 3)),
        ];
        let applied = apply_edits("<a/><b></b/>", &edits).unwrap();
        assert_eq!(applied.text, "<a><b></b>");
        assert_eq!(applied.applied, 2);
        assert_eq!(applied.skipped, 0);
    }

    #[test]
    fn test_apply_edits_skips_overlap() {
        let edits = vec![
            TextEdit::replace(Span::new(0, 3), "x"),
            TextEdit::replace(Span::new(2, 4), "y"),
            TextEdit::insert(5, "!"),
        ];
        let applied = apply_edits("abcdef", &edits).unwrap();
        assert_eq!(applied.text, "xde!f");
        assert_eq!(applied.skipped, 1);
    }

    #[test]
    fn test_apply_edits_rejects_bad_ranges() {
        assert_eq!(
            apply_edits("abc", &[TextEdit::delete(Span::new(2, 9))]),
            Err(EditError::OutOfBounds {
                start: 2,
                end: 9,
                len: 3
            })
        );
        assert_eq!(
            apply_edits("é", &[TextEdit::delete(Span::new(0, 1))]),
            Err(EditError::NotCharBoundary { start: 0, end: 1 })
        );
    }
}
