//! Byte spans in a script and the line/column positions reported for them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Half-open byte range `start..end` into the script text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty span at `offset`, used for omitted syntax such as a missing
    /// sort direction
    pub const fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Where a diagnostic points: 1-based line and column plus the byte range
/// they were computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    /// Counted in characters, not bytes
    pub column: usize,
    pub offset: usize,
    pub length: usize,
}

impl SourceLocation {
    /// Locate `span` in `source`; a span past the end points just after the
    /// last character
    pub fn from_span(span: Span, source: &str) -> Self {
        let offset = span.start.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            line,
            column,
            offset,
            length: span.end.saturating_sub(span.start),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
