/// Position tracking for source text
///
/// Lines and columns are 0-indexed. Columns count Unicode scalar values
/// within a line, which is what every scanner in `syntax` indexes by.
/// A half-open range in source text (`start` inclusive, `end` exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// A position in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a range from line/column coordinates
    pub fn from_coords(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// A range covering `start..end` columns of a single line
    pub fn on_line(line: u32, start_col: u32, end_col: u32) -> Self {
        Self::from_coords(line, start_col, line, end_col)
    }

    /// The "somewhere on this line" range reported by line-level resolvers.
    pub fn line_level(line: u32) -> Self {
        Self::from_coords(line, 0, line, 0)
    }

    /// True when both columns are zero.
    ///
    /// The resolver reports line-only answers as column 0 to column 0, so a
    /// genuinely empty range at column 0 is indistinguishable from one.
    pub fn is_line_level(&self) -> bool {
        self.start.column == 0 && self.end.column == 0
    }

    /// Check if a position falls within this range (end inclusive, for cursors)
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// True when the two ranges share at least one character
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// An inclusive span of whole lines within one file.
///
/// Used for clause, directive and entity boundaries. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineSpan {
    pub start: u32,
    pub end: u32,
}

impl LineSpan {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "line span must not be inverted");
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn single(line: u32) -> Self {
        Self::new(line, line)
    }

    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }

    pub fn lines(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}
