//! Multi-line text windows.
//!
//! Clauses and directives span lines, so scanners work on a window of lines
//! flattened into one character buffer (lines joined by `\n`) together with
//! the lexical state of every character.

use crate::base::{LineSpan, Position, SourceText};

use super::lexical::{LexState, is_non_code_line, lex_states};

/// A window of source lines flattened into characters.
#[derive(Debug, Clone)]
pub struct FlatText {
    chars: Vec<char>,
    states: Vec<LexState>,
    line_starts: Vec<usize>,
    first_line: u32,
}

impl FlatText {
    /// Flatten `span` of `source`, clamped to the lines that exist.
    pub fn from_span(source: &SourceText, span: LineSpan) -> Self {
        let last = source
            .last_line()
            .map(|last| span.end.min(last))
            .unwrap_or(0);
        let lines = (span.start..=last).filter_map(|line| source.line(line));
        Self::from_lines(span.start, lines)
    }

    /// Flatten a single line of text.
    pub fn from_line(line_number: u32, text: &str) -> Self {
        Self::from_lines(line_number, std::iter::once(text))
    }

    pub fn from_lines<'a>(first_line: u32, lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut chars = Vec::new();
        let mut line_starts = Vec::new();
        let mut comment_lines = Vec::new();

        for (idx, line) in lines.into_iter().enumerate() {
            if idx > 0 {
                chars.push('\n');
            }
            line_starts.push(chars.len());
            comment_lines.push(is_prefix_comment_line(line));
            chars.extend(line.chars());
        }

        let mut states = lex_states(&chars);

        // Lines that only continue a block comment opened outside the window
        for (idx, is_comment) in comment_lines.into_iter().enumerate() {
            if !is_comment {
                continue;
            }
            let start = line_starts[idx];
            let end = line_starts.get(idx + 1).map_or(chars.len(), |next| next - 1);
            if states.get(start).copied() == Some(LexState::Code) {
                states[start..end].fill(LexState::BlockComment);
            }
        }

        Self {
            chars,
            states,
            line_starts,
            first_line,
        }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    pub fn state(&self, offset: usize) -> LexState {
        self.states.get(offset).copied().unwrap_or_default()
    }

    /// True when the character at `offset` is plain code.
    pub fn is_code(&self, offset: usize) -> bool {
        offset < self.chars.len() && self.states[offset] == LexState::Code
    }

    /// Flat offset of a source position inside the window.
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        let idx = position.line.checked_sub(self.first_line)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.chars.len(), |next| next - 1);
        let offset = start + position.column as usize;
        (offset <= end).then_some(offset)
    }

    /// Source position of a flat offset.
    pub fn position_of(&self, offset: usize) -> Position {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let start = self.line_starts.get(idx).copied().unwrap_or(0);
        Position::new(self.first_line + idx as u32, (offset - start) as u32)
    }

    /// Offset of the first character after `offset` that is not whitespace.
    pub fn skip_whitespace(&self, mut offset: usize) -> usize {
        while offset < self.chars.len() && self.chars[offset].is_whitespace() {
            offset += 1;
        }
        offset
    }

    /// Offset of the first code character at or after `offset`, skipping
    /// whitespace and comments.
    pub fn skip_layout(&self, mut offset: usize) -> usize {
        while offset < self.chars.len()
            && (self.chars[offset].is_whitespace() || self.states[offset].is_comment())
        {
            offset += 1;
        }
        offset
    }

    /// Offset of the last code character before `offset`, skipping whitespace
    /// and comments backwards.
    pub fn previous_code(&self, offset: usize) -> Option<usize> {
        let mut idx = offset.min(self.chars.len());
        while idx > 0 {
            idx -= 1;
            if !(self.chars[idx].is_whitespace() || self.states[idx].is_comment()) {
                return Some(idx);
            }
        }
        None
    }

    /// True when the code at `offset` starts with `pattern`.
    pub fn starts_with_at(&self, offset: usize, pattern: &str) -> bool {
        let mut idx = offset;
        for expected in pattern.chars() {
            if !self.is_code(idx) || self.chars[idx] != expected {
                return false;
            }
            idx += 1;
        }
        true
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        self.chars
            .get(start..end)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }
}

/// `*` or `*/` at the start of a line continues a block comment.
fn is_prefix_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('*') && is_non_code_line(line)
}
