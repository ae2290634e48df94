//! Clause, directive and entity boundaries.
//!
//! Terms are located without a parser: a term ends at a `.` that sits in
//! code at nesting depth zero, is followed by layout (or a comment, or the
//! end of the file) and is not part of a symbol-character sequence such as
//! `=..`. Lines are consumed until such a terminator is found.

use smol_str::SmolStr;

use crate::base::constants::ENTITY_OPENINGS;
use crate::base::{LineSpan, Position, SourceText};

use super::atoms::{is_name_char, is_unquoted_atom, parse_quoted_atom};
use super::delimiters::count_arguments;
use super::lexical::{code_part, is_non_code_line};
use super::text::FlatText;

/// Lines scanned per attempt when looking for a term terminator.
const INITIAL_WINDOW: u32 = 32;

const SYMBOL_CHARS: &str = "+-*/\\^<>=~:.?@#&$";

/// Kind of an entity opening directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Object,
    Protocol,
    Category,
}

impl EntityKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "object" => Some(EntityKind::Object),
            "protocol" => Some(EntityKind::Protocol),
            "category" => Some(EntityKind::Category),
            _ => None,
        }
    }

    /// Protocols cannot take parameters.
    pub fn is_parametric_capable(self) -> bool {
        !matches!(self, EntityKind::Protocol)
    }
}

/// An entity opening directive (`:- object(Name, ...)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOpening {
    pub kind: EntityKind,
    /// Unquoted entity name
    pub name: SmolStr,
    pub arity: u32,
    /// Start of the name (including an opening quote)
    pub name_start: Position,
    /// End of the name (exclusive, including a closing quote)
    pub name_end: Position,
    pub directive: LineSpan,
}

/// An entity from its opening directive to its closing directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub opening: EntityOpening,
    pub lines: LineSpan,
}

/// True when the line starts a directive.
pub fn is_directive_start(line: &str) -> bool {
    line.trim_start().starts_with(":-")
}

/// Functor of the directive starting on `line` (`dynamic` for `:- dynamic(foo/1).`).
pub fn directive_functor(line: &str) -> Option<SmolStr> {
    let rest = line.trim_start().strip_prefix(":-")?.trim_start();
    let functor: String = rest.chars().take_while(|c| is_name_char(*c)).collect();
    is_unquoted_atom(&functor).then(|| SmolStr::new(functor))
}

/// Is the `.` at `offset` a term terminator?
fn is_terminator(text: &FlatText, offset: usize) -> bool {
    if text.char_at(offset) != Some('.') || !text.is_code(offset) {
        return false;
    }
    let followed_by_layout = match text.char_at(offset + 1) {
        None => true,
        Some(c) => c.is_whitespace() || c == '%' || text.state(offset + 1).is_comment(),
    };
    let after_symbol = offset
        .checked_sub(1)
        .and_then(|prev| text.char_at(prev).filter(|_| text.is_code(prev)))
        .is_some_and(|c| SYMBOL_CHARS.contains(c));
    followed_by_layout && !after_symbol
}

/// Offset of the first terminator at depth zero in `text`, if any.
///
/// `stop_at_directive` makes a new directive start at depth zero end the
/// search unsuccessfully, so a clause missing its period does not swallow
/// the rest of the file.
fn find_terminator(text: &FlatText, stop_at_directive: bool) -> Option<usize> {
    let mut depth = 0usize;
    let chars = text.chars();
    for offset in 0..chars.len() {
        if !text.is_code(offset) {
            continue;
        }
        match chars[offset] {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '.' if depth == 0 && is_terminator(text, offset) => return Some(offset),
            ':' if stop_at_directive
                && depth == 0
                && starts_line(chars, offset)
                && text.starts_with_at(offset, ":-") =>
            {
                return None;
            }
            _ => {}
        }
    }
    None
}

/// True when only indentation precedes `offset` on its line, and that line
/// is not the first of the window.
fn starts_line(chars: &[char], offset: usize) -> bool {
    let mut idx = offset;
    while idx > 0 {
        idx -= 1;
        match chars[idx] {
            ' ' | '\t' => continue,
            '\n' => return true,
            _ => return false,
        }
    }
    false
}

/// Line range of the term (clause or directive) starting on `start_line`.
///
/// The window grows geometrically until a terminator is found or the file
/// ends; an unterminated term yields `None`.
pub fn scan_term(source: &SourceText, start_line: u32) -> Option<LineSpan> {
    let last = source.last_line()?;
    if start_line > last {
        return None;
    }

    let mut window = INITIAL_WINDOW;
    loop {
        let end = start_line.saturating_add(window).min(last);
        let text = FlatText::from_span(source, LineSpan::new(start_line, end));
        if let Some(offset) = find_terminator(&text, true) {
            let position = text.position_of(offset);
            return Some(LineSpan::new(start_line, position.line));
        }
        if end == last {
            return None;
        }
        window = window.saturating_mul(4);
    }
}

/// Line range of the directive starting on `line`.
pub fn scan_directive(source: &SourceText, line: u32) -> Option<LineSpan> {
    if !is_directive_start(source.line(line)?) {
        return None;
    }
    scan_term(source, line)
}

/// Line range of the clause whose head starts on `line`.
///
/// A fact whose head and period share the line ends immediately.
pub fn scan_clause(source: &SourceText, line: u32) -> Option<LineSpan> {
    let text = source.line(line)?;
    if is_directive_start(text) || is_non_code_line(text) {
        return None;
    }
    scan_term(source, line)
}

/// Does the code on this line end a term?
fn ends_term(line_number: u32, line: &str) -> bool {
    let code = code_part(line);
    let Some(last) = code.chars().count().checked_sub(1) else {
        return false;
    };
    let text = FlatText::from_line(line_number, &code);
    is_terminator(&text, last)
}

/// First line of the term enclosing `line`.
///
/// Walks backwards to the line after the previous terminator. Comment and
/// blank lines between terms are skipped so the result is always a code line
/// when one exists.
pub fn term_start(source: &SourceText, line: u32) -> u32 {
    let line = source.last_line().map_or(0, |last| line.min(last));
    let mut candidate = line;

    let mut current = line;
    loop {
        if let Some(text) = source.line(current) {
            if current < line && !is_non_code_line(text) && ends_term(current, text) {
                break;
            }
            if !is_non_code_line(text) {
                candidate = current;
                if is_directive_start(text) {
                    break;
                }
            }
        }
        if current == 0 {
            break;
        }
        current -= 1;
    }
    candidate
}

/// The clause or directive that contains `line`.
pub fn enclosing_term(source: &SourceText, line: u32) -> Option<LineSpan> {
    if is_non_code_line(source.line(line)?) {
        return None;
    }
    let start = term_start(source, line);
    scan_term(source, start).filter(|span| span.contains(line))
}

/// Parse an entity opening directive starting on `line`.
pub fn parse_entity_opening(source: &SourceText, line: u32) -> Option<EntityOpening> {
    let functor = directive_functor(source.line(line)?)?;
    let kind = EntityKind::from_keyword(&functor)?;
    let directive = scan_directive(source, line)?;
    let text = FlatText::from_span(source, directive);

    let neck = text.skip_whitespace(0);
    let keyword_start = text.skip_whitespace(neck + 2);
    let open = keyword_start + functor.chars().count();
    if text.char_at(open) != Some('(') {
        return None;
    }

    let name_start = text.skip_layout(open + 1);
    let (name, name_end) = read_atom(&text, name_start)?;
    let arity = if kind.is_parametric_capable() && text.char_at(name_end) == Some('(') {
        count_arguments(&text, name_end)?
    } else {
        0
    };

    Some(EntityOpening {
        kind,
        name: SmolStr::new(name),
        arity,
        name_start: text.position_of(name_start),
        name_end: text.position_of(name_end),
        directive,
    })
}

/// Read an unquoted or quoted atom at `start`, returning its content and end offset.
pub fn read_atom(text: &FlatText, start: usize) -> Option<(String, usize)> {
    let first = text.char_at(start)?;
    if first == '\'' {
        let mut end = start + 1;
        while end < text.len() && text.state(end) == text.state(start) && text.char_at(end) != Some('\n') {
            end += 1;
        }
        let content = parse_quoted_atom(&text.slice(start, end))?;
        return Some((content, end));
    }
    if !text.is_code(start) || !first.is_lowercase() {
        return None;
    }
    let mut end = start + 1;
    while text.char_at(end).is_some_and(is_name_char) {
        end += 1;
    }
    Some((text.slice(start, end), end))
}

/// Kind of the entity closing directive on this line, if it is one.
pub fn entity_closing(line: &str) -> Option<EntityKind> {
    let code = code_part(line);
    let rest = code.trim().strip_prefix(":-")?.trim_start();
    let keyword = rest.strip_suffix('.')?.trim_end();
    ENTITY_OPENINGS
        .iter()
        .find(|(_, close)| *close == keyword)
        .and_then(|(open, _)| EntityKind::from_keyword(open))
}

/// The entity enclosing `line`: searched backwards for the opening directive,
/// then forwards for the matching closing directive.
///
/// A closing directive met before any opening means `line` lies between
/// entities, and an entity that never closes yields `None`.
pub fn scan_entity(source: &SourceText, line: u32) -> Option<EntitySpan> {
    let last = source.last_line()?;
    let line = line.min(last);

    let mut current = line;
    let opening = loop {
        let text = source.line(current)?;
        if !is_non_code_line(text) {
            if current < line && entity_closing(text).is_some() {
                return None;
            }
            if is_directive_start(text) {
                if let Some(opening) = parse_entity_opening(source, current) {
                    break opening;
                }
            }
        }
        if current == 0 {
            return None;
        }
        current -= 1;
    };

    let closing_kind = opening.kind;
    let end = (opening.directive.end..=last).find(|candidate| {
        source
            .line(*candidate)
            .and_then(entity_closing)
            .is_some_and(|kind| kind == closing_kind)
    })?;
    if end < line {
        return None;
    }

    Some(EntitySpan {
        lines: LineSpan::new(opening.directive.start, end),
        opening,
    })
}
