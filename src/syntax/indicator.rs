//! Predicate and non-terminal indicators, and arity-aware occurrence matching.

use std::fmt;

use smol_str::SmolStr;

use super::atoms::{is_name_char, is_unquoted_atom, parse_quoted_atom, quote_atom};
use super::delimiters::{count_arguments, find_matching_close};
use super::lexical::LexState;
use super::text::FlatText;

/// Whether an indicator names a predicate (`/`) or a non-terminal (`//`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Predicate,
    NonTerminal,
}

impl IndicatorKind {
    pub fn separator(self) -> &'static str {
        match self {
            IndicatorKind::Predicate => "/",
            IndicatorKind::NonTerminal => "//",
        }
    }
}

/// `name/arity` or `name//arity`. The name is stored unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Indicator {
    pub name: SmolStr,
    pub arity: u32,
    pub kind: IndicatorKind,
}

impl Indicator {
    pub fn new(name: impl Into<SmolStr>, arity: u32, kind: IndicatorKind) -> Self {
        Self {
            name: name.into(),
            arity,
            kind,
        }
    }

    pub fn predicate(name: impl Into<SmolStr>, arity: u32) -> Self {
        Self::new(name, arity, IndicatorKind::Predicate)
    }

    pub fn non_terminal(name: impl Into<SmolStr>, arity: u32) -> Self {
        Self::new(name, arity, IndicatorKind::NonTerminal)
    }

    pub fn with_kind(mut self, kind: IndicatorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Parse `name/N` or `name//N`; the name may be quoted.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (name, arity, kind) = match text.rsplit_once("//") {
            Some((name, arity)) if !name.ends_with('/') => (name, arity, IndicatorKind::NonTerminal),
            _ => {
                let (name, arity) = text.rsplit_once('/')?;
                (name, arity, IndicatorKind::Predicate)
            }
        };
        let arity = arity.trim().parse::<u32>().ok()?;
        let name = name.trim();
        let name = if is_unquoted_atom(name) {
            name.to_string()
        } else {
            parse_quoted_atom(name)?
        };
        Some(Self::new(name, arity, kind))
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_unquoted_atom(&self.name) {
            write!(f, "{}{}{}", self.name, self.kind.separator(), self.arity)
        } else {
            write!(
                f,
                "{}{}{}",
                quote_atom(&self.name),
                self.kind.separator(),
                self.arity
            )
        }
    }
}

/// How an occurrence of a name is written at its use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceForm {
    /// `name/N` or `name//N`
    Indicator { kind: IndicatorKind, arity: u32 },
    /// `name(A1, ..., AN)`
    Callable { arity: u32 },
    /// `name` or `name(...)` immediately followed by `::`: an entity receiver
    Receiver { arity: u32 },
    /// a bare atom
    Bare,
}

/// What forms a syntactic context accepts for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityContext {
    /// Clause bodies, callable-template directives, most other directives.
    Any,
    /// Directives storing indicators (`public/1`, `dynamic/1`, ...).
    RequireIndicator,
}

/// One occurrence of a name in a text window (flat offsets, `end` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameOccurrence {
    pub start: usize,
    pub end: usize,
    pub quoted: bool,
}

/// Determine the form of the occurrence ending at `name_end`.
///
/// Returns `None` when an argument list is unbalanced.
pub fn occurrence_form(text: &FlatText, name_end: usize) -> Option<OccurrenceForm> {
    if text.char_at(name_end) == Some('(') && text.is_code(name_end) {
        let arity = count_arguments(text, name_end)?;
        let close = find_matching_close(text, name_end)?;
        if is_receiver(text, close + 1) {
            return Some(OccurrenceForm::Receiver { arity });
        }
        return Some(OccurrenceForm::Callable { arity });
    }

    if is_receiver(text, name_end) {
        return Some(OccurrenceForm::Receiver { arity: 0 });
    }

    let mut offset = text.skip_whitespace(name_end);
    if text.char_at(offset) != Some('/') || !text.is_code(offset) {
        return Some(OccurrenceForm::Bare);
    }
    offset += 1;
    let kind = if text.char_at(offset) == Some('/') && text.is_code(offset) {
        offset += 1;
        IndicatorKind::NonTerminal
    } else {
        IndicatorKind::Predicate
    };
    offset = text.skip_whitespace(offset);

    let digits_start = offset;
    while text.char_at(offset).is_some_and(|c| c.is_ascii_digit()) {
        offset += 1;
    }
    if offset == digits_start {
        // Division or an indicator with a variable arity
        return Some(OccurrenceForm::Bare);
    }
    let arity = text.slice(digits_start, offset).parse().ok()?;
    Some(OccurrenceForm::Indicator { kind, arity })
}

fn is_receiver(text: &FlatText, offset: usize) -> bool {
    let offset = text.skip_whitespace(offset);
    text.starts_with_at(offset, "::")
}

/// Does an occurrence written in `form` refer to `target` in `context`?
pub fn matches_arity(form: OccurrenceForm, target: &Indicator, context: ArityContext) -> bool {
    match form {
        OccurrenceForm::Indicator { kind, arity } => kind == target.kind && arity == target.arity,
        OccurrenceForm::Callable { arity } => {
            context == ArityContext::Any && arity == target.arity
        }
        OccurrenceForm::Bare => context == ArityContext::Any && target.arity == 0,
        OccurrenceForm::Receiver { .. } => false,
    }
}

/// Does the occurrence ending at `name_end` refer to `target`?
pub fn occurrence_matches(
    text: &FlatText,
    name_end: usize,
    target: &Indicator,
    context: ArityContext,
) -> bool {
    occurrence_form(text, name_end).is_some_and(|form| matches_arity(form, target, context))
}

/// True when the occurrence starting at `start` is the message of a `::`,
/// `^^` or `:` send, i.e. a predicate rather than an entity.
pub fn is_message_position(text: &FlatText, start: usize) -> bool {
    let Some(prev) = text.previous_code(start) else {
        return false;
    };
    matches!(text.char_at(prev), Some(':') | Some('^')) && text.is_code(prev)
}

/// Every occurrence of the atom `name` in code, written unquoted or quoted.
///
/// Unquoted occurrences must sit on name boundaries; quoted ones must be a
/// whole quoted atom whose content is exactly `name`.
pub fn find_name_occurrences(text: &FlatText, name: &str) -> Vec<NameOccurrence> {
    let mut occurrences = Vec::new();
    let chars = text.chars();

    if is_unquoted_atom(name) {
        let pattern: Vec<char> = name.chars().collect();
        occurrences.extend(find_word_occurrences(text, &pattern, |state| {
            state == LexState::Code
        }));
    }

    let mut offset = 0;
    while offset < chars.len() {
        if text.state(offset) != LexState::SingleQuoted || chars[offset] != '\'' {
            offset += 1;
            continue;
        }
        let start = offset;
        let mut end = offset + 1;
        while end < chars.len() && text.state(end) == LexState::SingleQuoted && chars[end] != '\n' {
            end += 1;
        }
        let atom = text.slice(start, end);
        if parse_quoted_atom(&atom).as_deref() == Some(name) {
            occurrences.push(NameOccurrence {
                start,
                end,
                quoted: true,
            });
        }
        offset = end;
    }

    occurrences.sort_by_key(|occ| occ.start);
    occurrences
}

/// Occurrences of `pattern` on name boundaries whose characters all satisfy
/// `accept`. Used for atoms (code only) and variables (code and comments).
pub fn find_word_occurrences(
    text: &FlatText,
    pattern: &[char],
    accept: impl Fn(LexState) -> bool,
) -> Vec<NameOccurrence> {
    let chars = text.chars();
    let mut occurrences = Vec::new();
    if pattern.is_empty() || pattern.len() > chars.len() {
        return occurrences;
    }

    for start in 0..=chars.len() - pattern.len() {
        let end = start + pattern.len();
        if chars[start..end] != *pattern {
            continue;
        }
        if start > 0 && is_name_char(chars[start - 1]) {
            continue;
        }
        if end < chars.len() && is_name_char(chars[end]) {
            continue;
        }
        if !(start..end).all(|offset| accept(text.state(offset))) {
            continue;
        }
        occurrences.push(NameOccurrence {
            start,
            end,
            quoted: false,
        });
    }
    occurrences
}
