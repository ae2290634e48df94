//! Clause heads and consecutive clause chains.

use smol_str::SmolStr;

use crate::base::constants::DCG_ARROW;
use crate::base::{LineSpan, Range, SourceText};

use super::boundary::{is_directive_start, read_atom, scan_term};
use super::delimiters::{count_arguments, find_matching_close};
use super::indicator::{Indicator, IndicatorKind};
use super::lexical::is_non_code_line;
use super::text::FlatText;

/// Whether a clause is written plainly or qualified with an entity
/// (`Entity::Head`, used for multifile predicates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadForm {
    Regular,
    Multifile { entity: SmolStr, entity_arity: u32 },
}

/// The head of a clause or grammar rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseHead {
    pub form: HeadForm,
    pub name: SmolStr,
    pub arity: u32,
    pub is_grammar_rule: bool,
    /// Range of the head's name (quotes included)
    pub name_range: Range,
    pub lines: LineSpan,
}

impl ClauseHead {
    pub fn kind(&self) -> IndicatorKind {
        if self.is_grammar_rule {
            IndicatorKind::NonTerminal
        } else {
            IndicatorKind::Predicate
        }
    }

    pub fn indicator(&self) -> Indicator {
        Indicator::new(self.name.clone(), self.arity, self.kind())
    }

    /// Does this head define `target`?
    pub fn defines(&self, target: &Indicator) -> bool {
        self.name == target.name && self.arity == target.arity && self.kind() == target.kind
    }
}

/// Parse the head of the clause starting on `line`.
///
/// Returns `None` for directives, comment lines, terms that do not start
/// with an atom, and heads not followed by a neck (`:-`, `-->`), a pushback
/// comma, or the terminating period.
pub fn parse_clause_head(source: &SourceText, line: u32) -> Option<ClauseHead> {
    let first = source.line(line)?;
    if is_directive_start(first) || is_non_code_line(first) {
        return None;
    }
    let lines = scan_term(source, line)?;
    let text = FlatText::from_span(source, lines);

    let start = text.skip_whitespace(0);
    let (first_name, first_end) = read_atom(&text, start)?;
    let (first_arity, after_first) = read_arguments(&text, first_end)?;

    let after = text.skip_whitespace(after_first);
    let (form, name, name_start, name_end, arity, head_end) = if text.starts_with_at(after, "::")
    {
        let pred_start = text.skip_whitespace(after + 2);
        let (pred_name, pred_end) = read_atom(&text, pred_start)?;
        let (pred_arity, after_pred) = read_arguments(&text, pred_end)?;
        (
            HeadForm::Multifile {
                entity: SmolStr::new(first_name),
                entity_arity: first_arity,
            },
            pred_name,
            pred_start,
            pred_end,
            pred_arity,
            after_pred,
        )
    } else {
        (
            HeadForm::Regular,
            first_name,
            start,
            first_end,
            first_arity,
            after_first,
        )
    };

    let neck = text.skip_layout(head_end);
    let is_grammar_rule = text.starts_with_at(neck, DCG_ARROW);
    let is_rule = text.starts_with_at(neck, ":-");
    let is_fact = text.char_at(neck) == Some('.') && text.is_code(neck);
    let is_pushback = text.char_at(neck) == Some(',') && text.is_code(neck) && contains_arrow(&text, neck);
    if !(is_grammar_rule || is_rule || is_fact || is_pushback) {
        return None;
    }

    Some(ClauseHead {
        form,
        name: SmolStr::new(name),
        arity,
        is_grammar_rule: is_grammar_rule || is_pushback,
        name_range: Range::new(text.position_of(name_start), text.position_of(name_end)),
        lines,
    })
}

/// Argument count and end offset of an optional argument list at `offset`.
fn read_arguments(text: &FlatText, offset: usize) -> Option<(u32, usize)> {
    if text.char_at(offset) == Some('(') && text.is_code(offset) {
        let arity = count_arguments(text, offset)?;
        let close = find_matching_close(text, offset)?;
        Some((arity, close + 1))
    } else {
        Some((0, offset))
    }
}

fn contains_arrow(text: &FlatText, from: usize) -> bool {
    (from..text.len()).any(|offset| text.starts_with_at(offset, DCG_ARROW))
}

/// Line ranges of the consecutive clauses defining `target`, starting with
/// the clause on `first_line`.
///
/// Blank and comment lines between clauses are skipped. The chain keeps the
/// form of its first clause: a regular chain never continues into
/// `Entity::Head` clauses and vice versa, and a multifile chain only
/// continues with the same entity. Any other head, a directive, or an
/// unterminated clause ends the chain.
pub fn clause_chain(source: &SourceText, first_line: u32, target: &Indicator) -> Vec<LineSpan> {
    let Some(first) = parse_clause_head(source, first_line) else {
        return Vec::new();
    };
    if !first.defines(target) {
        return Vec::new();
    }

    let form = first.form.clone();
    let mut chain = vec![first.lines];
    let mut next = first.lines.end + 1;

    while let Some(text) = source.line(next) {
        if is_non_code_line(text) {
            next += 1;
            continue;
        }
        if is_directive_start(text) {
            break;
        }
        match parse_clause_head(source, next) {
            Some(head) if head.form == form && head.defines(target) => {
                tracing::trace!(line = next, name = %head.name, "clause chain continues");
                chain.push(head.lines);
                next = head.lines.end + 1;
            }
            _ => break,
        }
    }

    chain
}
