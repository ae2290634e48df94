//! Classification of the construct under the cursor.

use std::fmt;

use smol_str::SmolStr;

use crate::base::constants::{ENTITY_ARGUMENT_DIRECTIVES, ENTITY_RELATIONS};
use crate::base::{LineSpan, Position, Range, SourceText};
use crate::syntax::atoms::{
    is_name_char, is_parameter_variable, is_unquoted_atom, is_variable_name, quote_atom,
};
use crate::syntax::indicator::{find_word_occurrences, is_message_position};
use crate::syntax::{
    EntityKind, FlatText, Indicator, IndicatorKind, LexState, OccurrenceForm, directive_functor,
    enclosing_term, is_non_code_line, occurrence_form, parse_clause_head, parse_entity_opening,
    scan_entity,
};

use super::text_utils::{CursorToken, token_at_cursor};

/// What a rename request is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameTarget {
    /// A predicate or non-terminal. The kind is a first guess that the
    /// location collector may correct from the declaration.
    Predicate(Indicator),
    /// An object, protocol or category, possibly parametric.
    Entity { name: SmolStr, arity: u32 },
    /// A variable, renamed lexically inside `scope`.
    Variable { name: SmolStr, scope: LineSpan },
}

impl RenameTarget {
    pub fn is_variable(&self) -> bool {
        matches!(self, RenameTarget::Variable { .. })
    }
}

impl fmt::Display for RenameTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameTarget::Predicate(indicator) => match indicator.kind {
                IndicatorKind::Predicate => write!(f, "predicate {indicator}"),
                IndicatorKind::NonTerminal => write!(f, "non-terminal {indicator}"),
            },
            RenameTarget::Entity { name, arity } => {
                write!(f, "{}", entity_description(name, *arity))
            }
            RenameTarget::Variable { name, .. } => write!(f, "variable {name}"),
        }
    }
}

pub(crate) fn entity_description(name: &str, arity: u32) -> String {
    let name = if is_unquoted_atom(name) {
        name.to_string()
    } else {
        quote_atom(name)
    };
    match arity {
        0 => format!("entity {name}"),
        arity => format!("entity {name}/{arity}"),
    }
}

/// The target under the cursor together with the span of its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAtCursor {
    pub target: RenameTarget,
    /// Range of the name at the cursor (quotes included)
    pub range: Range,
    pub quoted: bool,
}

/// A compound term or bracketed group enclosing an offset.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EnclosingGroup {
    /// Functor name; `None` for bare parentheses, lists and braces
    functor: Option<String>,
    open: char,
    /// Zero-based index of the argument holding the offset
    argument: usize,
}

/// Groups enclosing `offset`, innermost first.
fn enclosing_groups(text: &FlatText, offset: usize) -> Vec<EnclosingGroup> {
    let chars = text.chars();
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut argument = 0usize;

    for idx in (0..offset.min(chars.len())).rev() {
        if !text.is_code(idx) {
            continue;
        }
        match chars[idx] {
            ')' | ']' | '}' => depth += 1,
            '(' | '[' | '{' if depth > 0 => depth -= 1,
            open @ ('(' | '[' | '{') => {
                let functor = (open == '(')
                    .then(|| functor_before(text, idx))
                    .flatten();
                groups.push(EnclosingGroup {
                    functor,
                    open,
                    argument,
                });
                argument = 0;
            }
            ',' if depth == 0 => argument += 1,
            _ => {}
        }
    }
    groups
}

/// The atom immediately before an opening parenthesis.
fn functor_before(text: &FlatText, open: usize) -> Option<String> {
    let mut start = open;
    while start > 0 && text.is_code(start - 1) && text.char_at(start - 1).is_some_and(is_name_char) {
        start -= 1;
    }
    let name = text.slice(start, open);
    is_unquoted_atom(&name).then_some(name)
}

/// Is the token at `start` the functor of the directive (`:- public(...)`)?
fn is_directive_functor(text: &FlatText, start: usize) -> bool {
    let Some(prev) = text.previous_code(start) else {
        return false;
    };
    text.char_at(prev) == Some('-')
        && prev
            .checked_sub(1)
            .is_some_and(|colon| text.char_at(colon) == Some(':') && text.is_code(colon))
}

/// Classify the construct at `position`.
///
/// Returns `None` inside comments and strings, over numbers and operators,
/// and over parts of directives that cannot be renamed (the directive's own
/// functor, keywords of an entity opening directive).
pub fn classify_target(source: &SourceText, position: Position) -> Option<TargetAtCursor> {
    let line = source.line(position.line)?;
    if is_non_code_line(line) {
        return None;
    }
    let token = token_at_cursor(line, position.column as usize)?;
    let range = Range::on_line(position.line, token.start, token.end);

    let span = enclosing_term(source, position.line).unwrap_or_else(|| LineSpan::single(position.line));
    let text = FlatText::from_span(source, span);
    let start = text.offset_of(Position::new(position.line, token.start))?;
    let end = text.offset_of(Position::new(position.line, token.end))?;
    if !text.is_code(start) && !token.quoted {
        return None;
    }

    let at_cursor = |target| {
        Some(TargetAtCursor {
            target,
            range,
            quoted: token.quoted,
        })
    };

    if !token.quoted && is_variable_name(&token.text) {
        if token.text == "_" {
            return None;
        }
        let scope = variable_scope(source, span, &token.text);
        tracing::trace!(variable = %token.text, ?scope, "variable at cursor");
        return at_cursor(RenameTarget::Variable {
            name: SmolStr::new(&token.text),
            scope,
        });
    }
    if !token.quoted && !is_unquoted_atom(&token.text) {
        return None;
    }

    let name = SmolStr::new(token.name());
    let form = occurrence_form(&text, end)?;
    let first_line = source.line(span.start)?;

    if let Some(functor) = directive_functor(first_line) {
        if is_directive_functor(&text, start) {
            return None;
        }
        if let Some(target) = directive_entity(source, span, &text, &token, &name, start, form, &functor) {
            return at_cursor(target?);
        }
    }

    if let OccurrenceForm::Receiver { arity } = form {
        if !is_message_position(&text, start) {
            return at_cursor(RenameTarget::Entity { name, arity });
        }
    }

    let indicator = match form {
        OccurrenceForm::Indicator { kind, arity } => Indicator::new(name, arity, kind),
        OccurrenceForm::Callable { arity } => Indicator::predicate(name, arity),
        OccurrenceForm::Bare => Indicator::predicate(name, 0),
        OccurrenceForm::Receiver { .. } => return None,
    };
    let indicator = match form {
        OccurrenceForm::Indicator { .. } => indicator,
        _ if in_grammar_body_or_head(source, span, &text, start) => {
            indicator.with_kind(IndicatorKind::NonTerminal)
        }
        _ => indicator,
    };
    at_cursor(RenameTarget::Predicate(indicator))
}

/// Entity context inside a directive.
///
/// `Some(Some(_))` is an entity, `Some(None)` a position that cannot be
/// renamed, and `None` means the directive imposes nothing.
#[allow(clippy::too_many_arguments)]
fn directive_entity(
    source: &SourceText,
    span: LineSpan,
    text: &FlatText,
    token: &CursorToken,
    name: &SmolStr,
    start: usize,
    form: OccurrenceForm,
    functor: &str,
) -> Option<Option<RenameTarget>> {
    let entity_arity = match form {
        OccurrenceForm::Callable { arity } => Some(arity),
        OccurrenceForm::Bare => Some(0),
        OccurrenceForm::Indicator { .. } | OccurrenceForm::Receiver { .. } => None,
    };

    if EntityKind::from_keyword(functor).is_some() {
        let opening = parse_entity_opening(source, span.start)?;
        let at = Position::new(text.position_of(start).line, token.start);
        if at == opening.name_start {
            return Some(Some(RenameTarget::Entity {
                name: opening.name,
                arity: opening.arity,
            }));
        }
        let groups = enclosing_groups(text, start);
        let relation = groups
            .iter()
            .find_map(|group| group.functor.as_deref())
            .is_some_and(|functor| ENTITY_RELATIONS.contains(&functor));
        return Some(match (relation, entity_arity) {
            (true, Some(arity)) => Some(RenameTarget::Entity {
                name: name.clone(),
                arity,
            }),
            _ => None,
        });
    }

    if ENTITY_ARGUMENT_DIRECTIVES.contains(&functor) {
        let groups = enclosing_groups(text, start);
        let first_argument = matches!(
            groups.as_slice(),
            [group] if group.functor.as_deref() == Some(functor) && group.argument == 0
        );
        if first_argument {
            return Some(entity_arity.map(|arity| RenameTarget::Entity {
                name: name.clone(),
                arity,
            }));
        }
    }
    None
}

/// Inside a grammar rule and outside `{}` goals, calls are non-terminals.
fn in_grammar_body_or_head(source: &SourceText, span: LineSpan, text: &FlatText, start: usize) -> bool {
    let grammar_rule = parse_clause_head(source, span.start).is_some_and(|head| head.is_grammar_rule);
    grammar_rule
        && !enclosing_groups(text, start)
            .iter()
            .any(|group| group.open == '{')
}

/// Lines in which a variable is renamed: its clause or directive, or the
/// whole entity for a parameter variable of a parametric object or category.
fn variable_scope(source: &SourceText, term: LineSpan, name: &str) -> LineSpan {
    if !is_parameter_variable(name) {
        return term;
    }
    let Some(entity) = scan_entity(source, term.start) else {
        return term;
    };
    if !entity.opening.kind.is_parametric_capable() || entity.opening.arity == 0 {
        return term;
    }
    let directive = FlatText::from_span(source, entity.opening.directive);
    let pattern: Vec<char> = name.chars().collect();
    let declared =
        !find_word_occurrences(&directive, &pattern, |state| state == LexState::Code).is_empty();
    if declared { entity.lines } else { term }
}
