//! Edit planning: from deduplicated locations to one consistent set of text
//! edits per file.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::base::constants::{
    CALLABLE_DIRECTIVES, DECLARATION_SIBLINGS, INDICATOR_DIRECTIVES, SCOPE_DIRECTIVES,
};
use crate::base::{FileUri, LineSpan, Range, SourceLocation, SourceText};
use crate::syntax::atoms::replacement_text;
use crate::syntax::indicator::{find_word_occurrences, is_message_position, occurrence_matches};
use crate::syntax::{
    ArityContext, FlatText, Indicator, LexState, NameOccurrence, OccurrenceForm,
    directive_functor, enclosing_term, find_name_occurrences, is_non_code_line, occurrence_form,
    parse_clause_head, scan_directive,
};

use super::error::RenameError;
use super::locations::{CandidateLocation, Origin};
use super::options::RenameOptions;

/// Replace the text in `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }
}

/// Edits for every touched file, in the order files were first touched.
///
/// Within a file edits are sorted and never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSet {
    files: IndexMap<FileUri, Vec<TextEdit>>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(Vec::is_empty)
    }

    pub fn file_count(&self) -> usize {
        self.files.values().filter(|edits| !edits.is_empty()).count()
    }

    pub fn edit_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn edits(&self, file: &FileUri) -> &[TextEdit] {
        self.files.get(file).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileUri, &[TextEdit])> {
        self.files.iter().map(|(file, edits)| (file, edits.as_slice()))
    }

    fn extend(&mut self, file: &FileUri, edits: Vec<TextEdit>) {
        if edits.is_empty() {
            return;
        }
        self.files.entry(file.clone()).or_default().extend(edits);
    }

    /// Sort each file's edits, drop exact duplicates and skip any edit that
    /// overlaps one already kept.
    fn finalize(mut self) -> Self {
        for (file, edits) in self.files.iter_mut() {
            edits.sort_by(|a, b| a.range.cmp(&b.range));
            let mut kept: Vec<TextEdit> = Vec::with_capacity(edits.len());
            for edit in edits.drain(..) {
                match kept.last() {
                    Some(last) if last.range == edit.range => {}
                    Some(last) if last.range.overlaps(&edit.range) => {
                        tracing::warn!(%file, range = ?edit.range, "skipping overlapping edit");
                    }
                    _ => kept.push(edit),
                }
            }
            *edits = kept;
        }
        self.files.retain(|_, edits| !edits.is_empty());
        self
    }
}

/// Apply `edits` (non-overlapping, columns in characters) to `text`.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    let mut line_starts = vec![0usize];
    line_starts.extend(
        chars
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == '\n')
            .map(|(idx, _)| idx + 1),
    );
    let offset = |line: u32, column: u32| -> usize {
        line_starts
            .get(line as usize)
            .map_or(chars.len(), |start| start + column as usize)
    };

    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.range.cmp(&a.range));
    let spans: Vec<(usize, usize, &str)> = ordered
        .into_iter()
        .map(|edit| {
            (
                offset(edit.range.start.line, edit.range.start.column),
                offset(edit.range.end.line, edit.range.end.column),
                edit.new_text.as_str(),
            )
        })
        .collect();
    for (start, end, new_text) in spans {
        let end = end.min(chars.len());
        let start = start.min(end);
        chars.splice(start..end, new_text.chars());
    }
    chars.into_iter().collect()
}

/// Source snapshots by file, as loaded for one rename.
pub type SourceMap = FxHashMap<FileUri, Arc<SourceText>>;

/// Look up the snapshot for a location, skipping missing files and stale
/// lines with a warning.
fn snapshot_for<'s>(sources: &'s SourceMap, location: &SourceLocation) -> Option<&'s SourceText> {
    let Some(source) = sources.get(&location.file) else {
        tracing::warn!(file = %location.file, "no snapshot for location, skipping");
        return None;
    };
    if location.line() >= source.line_count() {
        let error = RenameError::StaleLocation {
            file: location.file.clone(),
            line: location.line(),
            line_count: source.line_count(),
        };
        tracing::warn!(%error, "skipping location");
        return None;
    }
    Some(source)
}

fn occurrence_edit(text: &FlatText, occurrence: &NameOccurrence, new_name: &str) -> TextEdit {
    TextEdit::new(
        Range::new(
            text.position_of(occurrence.start),
            text.position_of(occurrence.end),
        ),
        replacement_text(occurrence.quoted, new_name),
    )
}

/// Arity context imposed by the directive starting on `line`, if any.
fn directive_context(source: &SourceText, line: u32) -> ArityContext {
    let functor = source.line(line).and_then(directive_functor);
    match functor {
        Some(functor) if CALLABLE_DIRECTIVES.contains(&functor.as_str()) => ArityContext::Any,
        Some(functor) if INDICATOR_DIRECTIVES.contains(&functor.as_str()) => {
            ArityContext::RequireIndicator
        }
        _ => ArityContext::Any,
    }
}

/// Every occurrence of `target` with the right arity inside `span`.
fn predicate_edits_in(
    source: &SourceText,
    span: LineSpan,
    target: &Indicator,
    new_name: &str,
) -> Vec<TextEdit> {
    let context = directive_context(source, span.start);
    let text = FlatText::from_span(source, span);
    find_name_occurrences(&text, &target.name)
        .iter()
        .filter(|occ| {
            let matched = occurrence_matches(&text, occ.end, target, context);
            tracing::trace!(
                position = ?text.position_of(occ.start),
                ?context,
                matched,
                "predicate occurrence"
            );
            matched
        })
        .map(|occ| occurrence_edit(&text, occ, new_name))
        .collect()
}

/// The occurrence of `name` inside a precise range, if the range still
/// points at one.
fn precise_edit(
    source: &SourceText,
    range: Range,
    name: &str,
    new_name: &str,
) -> Option<TextEdit> {
    let text = FlatText::from_span(source, LineSpan::new(range.start.line, range.end.line));
    find_name_occurrences(&text, name)
        .iter()
        .find(|occ| {
            let occ_range = Range::new(text.position_of(occ.start), text.position_of(occ.end));
            range.start <= occ_range.start && occ_range.end <= range.end
        })
        .map(|occ| occurrence_edit(&text, occ, new_name))
}

/// Rename inside the declaration directive and, when enabled, the sibling
/// directives that follow it.
fn declaration_edits(
    source: &SourceText,
    directive: LineSpan,
    target: &Indicator,
    new_name: &str,
    options: &RenameOptions,
) -> Vec<TextEdit> {
    let mut edits = predicate_edits_in(source, directive, target, new_name);
    if !options.follow_sibling_directives {
        return edits;
    }

    let mut next = directive.end + 1;
    while let Some(line) = source.line(next) {
        if is_non_code_line(line) {
            next += 1;
            continue;
        }
        let Some(functor) = directive_functor(line) else {
            break;
        };
        if !DECLARATION_SIBLINGS.contains(&functor.as_str()) {
            break;
        }
        let Some(sibling) = scan_directive(source, next) else {
            break;
        };
        let found = predicate_edits_in(source, sibling, target, new_name);
        if found.is_empty() {
            break;
        }
        tracing::trace!(directive = %functor, line = next, "following sibling directive");
        edits.extend(found);
        next = sibling.end + 1;
    }
    edits
}

/// Is the term at `span` a directive whose functor is one of `functors`?
fn directive_in(source: &SourceText, span: LineSpan, functors: &[&str]) -> bool {
    source
        .line(span.start)
        .and_then(directive_functor)
        .is_some_and(|functor| functors.contains(&functor.as_str()))
}

/// Plan the edits renaming a predicate or non-terminal.
pub fn plan_predicate(
    target: &Indicator,
    locations: &[CandidateLocation],
    sources: &SourceMap,
    new_name: &str,
    options: &RenameOptions,
) -> EditSet {
    let mut plan = EditSet::new();
    for candidate in locations {
        let location = &candidate.location;
        let Some(source) = snapshot_for(sources, location) else {
            continue;
        };
        let term = enclosing_term(source, location.line());
        let declaration = term.filter(|span| {
            directive_in(source, *span, SCOPE_DIRECTIVES)
                || (candidate.origin == Origin::Declaration
                    && directive_in(source, *span, DECLARATION_SIBLINGS))
        });

        let edits = if let Some(directive) = declaration {
            declaration_edits(source, directive, target, new_name, options)
        } else if candidate.is_line_level() {
            let span = term.unwrap_or_else(|| LineSpan::single(location.line()));
            predicate_edits_in(source, span, target, new_name)
        } else {
            precise_edit(source, location.range, &target.name, new_name)
                .into_iter()
                .collect()
        };
        if edits.is_empty() {
            tracing::warn!(?location, origin = ?candidate.origin, "no occurrence at location");
        }
        plan.extend(&location.file, edits);
    }
    plan.finalize()
}

/// Does the occurrence name an entity with `arity`?
fn entity_occurrence_matches(
    text: &FlatText,
    occurrence: &NameOccurrence,
    arity: u32,
    head_start: Option<usize>,
) -> bool {
    if is_message_position(text, occurrence.start) || head_start == Some(occurrence.start) {
        return false;
    }
    match occurrence_form(text, occurrence.end) {
        Some(OccurrenceForm::Callable { arity: found })
        | Some(OccurrenceForm::Receiver { arity: found }) => found == arity,
        Some(OccurrenceForm::Bare) => arity == 0,
        Some(OccurrenceForm::Indicator { .. }) | None => false,
    }
}

/// Plan the edits renaming an entity.
pub fn plan_entity(
    name: &str,
    arity: u32,
    locations: &[CandidateLocation],
    sources: &SourceMap,
    new_name: &str,
) -> EditSet {
    let mut plan = EditSet::new();
    for candidate in locations {
        let location = &candidate.location;
        let Some(source) = snapshot_for(sources, location) else {
            continue;
        };
        let edits: Vec<TextEdit> = if candidate.is_line_level() {
            let span = enclosing_term(source, location.line())
                .unwrap_or_else(|| LineSpan::single(location.line()));
            let text = FlatText::from_span(source, span);
            // The head of a clause is a predicate, never an entity
            let head_start = parse_clause_head(source, span.start)
                .and_then(|head| text.offset_of(head.name_range.start));
            find_name_occurrences(&text, name)
                .iter()
                .filter(|occ| entity_occurrence_matches(&text, occ, arity, head_start))
                .map(|occ| occurrence_edit(&text, occ, new_name))
                .collect()
        } else {
            precise_edit(source, location.range, name, new_name)
                .into_iter()
                .collect()
        };
        if edits.is_empty() {
            tracing::warn!(?location, "no entity occurrence at location");
        }
        plan.extend(&location.file, edits);
    }
    plan.finalize()
}

/// Plan the edits renaming a variable inside `scope`.
pub fn plan_variable(
    source: &SourceText,
    name: &str,
    scope: LineSpan,
    new_name: &str,
    options: &RenameOptions,
) -> EditSet {
    let text = FlatText::from_span(source, scope);
    let pattern: Vec<char> = name.chars().collect();
    let include_comments = options.rename_variables_in_comments;
    let edits = find_word_occurrences(&text, &pattern, |state| {
        state == LexState::Code || (include_comments && state.is_comment())
    })
    .iter()
    .map(|occ| {
        TextEdit::new(
            Range::new(text.position_of(occ.start), text.position_of(occ.end)),
            new_name,
        )
    })
    .collect();

    let mut plan = EditSet::new();
    plan.extend(source.uri(), edits);
    plan.finalize()
}
