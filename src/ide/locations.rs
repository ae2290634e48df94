//! Location collection: turning one cursor position into every place a
//! predicate, non-terminal or entity occurs, using the external resolver.

use std::sync::Arc;

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use crate::base::constants::DCG_ARROW;
use crate::base::{FileUri, LineSpan, Position, Range, SourceLocation, SourceText};
use crate::syntax::{
    FlatText, Indicator, NameOccurrence, OccurrenceForm, clause_chain, enclosing_term,
    find_name_occurrences, occurrence_form, parse_clause_head, parse_entity_opening, term_start,
};

use super::error::RenameError;
use super::options::RenameOptions;
use super::resolver::{Resolver, Snapshots, SourceProvider, bounded};
use super::target::{RenameTarget, entity_description};

/// Where a candidate location came from. Earlier variants win when the same
/// range is reported more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    Declaration,
    Definition,
    Implementation,
    Reference,
}

/// A location reported by the resolver (or found by clause chaining).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLocation {
    pub location: SourceLocation,
    pub origin: Origin,
}

impl CandidateLocation {
    pub fn new(location: SourceLocation, origin: Origin) -> Self {
        Self { location, origin }
    }

    pub fn is_line_level(&self) -> bool {
        self.location.range.is_line_level()
    }
}

/// Sort locations by file and range and drop repeated ranges, keeping the
/// strongest origin for each.
pub fn deduplicate(mut locations: Vec<CandidateLocation>) -> Vec<CandidateLocation> {
    locations.sort_by(|a, b| {
        a.location
            .cmp(&b.location)
            .then_with(|| a.origin.cmp(&b.origin))
    });
    locations.dedup_by(|later, kept| later.location == kept.location);
    locations
}

/// Does an occurrence written in `form` plausibly name `target`, whatever
/// its kind? Used to pin down declarations before the kind is known.
fn names_arity(form: OccurrenceForm, arity: u32) -> bool {
    match form {
        OccurrenceForm::Indicator { arity: found, .. } | OccurrenceForm::Callable { arity: found } => {
            found == arity
        }
        OccurrenceForm::Bare => arity == 0,
        OccurrenceForm::Receiver { .. } => false,
    }
}

/// Occurrences of `name` in the term that contains `line`, limited to the
/// lines from `line` onwards.
fn term_occurrences(source: &SourceText, line: u32, name: &str) -> (FlatText, Vec<NameOccurrence>) {
    let span = enclosing_term(source, line)
        .map(|span| LineSpan::new(line.max(span.start), span.end))
        .unwrap_or_else(|| LineSpan::single(line));
    let text = FlatText::from_span(source, span);
    let occurrences = find_name_occurrences(&text, name);
    (text, occurrences)
}

/// Narrow a line-level location to the first occurrence of `target`'s name
/// with a compatible arity.
pub(crate) fn refine_predicate_location(
    source: &SourceText,
    location: &SourceLocation,
    target: &Indicator,
) -> Option<SourceLocation> {
    let (text, occurrences) = term_occurrences(source, location.line(), &target.name);
    let occurrence = occurrences.into_iter().find(|occ| {
        occurrence_form(&text, occ.end).is_some_and(|form| names_arity(form, target.arity))
    })?;
    Some(SourceLocation::new(
        location.file.clone(),
        Range::new(text.position_of(occurrence.start), text.position_of(occurrence.end)),
    ))
}

/// Narrow a line-level location to the first occurrence of an entity name.
pub(crate) fn refine_entity_location(
    source: &SourceText,
    location: &SourceLocation,
    name: &str,
) -> Option<SourceLocation> {
    let (text, occurrences) = term_occurrences(source, location.line(), name);
    let occurrence = occurrences.first()?;
    Some(SourceLocation::new(
        location.file.clone(),
        Range::new(text.position_of(occurrence.start), text.position_of(occurrence.end)),
    ))
}

/// The indicator written in the declaration at `location`, which settles
/// whether the target is a predicate or a non-terminal.
fn declared_indicator(
    source: &SourceText,
    location: &SourceLocation,
    target: &Indicator,
) -> Option<Indicator> {
    let span = enclosing_term(source, location.line())?;
    let text = FlatText::from_span(source, span);
    let mut declared: Vec<Indicator> = find_name_occurrences(&text, &target.name)
        .into_iter()
        .filter_map(|occ| match occurrence_form(&text, occ.end)? {
            OccurrenceForm::Indicator { kind, arity } => {
                Some(Indicator::new(target.name.clone(), arity, kind))
            }
            _ => None,
        })
        .collect();

    // Both kinds may be declared together; the form seen at the cursor decides
    let exact = declared
        .iter()
        .position(|found| found.arity == target.arity && found.kind == target.kind)
        .or_else(|| declared.iter().position(|found| found.arity == target.arity));
    if let Some(exact) = exact {
        return Some(declared.swap_remove(exact));
    }
    // A declaration carrying a single indicator for this name is authoritative
    if declared.len() == 1 {
        return declared.pop();
    }
    None
}

/// The kind implied by the definition at `location`: the clause head decides,
/// falling back to a DCG arrow anywhere on the line.
fn defined_indicator(
    source: &SourceText,
    location: &SourceLocation,
    target: &Indicator,
) -> Indicator {
    let start = term_start(source, location.line());
    let head = parse_clause_head(source, start)
        .filter(|head| head.name == target.name && head.arity == target.arity);
    if let Some(head) = head {
        return head.indicator();
    }
    let arrow = source
        .line(location.line())
        .is_some_and(|line| line.contains(DCG_ARROW));
    if arrow {
        Indicator::non_terminal(target.name.clone(), target.arity)
    } else {
        target.clone()
    }
}

/// Position the follow-up queries are sent from: the name itself when a
/// line-level answer can be narrowed, the reported start otherwise.
async fn follow_up_position<P: SourceProvider>(
    snapshots: &Snapshots<'_, P>,
    location: &SourceLocation,
    target: &Indicator,
) -> (Option<Arc<SourceText>>, Position) {
    let source = match snapshots.get(&location.file).await {
        Ok(source) => Some(source),
        Err(error) => {
            tracing::warn!(file = %location.file, %error, "cannot read resolver location");
            None
        }
    };
    let position = match (&source, location.range.is_line_level()) {
        (Some(source), true) => refine_predicate_location(source, location, target)
            .map_or(location.range.start, |refined| refined.range.start),
        _ => location.range.start,
    };
    (source, position)
}

/// Collect every location of a predicate or non-terminal.
///
/// Returns the target with its kind settled by the fallback chain:
/// declaration text, then definition text, then the guess made at the cursor.
pub async fn collect_predicate_locations<R: Resolver, P: SourceProvider>(
    resolver: &R,
    snapshots: &Snapshots<'_, P>,
    doc: &FileUri,
    position: Position,
    target: &Indicator,
    options: &RenameOptions,
    cancel: &CancellationToken,
) -> Result<(Indicator, Vec<CandidateLocation>), RenameError> {
    let mut target = target.clone();
    let mut locations = Vec::new();
    let mut settled = false;

    let declaration = bounded(
        "declaration",
        options,
        cancel,
        resolver.declaration(doc, position),
    )
    .await?;

    let (query_file, query_position) = if let Some(declaration) = declaration {
        tracing::debug!(location = ?declaration, "declaration found");
        let (source, from) = follow_up_position(snapshots, &declaration, &target).await;
        if let Some(declared) = source
            .as_deref()
            .and_then(|source| declared_indicator(source, &declaration, &target))
        {
            tracing::debug!(indicator = %declared, "kind resolved from declaration");
            target = declared;
            settled = true;
        }
        let file = declaration.file.clone();
        locations.push(CandidateLocation::new(declaration, Origin::Declaration));
        (file, from)
    } else {
        let definition = bounded(
            "definition",
            options,
            cancel,
            resolver.definition(doc, position),
        )
        .await?;
        match definition {
            Some(definition) => {
                tracing::debug!(location = ?definition, "no declaration, using definition");
                if let Ok(source) = snapshots.get(&definition.file).await {
                    target = defined_indicator(&source, &definition, &target);
                    settled = true;
                }
                locations.push(CandidateLocation::new(definition, Origin::Definition));
            }
            None => {
                tracing::debug!("no declaration or definition, using references");
            }
        }
        (doc.clone(), position)
    };

    let has_declaration = locations
        .iter()
        .any(|candidate| candidate.origin == Origin::Declaration);
    if has_declaration {
        let definition = bounded(
            "definition",
            options,
            cancel,
            resolver.definition(&query_file, query_position),
        )
        .await?;
        if let Some(definition) = definition {
            if !settled {
                // The declaration named no indicator for this arity
                if let Ok(source) = snapshots.get(&definition.file).await {
                    target = defined_indicator(&source, &definition, &target);
                    tracing::debug!(indicator = %target, "kind resolved from definition");
                }
            }
            locations.push(CandidateLocation::new(definition, Origin::Definition));
        }
    }

    let implementations = bounded(
        "implementation",
        options,
        cancel,
        resolver.implementation(&query_file, query_position),
    )
    .await?;
    locations.extend(
        implementations
            .into_iter()
            .map(|location| CandidateLocation::new(location, Origin::Implementation)),
    );

    let references = bounded(
        "references",
        options,
        cancel,
        resolver.references(&query_file, query_position, true),
    )
    .await?;
    locations.extend(
        references
            .into_iter()
            .map(|location| CandidateLocation::new(location, Origin::Reference)),
    );

    if locations.is_empty() {
        return Err(RenameError::no_locations(RenameTarget::Predicate(target)));
    }

    let mut locations = deduplicate(locations);
    if options.expand_clause_chains {
        locations = expand_clause_chains(snapshots, locations, &target).await;
    }
    Ok((target, locations))
}

/// Add the clauses that follow every definition and implementation as
/// further implementation locations.
pub async fn expand_clause_chains<P: SourceProvider>(
    snapshots: &Snapshots<'_, P>,
    locations: Vec<CandidateLocation>,
    target: &Indicator,
) -> Vec<CandidateLocation> {
    let mut expanded = locations.clone();
    for candidate in &locations {
        if !matches!(candidate.origin, Origin::Definition | Origin::Implementation) {
            continue;
        }
        let file = &candidate.location.file;
        let source = match snapshots.get(file).await {
            Ok(source) => source,
            Err(error) => {
                tracing::warn!(%file, %error, "skipping clause chain expansion");
                continue;
            }
        };
        if candidate.location.line() >= source.line_count() {
            continue;
        }
        let first = term_start(&source, candidate.location.line());
        let chain = clause_chain(&source, first, target);
        tracing::trace!(%file, first, clauses = chain.len(), "expanded clause chain");
        expanded.extend(chain.into_iter().skip(1).map(|span| {
            CandidateLocation::new(
                SourceLocation::line_level(file.clone(), span.start),
                Origin::Implementation,
            )
        }));
    }
    deduplicate(expanded)
}

/// Collect every location of an entity name.
///
/// When the cursor sits on the name in the entity's opening directive that
/// occurrence is added directly; otherwise the resolver is asked for the
/// declaration (or definition). All other occurrences come from references.
#[allow(clippy::too_many_arguments)]
pub async fn collect_entity_locations<R: Resolver, P: SourceProvider>(
    resolver: &R,
    snapshots: &Snapshots<'_, P>,
    doc: &FileUri,
    position: Position,
    name: &SmolStr,
    arity: u32,
    options: &RenameOptions,
    cancel: &CancellationToken,
) -> Result<Vec<CandidateLocation>, RenameError> {
    let source = snapshots.get(doc).await?;
    let mut locations = Vec::new();

    let opening = parse_entity_opening(&source, term_start(&source, position.line))
        .filter(|opening| opening.name == *name && opening.arity == arity)
        .filter(|opening| Range::new(opening.name_start, opening.name_end).contains(position));

    if let Some(opening) = opening {
        locations.push(CandidateLocation::new(
            SourceLocation::new(doc.clone(), Range::new(opening.name_start, opening.name_end)),
            Origin::Declaration,
        ));
    } else {
        let declaration = bounded(
            "declaration",
            options,
            cancel,
            resolver.declaration(doc, position),
        )
        .await?;
        let declaration = match declaration {
            Some(location) => Some(location),
            None => {
                bounded(
                    "definition",
                    options,
                    cancel,
                    resolver.definition(doc, position),
                )
                .await?
            }
        };
        locations.extend(
            declaration.map(|location| CandidateLocation::new(location, Origin::Declaration)),
        );
    }

    let references = bounded(
        "references",
        options,
        cancel,
        resolver.references(doc, position, true),
    )
    .await?;
    locations.extend(
        references
            .into_iter()
            .map(|location| CandidateLocation::new(location, Origin::Reference)),
    );

    if locations.is_empty() {
        return Err(RenameError::no_locations(entity_description(name, arity)));
    }
    Ok(deduplicate(locations))
}
