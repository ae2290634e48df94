//! Heuristic syntax layer: lexical classification, delimiter balancing,
//! indicators and structural boundaries.
//!
//! There is no parser. Everything here works on lines and flattened text
//! windows, and callers only rely on a narrow surface:
//!
//! - [`classify`]: lexical context of a column
//! - [`scan_clause`], [`scan_directive`], [`scan_entity`]: line boundaries
//! - [`find_matching_close`], [`count_arguments`]: balanced delimiters
//! - [`Indicator`], [`occurrence_form`], [`matches_arity`]: arity checks
//! - [`clause_chain`]: consecutive clauses of a predicate

pub mod atoms;
pub mod boundary;
pub mod clause;
pub mod delimiters;
pub mod indicator;
pub mod lexical;
pub mod text;

pub use boundary::{
    EntityKind, EntityOpening, EntitySpan, directive_functor, enclosing_term, entity_closing,
    is_directive_start, parse_entity_opening, scan_clause, scan_directive, scan_entity, scan_term,
    term_start,
};
pub use clause::{ClauseHead, HeadForm, clause_chain, parse_clause_head};
pub use delimiters::{count_arguments, find_matching_close, top_level_arguments};
pub use indicator::{
    ArityContext, Indicator, IndicatorKind, NameOccurrence, OccurrenceForm, find_name_occurrences,
    matches_arity, occurrence_form,
};
pub use lexical::{LexState, LexicalContext, classify, code_part, is_non_code_line};
pub use text::FlatText;
