//! Occurrence forms and arity matching.

use lgtnav::syntax::indicator::{find_name_occurrences, is_message_position, occurrence_matches};
use lgtnav::syntax::{
    ArityContext, FlatText, Indicator, IndicatorKind, OccurrenceForm, matches_arity,
    occurrence_form,
};
use rstest::rstest;

fn flat(text: &str) -> FlatText {
    FlatText::from_lines(0, text.split('\n'))
}

#[rstest]
#[case("foo(a, b(c, d), [e, f])", OccurrenceForm::Callable { arity: 3 })]
#[case("foo('a,b', \"c,d\")", OccurrenceForm::Callable { arity: 2 })]
#[case("foo({a, b})", OccurrenceForm::Callable { arity: 1 })]
#[case("foo(\n\ta,\n\tb\n)", OccurrenceForm::Callable { arity: 2 })]
#[case("foo/2", OccurrenceForm::Indicator { kind: IndicatorKind::Predicate, arity: 2 })]
#[case("foo // 1", OccurrenceForm::Indicator { kind: IndicatorKind::NonTerminal, arity: 1 })]
#[case("foo :- true", OccurrenceForm::Bare)]
#[case("foo / N", OccurrenceForm::Bare)]
#[case("foo::bar", OccurrenceForm::Receiver { arity: 0 })]
#[case("foo(X) :: bar", OccurrenceForm::Receiver { arity: 1 })]
fn test_occurrence_form(#[case] text: &str, #[case] expected: OccurrenceForm) {
    assert_eq!(occurrence_form(&flat(text), 3), Some(expected));
}

#[test]
fn test_unbalanced_arguments_have_no_form() {
    assert_eq!(occurrence_form(&flat("foo(a, b"), 3), None);
}

#[rstest]
#[case(OccurrenceForm::Callable { arity: 2 }, ArityContext::Any, true)]
#[case(OccurrenceForm::Callable { arity: 2 }, ArityContext::RequireIndicator, false)]
#[case(OccurrenceForm::Callable { arity: 1 }, ArityContext::Any, false)]
#[case(OccurrenceForm::Indicator { kind: IndicatorKind::Predicate, arity: 2 }, ArityContext::RequireIndicator, true)]
#[case(OccurrenceForm::Indicator { kind: IndicatorKind::NonTerminal, arity: 2 }, ArityContext::Any, false)]
#[case(OccurrenceForm::Bare, ArityContext::Any, false)]
#[case(OccurrenceForm::Receiver { arity: 2 }, ArityContext::Any, false)]
fn test_matches_arity(
    #[case] form: OccurrenceForm,
    #[case] context: ArityContext,
    #[case] expected: bool,
) {
    let target = Indicator::predicate("foo", 2);
    assert_eq!(matches_arity(form, &target, context), expected);
}

#[test]
fn test_bare_atom_matches_zero_arity() {
    let target = Indicator::predicate("run", 0);
    assert!(occurrence_matches(&flat("run, halt"), 3, &target, ArityContext::Any));
    assert!(!occurrence_matches(
        &flat("run, halt"),
        3,
        &target,
        ArityContext::RequireIndicator
    ));
}

#[test]
fn test_name_occurrences_skip_comments_and_longer_names() {
    let text = flat("foo, 'foo', foo_bar, % foo");
    let found: Vec<_> = find_name_occurrences(&text, "foo")
        .into_iter()
        .map(|occ| (occ.start, occ.end, occ.quoted))
        .collect();
    assert_eq!(found, vec![(0, 3, false), (5, 10, true)]);
}

#[test]
fn test_quoted_only_name() {
    let text = flat("'a b'(1), a, b");
    let found = find_name_occurrences(&text, "a b");
    assert_eq!(found.len(), 1);
    assert_eq!((found[0].start, found[0].end), (0, 5));
}

#[test]
fn test_message_position() {
    let text = flat("list::member(X), ::foo, ^^bar");
    assert!(!is_message_position(&text, 0));
    assert!(is_message_position(&text, 6));
    assert!(is_message_position(&text, 19));
    assert!(is_message_position(&text, 26));
}

#[test]
fn test_indicator_display_quotes_when_needed() {
    assert_eq!(Indicator::predicate("sum", 2).to_string(), "sum/2");
    assert_eq!(Indicator::non_terminal("digits", 1).to_string(), "digits//1");
    assert_eq!(Indicator::predicate("a b", 0).to_string(), "'a b'/0");
}
