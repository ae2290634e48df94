//! Boundary scanning over whole sources.

use lgtnav::base::{FileUri, LineSpan, Position, SourceText};
use lgtnav::syntax::{
    EntityKind, directive_functor, enclosing_term, entity_closing, parse_entity_opening,
    scan_clause, scan_directive, scan_entity, term_start,
};
use rstest::rstest;

use crate::helpers::source_fixtures::*;

fn source(text: &str) -> SourceText {
    SourceText::new(FileUri::new("test.lgt"), text)
}

#[rstest]
#[case::quoted_period("foo(X) :-\n\twrite('a).b'),\n\tX = 1.\nbar.\n", 0, LineSpan::new(0, 2))]
#[case::comment_period("foo(X) :-\n\t% end. here\n\tX = \"(\".\nbar.\n", 0, LineSpan::new(0, 2))]
#[case::decimal("half(X) :- X is 1.5 * 2.\nbar.\n", 0, LineSpan::new(0, 0))]
#[case::second_clause("foo.\nbar :-\n\tbaz.\n", 1, LineSpan::new(1, 2))]
fn test_clause_boundaries(#[case] text: &str, #[case] line: u32, #[case] expected: LineSpan) {
    let src = source(text);
    assert_eq!(scan_clause(&src, line), Some(expected));
}

#[test]
fn test_unbalanced_clause_has_no_boundary() {
    let src = source("foo :-\n\tbar([a, (b.\n");
    assert_eq!(scan_clause(&src, 0), None);
}

#[test]
fn test_unterminated_clause_stops_at_directive() {
    let src = source(":- object(a).\nfoo :-\n\tbar\n:- end_object.\n");
    assert_eq!(scan_clause(&src, 1), None);
}

#[test]
fn test_multi_line_directive() {
    let src = source(":- public([\n\tfoo/1,\n\tbar/2\n]).\nfoo(1).\n");
    assert_eq!(scan_directive(&src, 0), Some(LineSpan::new(0, 3)));
    assert_eq!(scan_directive(&src, 4), None);
    assert_eq!(directive_functor(src.line(0).unwrap()).as_deref(), Some("public"));
}

#[test]
fn test_enclosing_term_is_stable_for_every_line() {
    let src = source(SIMPLE_PREDICATE);
    let rule = LineSpan::new(5, 6);
    for line in rule.lines() {
        assert_eq!(term_start(&src, line), 5);
        assert_eq!(enclosing_term(&src, line), Some(rule));
    }
    assert_eq!(scan_clause(&src, rule.start), Some(rule));
    assert_eq!(enclosing_term(&src, 4), Some(LineSpan::single(4)));
    assert_eq!(enclosing_term(&src, 3), None);
}

#[test]
fn test_entity_opening_name_span() {
    let src = source(PARAMETRIC_ENTITIES);
    let opening = parse_entity_opening(&src, 0).unwrap();
    assert_eq!(opening.kind, EntityKind::Object);
    assert_eq!(opening.name, "stack");
    assert_eq!(opening.arity, 1);
    assert_eq!(opening.name_start, Position::new(0, 10));
    assert_eq!(opening.name_end, Position::new(0, 15));
}

#[test]
fn test_multi_line_entity_opening() {
    let src = source(LIST_OBJECT);
    let opening = parse_entity_opening(&src, 0).unwrap();
    assert_eq!(opening.name, "list");
    assert_eq!(opening.arity, 0);
    assert_eq!(opening.directive, LineSpan::new(0, 1));
}

#[rstest]
#[case(2, Some(LineSpan::new(0, 8)))]
#[case(8, Some(LineSpan::new(0, 8)))]
#[case(9, None)]
#[case(12, Some(LineSpan::new(10, 14)))]
fn test_sibling_entities(#[case] line: u32, #[case] expected: Option<LineSpan>) {
    let src = source(PARAMETRIC_ENTITIES);
    assert_eq!(scan_entity(&src, line).map(|entity| entity.lines), expected);
}

#[test]
fn test_entity_closing_directives() {
    assert_eq!(entity_closing(":- end_object."), Some(EntityKind::Object));
    assert_eq!(entity_closing("  :- end_category. % done"), Some(EntityKind::Category));
    assert_eq!(entity_closing(":- end_object"), None);
    assert_eq!(entity_closing(":- object(x)."), None);
}
