//! Common Logtalk sources for tests.

/// A scope directive followed by a fact and a rule.
pub const SIMPLE_PREDICATE: &str = "\
:- object(math).

\t:- public(sum/2).

\tsum(0, 0).
\tsum(N, R) :-
\t\tN > 0, R is N.

:- end_object.
";

/// A non-terminal declared with `//` but called as `digits(L)` from `phrase/2`.
pub const NON_TERMINAL: &str = "\
:- object(parser).

\t:- public(digits//1).

\tdigits([D|T]) --> digit(D), digits(T).
\tdigits([]) --> [].

\tparse(Codes, L) :-
\t\tphrase(digits(L), Codes).

:- end_object.
";

/// Multifile clauses for `bar::baz/1` separated by blank lines.
pub const MULTIFILE_CHAIN: &str = "\
:- object(foo).

\t:- multifile(bar::baz/1).

\tbar::baz(1) :-
\t\ttrue.

\tbar::baz(2).

\tbar::baz(3) :- write(x).
\tbar::qux(4).
\tbar::baz(5).

:- end_object.
";

/// A parametric object next to a sibling object using the same parameter name.
pub const PARAMETRIC_ENTITIES: &str = "\
:- object(stack(_Type_)).

\tpush(_Type_, X) :-
\t\tcheck(_Type_, X).

\t% elements are of type _Type_
\tpop(_Type_).

:- end_object.

:- object(queue(_Type_)).

\tadd(_Type_).

:- end_object.
";

/// A quoted predicate name used quoted and unquoted.
pub const QUOTED_PREDICATE: &str = "\
:- object(q).
\t:- public('foo'/2).
\t'foo'(a, b).
\tbar :- foo(1, 2).
:- end_object.
";

/// An object implementing a protocol.
pub const LIST_OBJECT: &str = "\
:- object(list,
\timplements(listp)).

\t:- public(member/2).
\tmember(H, [H|_]).
:- end_object.
";

/// A client sending a message to `list`.
pub const LIST_CLIENT: &str = "\
:- object(client).

\tfind(X) :- list::member(X, [1,2]).

:- end_object.
";

/// A protocol declaring `area/1` with every kind of sibling directive.
pub const SHAPE_PROTOCOL: &str = "\
:- protocol(shape).

\t:- public(area/1).
\t:- mode(area(-number), one).
\t:- info(area/1, [comment is 'Shape area.']).
\t:- meta_predicate(area(*)).

:- end_protocol.
";

/// First implementer of `shape`, with a two-clause `area/1`.
pub const SQUARE_OBJECT: &str = "\
:- object(square,
\timplements(shape)).

\tarea(Area) :-
\t\tside(Side),
\t\tArea is Side * Side.
\tarea(unknown) :-
\t\t\\+ side(_).

\tside(2).

:- end_object.
";

/// Second implementer of `shape`.
pub const CIRCLE_OBJECT: &str = "\
:- object(circle,
\timplements(shape)).

\tarea(Area) :-
\t\tradius(Radius),
\t\tArea is pi * Radius * Radius.
\tarea(unknown) :-
\t\t\\+ radius(_).

\tradius(1.5).

:- end_object.
";

/// A non-terminal whose only declaration is a `mode/2` template.
pub const GRAMMAR_MODE: &str = "\
:- object(lexer).

\t:- mode(token(-atom), zero_or_more).

\ttoken(T) --> word(T).
\ttoken(T) -->
\t\t[T].

\tparse(Codes, T) :-
\t\tphrase(token(T), Codes).

:- end_object.
";
