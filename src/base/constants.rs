//! Logtalk vocabulary the scanners key on.

/// Predicate scope directives. The declaration of a predicate lives in one of these.
pub const SCOPE_DIRECTIVES: &[&str] = &["public", "protected", "private"];

/// Sibling directives that hold predicate indicators (`name/N`, `name//N`).
///
/// A bare atom in these never stands for a zero-arity predicate.
pub const INDICATOR_DIRECTIVES: &[&str] = &[
    "public",
    "protected",
    "private",
    "dynamic",
    "discontiguous",
    "multifile",
    "synchronized",
    "coinductive",
    "info",
    "uses",
    "use_module",
];

/// Sibling directives that hold callable templates (`name(+, -)`).
pub const CALLABLE_DIRECTIVES: &[&str] = &["mode", "meta_predicate", "meta_non_terminal"];

/// Directives followed after a scope directive when renaming a predicate.
pub const DECLARATION_SIBLINGS: &[&str] = &[
    "dynamic",
    "discontiguous",
    "multifile",
    "synchronized",
    "coinductive",
    "info",
    "mode",
    "meta_predicate",
    "meta_non_terminal",
];

/// Entity kinds and their closing directives.
pub const ENTITY_OPENINGS: &[(&str, &str)] = &[
    ("object", "end_object"),
    ("protocol", "end_protocol"),
    ("category", "end_category"),
];

/// Entity relations that appear as arguments of an entity opening directive.
pub const ENTITY_RELATIONS: &[&str] = &[
    "extends",
    "implements",
    "imports",
    "instantiates",
    "specializes",
    "complements",
];

/// Directives whose first argument names an entity.
pub const ENTITY_ARGUMENT_DIRECTIVES: &[&str] = &["uses", "alias"];

/// Grammar rule neck.
pub const DCG_ARROW: &str = "-->";
