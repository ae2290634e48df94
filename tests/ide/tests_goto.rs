//! Go to declaration tests for the IDE layer.

use std::time::Duration;

use lgtnav::base::{FileUri, Position, Range};
use lgtnav::ide::{RenameError, RenameOptions, goto_declaration};
use tokio_util::sync::CancellationToken;

use crate::helpers::source_fixtures::*;
use crate::helpers::workspace::*;

async fn goto(
    resolver: &ScriptedResolver,
    workspace: &MemoryWorkspace,
    file: &str,
    position: Position,
) -> Result<Option<lgtnav::base::SourceLocation>, RenameError> {
    goto_declaration(
        resolver,
        workspace,
        &FileUri::new(file),
        position,
        &RenameOptions::default(),
        &CancellationToken::new(),
    )
    .await
}

#[tokio::test]
async fn test_line_level_declaration_is_narrowed_to_name() {
    let workspace = MemoryWorkspace::new().with_file("math.lgt", SIMPLE_PREDICATE);
    let resolver = ScriptedResolver::new().declaration(line("math.lgt", 2));

    let location = goto(&resolver, &workspace, "math.lgt", Position::new(5, 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(location.range, Range::on_line(2, 11, 14));
    assert_eq!(resolver.requests(), vec!["declaration"]);
}

#[tokio::test]
async fn test_precise_declaration_is_returned_as_is() {
    let workspace = MemoryWorkspace::new().with_file("math.lgt", SIMPLE_PREDICATE);
    let resolver = ScriptedResolver::new().declaration(span("math.lgt", 2, 11, 16));

    let location = goto(&resolver, &workspace, "math.lgt", Position::new(4, 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(location.range, Range::on_line(2, 11, 16));
}

#[tokio::test]
async fn test_declaration_in_another_file() {
    let workspace = MemoryWorkspace::new()
        .with_file("list.lgt", LIST_OBJECT)
        .with_file("client.lgt", LIST_CLIENT);
    let resolver = ScriptedResolver::new().declaration(line("list.lgt", 3));

    // `member` in `list::member(X, [1,2])`
    let location = goto(&resolver, &workspace, "client.lgt", Position::new(2, 19))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(location.file, FileUri::new("list.lgt"));
    assert_eq!(location.range, Range::on_line(3, 11, 17));
}

#[tokio::test]
async fn test_stale_declaration_is_not_refined() {
    let workspace = MemoryWorkspace::new().with_file("math.lgt", SIMPLE_PREDICATE);
    let resolver = ScriptedResolver::new().declaration(line("math.lgt", 99));

    let location = goto(&resolver, &workspace, "math.lgt", Position::new(4, 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(location, line("math.lgt", 99));
}

#[tokio::test]
async fn test_nothing_to_navigate_from() {
    let workspace = MemoryWorkspace::new().with_file("stack.lgt", PARAMETRIC_ENTITIES);
    let resolver = ScriptedResolver::new().declaration(line("stack.lgt", 0));

    // Comment line, then a variable
    assert_eq!(
        goto(&resolver, &workspace, "stack.lgt", Position::new(5, 4))
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        goto(&resolver, &workspace, "stack.lgt", Position::new(6, 6))
            .await
            .unwrap(),
        None
    );
    assert!(resolver.calls().is_empty());
}

#[tokio::test]
async fn test_goto_times_out() {
    let workspace = MemoryWorkspace::new().with_file("math.lgt", SIMPLE_PREDICATE);
    let resolver = ScriptedResolver::new()
        .declaration(line("math.lgt", 2))
        .slow(Duration::from_secs(5));
    let options = RenameOptions {
        resolver_timeout: Duration::from_millis(20),
        ..RenameOptions::default()
    };

    let result = goto_declaration(
        &resolver,
        &workspace,
        &FileUri::new("math.lgt"),
        Position::new(4, 2),
        &options,
        &CancellationToken::new(),
    )
    .await;
    assert!(matches!(result, Err(RenameError::ResolverTimeout { .. })));
}
