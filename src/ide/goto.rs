//! Go-to-declaration navigation.

use tokio_util::sync::CancellationToken;

use crate::base::{FileUri, Position, SourceLocation, SourceText};

use super::error::RenameError;
use super::locations::{refine_entity_location, refine_predicate_location};
use super::options::RenameOptions;
use super::resolver::{Resolver, SourceProvider, bounded};
use super::target::{RenameTarget, classify_target};

/// Find the declaration of the construct at `position`.
///
/// A line-level answer from the resolver is narrowed to the name itself when
/// the declaration's text allows it.
pub async fn goto_declaration<R: Resolver, P: SourceProvider>(
    resolver: &R,
    sources: &P,
    doc: &FileUri,
    position: Position,
    options: &RenameOptions,
    cancel: &CancellationToken,
) -> Result<Option<SourceLocation>, RenameError> {
    let text = sources.read(doc).await?;
    let source = SourceText::new(doc.clone(), &text);
    let Some(at) = classify_target(&source, position) else {
        tracing::debug!(%doc, ?position, "nothing to navigate from");
        return Ok(None);
    };
    if at.target.is_variable() {
        return Ok(None);
    }

    let declaration = bounded(
        "declaration",
        options,
        cancel,
        resolver.declaration(doc, position),
    )
    .await?;
    let Some(declaration) = declaration else {
        return Ok(None);
    };
    if !declaration.range.is_line_level() {
        return Ok(Some(declaration));
    }

    let target_source = if declaration.file == *doc {
        source
    } else {
        match sources.read(&declaration.file).await {
            Ok(text) => SourceText::new(declaration.file.clone(), &text),
            Err(error) => {
                tracing::warn!(file = %declaration.file, %error, "cannot refine declaration");
                return Ok(Some(declaration));
            }
        }
    };
    if declaration.line() >= target_source.line_count() {
        return Ok(Some(declaration));
    }

    let refined = match &at.target {
        RenameTarget::Predicate(indicator) => {
            refine_predicate_location(&target_source, &declaration, indicator)
        }
        RenameTarget::Entity { name, .. } => {
            refine_entity_location(&target_source, &declaration, name)
        }
        RenameTarget::Variable { .. } => None,
    };
    tracing::trace!(?declaration, ?refined, "declaration refined");
    Ok(Some(refined.unwrap_or(declaration)))
}
