//! Polling for the completion marker file a backend writes when it has
//! finished answering a request.

use std::io;
use std::path::Path;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::RenameError;
use super::options::MarkerOptions;

/// Wait until `path` exists, then optionally remove it.
///
/// Gives up with [`RenameError::ResolverTimeout`] after `options.timeout` and
/// with [`RenameError::Cancelled`] as soon as `cancel` fires.
pub async fn wait_for_marker(
    path: impl AsRef<Path>,
    options: &MarkerOptions,
    cancel: &CancellationToken,
) -> Result<(), RenameError> {
    let path = path.as_ref();
    let deadline = Instant::now() + options.timeout;

    loop {
        if cancel.is_cancelled() {
            return Err(RenameError::Cancelled);
        }
        if tokio::fs::try_exists(path).await? {
            tracing::debug!(marker = %path.display(), "marker found");
            if options.remove_after_read {
                match tokio::fs::remove_file(path).await {
                    Ok(()) => {}
                    // Someone else consumed it first
                    Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                    Err(error) => return Err(error.into()),
                }
            }
            return Ok(());
        }
        if Instant::now() >= deadline {
            tracing::warn!(marker = %path.display(), timeout = ?options.timeout, "marker never appeared");
            return Err(RenameError::ResolverTimeout {
                request: "marker",
                after: options.timeout,
            });
        }
        tokio::select! {
            _ = cancel.cancelled() => return Err(RenameError::Cancelled),
            _ = tokio::time::sleep(options.poll_interval) => {}
        }
    }
}
