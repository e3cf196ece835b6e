//! Cancellable one-shot catalog fetch
//!
//! The fetch runs on tokio's blocking pool so the frame driver never waits on
//! it. Cancelling resolves the task to [`CoreError::Cancelled`] right away; a
//! source that is already mid-call finishes in the background and its result
//! is dropped.

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::entity::Pokemon;
use crate::error::{CoreError, Result};
use crate::source::CatalogSource;

/// A spawned fetch that can be cancelled or awaited
pub struct FetchTask {
    cancel_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<Result<Vec<Pokemon>>>>,
}

impl FetchTask {
    /// Spawn on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like `tokio::spawn`.
    pub fn spawn<S>(source: S, limit: usize) -> Self
    where
        S: CatalogSource + 'static,
    {
        Self::spawn_on(&Handle::current(), source, limit)
    }

    /// Spawn on an explicit runtime handle
    pub fn spawn_on<S>(runtime: &Handle, source: S, limit: usize) -> Self
    where
        S: CatalogSource + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let handle = runtime.spawn(async move {
            let fetch = tokio::task::spawn_blocking(move || source.fetch_list(limit));
            tokio::select! {
                joined = fetch => match joined {
                    Ok(result) => result,
                    Err(e) => Err(CoreError::Fetch(format!("fetch task failed: {e}"))),
                },
                _ = cancel_rx => {
                    tracing::debug!("Catalog fetch cancelled");
                    Err(CoreError::Cancelled)
                }
            }
        });

        Self {
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    /// Request cancellation; idempotent
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Whether the task has produced its result
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the result
    pub async fn join(mut self) -> Result<Vec<Pokemon>> {
        // Dropping the sender counts as a cancel, so keep it alive while waiting
        let _cancel_guard = self.cancel_tx.take();
        let Some(handle) = self.handle.take() else {
            return Err(CoreError::Cancelled);
        };
        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(CoreError::Cancelled),
            Err(e) => Err(CoreError::Fetch(format!("fetch task failed: {e}"))),
        }
    }
}

impl Drop for FetchTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
