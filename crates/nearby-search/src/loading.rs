//! Loading indicator bound to the lifetime of an in-place request.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared visibility flag for the results loading indicator.
///
/// Visibility only changes through [`LoadingIndicator::begin`] and the
/// returned [`LoadingGuard`]; dropping the guard hides the indicator, so no
/// exit path (settle, error, cancelled future) can leave it visible.
#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    tx: Arc<watch::Sender<bool>>,
}

impl LoadingIndicator {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        *self.tx.borrow()
    }

    /// Observe visibility changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Shows the indicator until the guard settles, errors or is dropped.
    #[must_use = "the indicator hides as soon as the guard is dropped"]
    pub fn begin(&self) -> LoadingGuard {
        self.tx.send_replace(true);
        LoadingGuard {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LoadingGuard {
    tx: Arc<watch::Sender<bool>>,
}

impl LoadingGuard {
    /// The request completed and its response was swapped in.
    pub fn settle(self) {
        tracing::debug!("in-place request settled");
    }

    /// The request failed.
    pub fn error(self) {
        tracing::debug!("in-place request errored");
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.tx.send_replace(false);
    }
}
