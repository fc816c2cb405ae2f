//! Per-view remote resources and their loading lifecycle.
//!
//! A `ResourceCell` moves `Unloaded -> Loading -> Loaded | Errored` once per
//! fetch. Settlement is guaranteed: if the fetch future panics the cell
//! records an error, and if it is dropped mid-flight a guard settles the
//! cell on drop. Results that arrive after the owning view unmounted are
//! discarded.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::watch;

use crate::error::ApiError;

/// One remote value as seen by a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewResource<T> {
    Unloaded,
    Loading,
    Loaded(T),
    /// Human-readable reason, as shown to the user.
    Errored(String),
}

impl<T> ViewResource<T> {
    /// Views render a placeholder until the resource settles.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Unloaded | Self::Loading)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Errored(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Errored(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn from_result(result: &Result<T, ApiError>) -> Self
    where
        T: Clone,
    {
        match result {
            Ok(value) => Self::Loaded(value.clone()),
            Err(e) => Self::Errored(e.user_message()),
        }
    }
}

impl<T> Default for ViewResource<T> {
    fn default() -> Self {
        Self::Unloaded
    }
}

// ═══════════════════════════════════════════════════════════
// ViewScope: liveness of the owning view
// ═══════════════════════════════════════════════════════════

/// Shared mounted flag. Cloned into every fetch a view starts.
#[derive(Debug, Clone)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Mark the view gone. Fetches still in flight will discard their results.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// ResourceCell
// ═══════════════════════════════════════════════════════════

/// Observable slot holding one `ViewResource`. Cheap to clone; clones share
/// the slot.
pub struct ResourceCell<T> {
    tx: Arc<watch::Sender<ViewResource<T>>>,
}

impl<T> Clone for ResourceCell<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ResourceCell<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewResource::Unloaded);
        Self { tx: Arc::new(tx) }
    }

    /// Current state snapshot.
    pub fn get(&self) -> ViewResource<T> {
        self.tx.borrow().clone()
    }

    /// Loaded value, if any.
    pub fn value(&self) -> Option<T> {
        self.tx.borrow().loaded().cloned()
    }

    /// Receive every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ViewResource<T>> {
        self.tx.subscribe()
    }

    /// Replace the state directly (e.g. clearing search results).
    pub fn set(&self, state: ViewResource<T>) {
        self.tx.send_replace(state);
    }

    /// Drive one fetch to completion.
    ///
    /// Returns `Ok` with the loaded value, or the error that put the cell
    /// into `Errored`. When the scope was unmounted before the fetch
    /// settled, the cell is left alone and the outcome is still returned.
    pub async fn fetch<F>(&self, scope: &ViewScope, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if scope.is_mounted() {
            self.tx.send_replace(ViewResource::Loading);
        }
        let mut guard = SettleGuard {
            tx: Arc::clone(&self.tx),
            scope: scope.clone(),
            settled: false,
        };

        let outcome = match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic_message(&*panic);
                tracing::error!(reason = %reason, "Resource fetch panicked");
                Err(ApiError::Interrupted(reason))
            }
        };

        guard.settle(ViewResource::from_result(&outcome));
        outcome
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ResourceCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Settles the cell exactly once: explicitly on completion, or as
/// `Errored` when the fetch future is dropped before completing.
struct SettleGuard<T> {
    tx: Arc<watch::Sender<ViewResource<T>>>,
    scope: ViewScope,
    settled: bool,
}

impl<T> SettleGuard<T> {
    fn settle(&mut self, state: ViewResource<T>) {
        self.settled = true;
        if !self.scope.is_mounted() {
            tracing::debug!("View unmounted; discarding fetch result");
            return;
        }
        self.tx.send_replace(state);
    }
}

impl<T> Drop for SettleGuard<T> {
    fn drop(&mut self) {
        if !self.settled {
            self.settle(ViewResource::Errored(
                "The request was cancelled before it completed.".to_string(),
            ));
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
