//! Typeahead lookup of members and providers.
//!
//! Last query wins: every search takes a ticket, and a response is applied
//! only if no newer search has started since. Failures settle the results
//! as errored and are logged; they are not worth a toast while typing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::DirectoryEntry;
use crate::resource::{ResourceCell, ViewResource};

use super::ViewContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Members,
    Providers,
}

#[derive(Clone)]
pub struct DirectorySearch {
    ctx: ViewContext,
    target: SearchTarget,
    pub results: ResourceCell<Vec<DirectoryEntry>>,
    latest: Arc<AtomicU64>,
}

impl DirectorySearch {
    pub fn new(ctx: ViewContext, target: SearchTarget) -> Self {
        Self {
            ctx,
            target,
            results: ResourceCell::new(),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run a search for `query`. Returns the hits when this query was still
    /// the latest one on completion and the lookup succeeded.
    pub async fn search(&self, query: &str) -> Option<Vec<DirectoryEntry>> {
        let ticket = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let query = query.trim();
        if query.is_empty() {
            self.results.set(ViewResource::Loaded(Vec::new()));
            return Some(Vec::new());
        }

        self.results.set(ViewResource::Loading);
        let outcome = match self.target {
            SearchTarget::Members => self.ctx.client.search_members(query).await,
            SearchTarget::Providers => self.ctx.client.search_providers(query).await,
        };

        if self.latest.load(Ordering::Acquire) != ticket || !self.ctx.is_mounted() {
            tracing::debug!(query, "Discarding superseded search result");
            return None;
        }

        self.results.set(ViewResource::from_result(&outcome));
        match outcome {
            Ok(hits) => Some(hits),
            Err(e) => {
                tracing::warn!(kind = ?self.target, error = %e, "Directory search failed");
                None
            }
        }
    }

    /// Forget results and invalidate any search in flight.
    pub fn clear(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
        self.results.set(ViewResource::Unloaded);
    }
}
