//! Role portals and the pages around them.
//!
//! Each view owns its resources and drafts and is rebuilt on every mount.
//! Loads run concurrently; each one settles its own cell and reports its
//! own failure.

pub mod assistant;
pub mod member;
pub mod payer;
pub mod profile;
pub mod provider;
pub mod search;

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::forms::{Draft, FormController};
use crate::models::Validate;
use crate::notify::Notifier;
use crate::resource::{ResourceCell, ViewResource, ViewScope};

pub use assistant::Assistant;
pub use member::MemberPortal;
pub use payer::{AiStatusBoard, PayerPortal};
pub use profile::ProfileView;
pub use provider::ProviderPortal;
pub use search::{DirectorySearch, SearchTarget};

/// What every view needs: the client, the notifier and its own liveness scope.
#[derive(Clone)]
pub struct ViewContext {
    pub client: ApiClient,
    pub notifier: Arc<Notifier>,
    pub scope: ViewScope,
}

impl ViewContext {
    pub fn new(client: ApiClient, notifier: Arc<Notifier>) -> Self {
        Self {
            client,
            notifier,
            scope: ViewScope::new(),
        }
    }

    /// Fetch into `cell`, notifying under `error_title` on failure. Nothing
    /// is reported once the view has unmounted.
    pub async fn load<T, F>(
        &self,
        cell: &ResourceCell<T>,
        error_title: &str,
        fut: F,
    ) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: Future<Output = Result<T, ApiError>>,
    {
        let result = cell.fetch(&self.scope, fut).await;
        if let Err(e) = &result {
            if self.scope.is_mounted() {
                self.notifier.api_error(error_title, e);
            }
        }
        result
    }

    /// Read the enveloped resource at `path` into `cell` and return the
    /// state it settled in.
    pub async fn fetch_resource<T>(&self, cell: &ResourceCell<T>, path: &str) -> ViewResource<T>
    where
        T: DeserializeOwned + Validate + Clone + Send + Sync + 'static,
    {
        let _ = self.load(cell, "Error", self.client.get_data::<T>(path)).await;
        cell.get()
    }

    pub fn form<D: Draft>(&self) -> FormController<D> {
        FormController::new(self.client.clone(), self.notifier.clone())
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.scope.is_mounted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Claim, Role};
    use crate::notify::NotificationKind;
    use crate::test_support::{MockBackend, TestShell};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Json;
    use serde_json::json;

    #[tokio::test]
    async fn server_error_settles_errored_with_one_toast() {
        let backend = MockBackend::start(|router| {
            router.route(
                "/member/claims",
                get(|| async {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "Database unavailable" })))
                }),
            )
        })
        .await;
        let shell = TestShell::logged_in(&backend, Role::Member);
        let ctx = shell.view();
        let claims: ResourceCell<Vec<Claim>> = ResourceCell::new();

        let state = ctx.fetch_resource(&claims, "/member/claims").await;

        assert_eq!(state, ViewResource::Errored("Database unavailable".into()));
        let toasts = shell.notifier.visible();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, NotificationKind::Error);
        assert_eq!(toasts[0].description, "Database unavailable");
    }

    #[tokio::test]
    async fn missing_envelope_is_rejected_whole() {
        let backend = MockBackend::start(|router| {
            router.route(
                "/member/claims",
                get(|| async { Json(json!([{ "claim_id": "C1" }])) }),
            )
        })
        .await;
        let shell = TestShell::logged_in(&backend, Role::Member);
        let ctx = shell.view();
        let claims: ResourceCell<Vec<Claim>> = ResourceCell::new();

        let state = ctx.fetch_resource(&claims, "/member/claims").await;

        assert!(state.loaded().is_none());
        assert!(state.error().is_some());
    }

    #[tokio::test]
    async fn unmounted_view_stays_quiet() {
        let backend = MockBackend::start(|router| {
            router.route(
                "/member/claims",
                get(|| async { (StatusCode::BAD_GATEWAY, Json(json!({ "message": "upstream" }))) }),
            )
        })
        .await;
        let shell = TestShell::logged_in(&backend, Role::Member);
        let ctx = shell.view();
        let claims: ResourceCell<Vec<Claim>> = ResourceCell::new();
        ctx.unmount();

        let state = ctx.fetch_resource(&claims, "/member/claims").await;

        assert!(state.is_placeholder());
        assert!(shell.notifier.visible().is_empty());
    }
}
