//! Member portal: profile, claims, authorizations, insurance and requests
//! routed to a provider.

use crate::forms::{
    FormController, PendingRequestDraft, PriorAuthDraft, SubmissionResult, SubscriptionDraft,
};
use crate::models::{
    Claim, InsurancePlan, InsuranceSubscription, MemberProfile, PendingRequest, PriorAuthRecord,
};
use crate::resource::ResourceCell;

use super::{Assistant, DirectorySearch, SearchTarget, ViewContext};

pub struct MemberPortal {
    ctx: ViewContext,
    pub profile: ResourceCell<MemberProfile>,
    pub claims: ResourceCell<Vec<Claim>>,
    pub prior_auths: ResourceCell<Vec<PriorAuthRecord>>,
    pub plans: ResourceCell<Vec<InsurancePlan>>,
    pub available_plans: ResourceCell<Vec<InsurancePlan>>,
    pub subscriptions: ResourceCell<Vec<InsuranceSubscription>>,
    pub pending_requests: ResourceCell<Vec<PendingRequest>>,
    pub prior_auth_form: FormController<PriorAuthDraft>,
    pub pending_form: FormController<PendingRequestDraft>,
    pub subscription_form: FormController<SubscriptionDraft>,
    pub provider_search: DirectorySearch,
    pub assistant: Assistant,
}

impl MemberPortal {
    pub fn mount(ctx: ViewContext) -> Self {
        Self {
            profile: ResourceCell::new(),
            claims: ResourceCell::new(),
            prior_auths: ResourceCell::new(),
            plans: ResourceCell::new(),
            available_plans: ResourceCell::new(),
            subscriptions: ResourceCell::new(),
            pending_requests: ResourceCell::new(),
            prior_auth_form: ctx.form(),
            pending_form: ctx.form(),
            subscription_form: ctx.form(),
            provider_search: DirectorySearch::new(ctx.clone(), SearchTarget::Providers),
            assistant: Assistant::new(ctx.clone()),
            ctx,
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    /// Load everything the portal shows. The fetches are independent and
    /// settle in any order.
    pub async fn load(&mut self) {
        let ctx = &self.ctx;
        let client = &ctx.client;
        let (profile, _, _, _, _, _) = tokio::join!(
            ctx.load(&self.profile, "Profile Error", client.member_profile()),
            ctx.load(&self.claims, "Error", client.member_claims()),
            ctx.load(&self.prior_auths, "Error", client.prior_auths()),
            ctx.load(&self.plans, "Error", client.member_plans()),
            ctx.load(&self.subscriptions, "Error", client.member_subscriptions()),
            ctx.load(&self.pending_requests, "Error", client.member_pending_requests()),
        );
        if let Ok(profile) = profile {
            self.prior_auth_form.draft_mut().member_id = profile.member_id().to_string();
        }
    }

    /// Plans offered by all payers, fetched when the member opens the
    /// subscription picker.
    pub async fn load_available_plans(&self) {
        let _ = self
            .ctx
            .load(&self.available_plans, "Error", self.ctx.client.available_plans())
            .await;
    }

    pub async fn submit_prior_auth(&mut self) -> SubmissionResult {
        let result = self.prior_auth_form.submit().await;
        if result.is_submitted() {
            let _ = self
                .ctx
                .load(&self.prior_auths, "Error", self.ctx.client.prior_auths())
                .await;
        }
        result
    }

    pub async fn submit_pending_request(&mut self) -> SubmissionResult {
        let result = self.pending_form.submit().await;
        if result.is_submitted() {
            let _ = self
                .ctx
                .load(
                    &self.pending_requests,
                    "Error",
                    self.ctx.client.member_pending_requests(),
                )
                .await;
        }
        result
    }

    pub async fn subscribe(&mut self, payer_id: &str) -> SubmissionResult {
        self.subscription_form.draft_mut().payer_id = payer_id.to_string();
        let result = self.subscription_form.submit().await;
        if result.is_submitted() {
            let _ = self
                .ctx
                .load(&self.subscriptions, "Error", self.ctx.client.member_subscriptions())
                .await;
        }
        result
    }

    /// Replace the prior-auth notes with the AI-formatted version.
    pub async fn format_notes(&mut self) -> bool {
        let raw = self.prior_auth_form.draft().additional_notes.clone();
        match self.assistant.format_description(&raw).await {
            Some(formatted) => {
                self.prior_auth_form.draft_mut().additional_notes = formatted;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::navigation::Route;
    use crate::notify::NotificationKind;
    use crate::resource::ViewResource;
    use crate::test_support::{MockBackend, TestShell};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    fn member_routes(router: Router) -> Router {
        router
            .route(
                "/member/profile",
                get(|| async {
                    Json(json!({ "data": { "email": "m@x.com", "profile": { "name": "Mia", "member_id": "M100" } } }))
                }),
            )
            .route("/member/insurance-plans", get(|| async { Json(json!({ "data": [] })) }))
            .route("/member/insurance-subscriptions", get(|| async { Json(json!({ "data": [] })) }))
            .route("/member/pending-requests", get(|| async { Json(json!({ "data": [] })) }))
    }

    #[tokio::test]
    async fn claims_failure_errors_only_that_resource() {
        let backend = MockBackend::start(|router| {
            member_routes(router)
                .route("/prior-auth", get(|| async { Json(json!({ "data": [] })) }))
                .route(
                    "/member/claims",
                    get(|| async {
                        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "Error fetching claims" })))
                    }),
                )
        })
        .await;
        let shell = TestShell::logged_in(&backend, Role::Member);
        let mut portal = MemberPortal::mount(shell.view());

        portal.load().await;

        assert_eq!(portal.claims.get(), ViewResource::Errored("Error fetching claims".into()));
        assert!(portal.profile.get().loaded().is_some());
        assert_eq!(portal.prior_auth_form.draft().member_id, "M100");
        let toasts = shell.notifier.visible();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, NotificationKind::Error);
        assert_eq!(toasts[0].description, "Error fetching claims");
    }

    #[tokio::test]
    async fn prior_auth_submit_refreshes_list() {
        let backend = MockBackend::start(|router| {
            member_routes(router)
                .route("/member/claims", get(|| async { Json(json!({ "data": [] })) }))
                .route(
                    "/prior-auth",
                    get(|| async { Json(json!({ "data": [{ "auth_id": "AUTH1" }] })) }).post(|| async {
                        (StatusCode::CREATED, Json(json!({ "auth_id": "AUTH1" })))
                    }),
                )
        })
        .await;
        let shell = TestShell::logged_in(&backend, Role::Member);
        let mut portal = MemberPortal::mount(shell.view());
        portal.load().await;

        {
            let draft = portal.prior_auth_form.draft_mut();
            draft.procedure = "MRI".into();
            draft.diagnosis = "Back pain".into();
            draft.provider = "Dr P".into();
        }
        let result = portal.submit_prior_auth().await;

        assert_eq!(result.id(), Some("AUTH1"));
        assert_eq!(portal.prior_auths.value().unwrap()[0].auth_id, "AUTH1");
        assert_eq!(portal.prior_auth_form.draft().procedure, "");
        assert!(shell.notifier.visible()[0].description.contains("AUTH1"));
    }

    #[tokio::test]
    async fn expired_token_tears_down_session() {
        let backend = MockBackend::start(|router| {
            router.fallback(|| async {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token is invalid" })))
            })
        })
        .await;
        let shell = TestShell::logged_in(&backend, Role::Member);
        let mut portal = MemberPortal::mount(shell.view());

        portal.load().await;

        assert!(shell.store.is_empty());
        assert_eq!(shell.navigator.current(), Route::Login);
        assert!(shell.notifier.visible().is_empty());
        assert!(portal.profile.get().error().is_some());
    }

    #[tokio::test]
    async fn subscribe_refreshes_subscriptions() {
        let backend = MockBackend::start(|router| {
            router
                .route(
                    "/member/subscribe-insurance",
                    post(|| async {
                        (StatusCode::CREATED, Json(json!({ "message": "Successfully subscribed", "subscription_id": "SUB1" })))
                    }),
                )
                .route(
                    "/member/insurance-subscriptions",
                    get(|| async {
                        Json(json!({ "data": [{ "subscription_id": "SUB1", "payer_id": "PY1", "status": "active" }] }))
                    }),
                )
        })
        .await;
        let shell = TestShell::logged_in(&backend, Role::Member);
        let mut portal = MemberPortal::mount(shell.view());

        let result = portal.subscribe("PY1").await;

        assert_eq!(result.id(), Some("SUB1"));
        assert!(portal.subscriptions.value().unwrap()[0].is_active());
    }
}
