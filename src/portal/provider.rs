//! Provider portal. Claims history needs the provider id, so it loads after
//! the profile; when the profile is unavailable the header falls back to
//! the session identity.

use crate::forms::{ApprovalDraft, ClaimDraft, FormController, SubmissionResult};
use crate::models::{Claim, InsuranceSubscription, PendingRequest, ProviderProfile};
use crate::resource::{ResourceCell, ViewResource};

use super::{Assistant, DirectorySearch, SearchTarget, ViewContext};

const PROFILE_UNAVAILABLE: &str = "Provider profile is unavailable.";

pub struct ProviderPortal {
    ctx: ViewContext,
    pub profile: ResourceCell<ProviderProfile>,
    pub claims: ResourceCell<Vec<Claim>>,
    pub pending_requests: ResourceCell<Vec<PendingRequest>>,
    /// Active subscriptions of the member selected in the claim form.
    pub member_plans: ResourceCell<Vec<InsuranceSubscription>>,
    pub claim_form: FormController<ClaimDraft>,
    pub approval_form: FormController<ApprovalDraft>,
    pub member_search: DirectorySearch,
    pub assistant: Assistant,
}

/// Name and email for the portal header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl ProviderPortal {
    pub fn mount(ctx: ViewContext) -> Self {
        Self {
            profile: ResourceCell::new(),
            claims: ResourceCell::new(),
            pending_requests: ResourceCell::new(),
            member_plans: ResourceCell::new(),
            claim_form: ctx.form(),
            approval_form: ctx.form(),
            member_search: DirectorySearch::new(ctx.clone(), SearchTarget::Members),
            assistant: Assistant::new(ctx.clone()),
            ctx,
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    pub async fn load(&mut self) {
        let profile = self
            .ctx
            .load(&self.profile, "Profile Error", self.ctx.client.provider_profile())
            .await;

        match profile {
            Ok(profile) => {
                let provider_id = profile.provider_id().to_string();
                self.claim_form.draft_mut().provider_id = provider_id.clone();
                let ctx = &self.ctx;
                let _ = tokio::join!(
                    ctx.load(&self.claims, "Error", ctx.client.provider_claims(&provider_id)),
                    ctx.load(&self.pending_requests, "Error", ctx.client.provider_pending_requests()),
                );
            }
            Err(_) if self.ctx.is_mounted() => {
                self.claims
                    .set(ViewResource::Errored(PROFILE_UNAVAILABLE.to_string()));
                self.pending_requests
                    .set(ViewResource::Errored(PROFILE_UNAVAILABLE.to_string()));
            }
            Err(_) => {}
        }
    }

    /// Header identity: the loaded profile, else the session.
    pub fn identity(&self) -> Option<Identity> {
        if let Some(profile) = self.profile.value() {
            return Some(Identity {
                name: profile.profile.name,
                email: profile.email,
            });
        }
        self.ctx.client.session().current().map(|s| Identity {
            name: s.display_name,
            email: s.email,
        })
    }

    /// Pick the member a claim is for and load their plans.
    pub async fn select_member(&mut self, member_id: &str) {
        {
            let draft = self.claim_form.draft_mut();
            draft.member_id = member_id.to_string();
            draft.subscription_id.clear();
        }
        if member_id.trim().is_empty() {
            self.member_plans.set(ViewResource::Unloaded);
            return;
        }
        let _ = self
            .ctx
            .load(
                &self.member_plans,
                "Error",
                self.ctx.client.member_plans_by_id(member_id),
            )
            .await;
    }

    pub async fn submit_claim(&mut self) -> SubmissionResult {
        let result = self.claim_form.submit().await;
        if result.is_submitted() {
            self.member_plans.set(ViewResource::Unloaded);
            self.refresh_claims().await;
        }
        result
    }

    pub async fn approve(&mut self, request_id: &str, notes: &str) -> SubmissionResult {
        {
            let draft = self.approval_form.draft_mut();
            draft.request_id = request_id.to_string();
            draft.provider_notes = notes.to_string();
        }
        let result = self.approval_form.submit().await;
        if result.is_submitted() {
            let _ = self
                .ctx
                .load(
                    &self.pending_requests,
                    "Error",
                    self.ctx.client.provider_pending_requests(),
                )
                .await;
        }
        result
    }

    async fn refresh_claims(&self) {
        let provider_id = self.claim_form.draft().provider_id.clone();
        if provider_id.is_empty() {
            return;
        }
        let _ = self
            .ctx
            .load(&self.claims, "Error", self.ctx.client.provider_claims(&provider_id))
            .await;
    }
}
