//! Profile pages: the caller's identity, the role-specific record where one
//! exists, the role's activity summary, and the password change form.

use crate::forms::{FormController, PasswordChangeDraft, SubmissionResult};
use crate::models::{
    Claim, IdentityProfile, InsurancePlan, MemberProfile, PayerDashboard, PayerRequest,
    ProviderProfile, Role,
};
use crate::resource::{ResourceCell, ViewResource};

use super::ViewContext;

pub struct ProfileView {
    ctx: ViewContext,
    /// Role whose detailed record is shown; `None` on the generic page.
    role: Option<Role>,
    pub identity: ResourceCell<IdentityProfile>,
    pub member: ResourceCell<MemberProfile>,
    pub provider: ResourceCell<ProviderProfile>,
    pub dashboard: ResourceCell<PayerDashboard>,
    /// Member plans on the member page.
    pub plans: ResourceCell<Vec<InsurancePlan>>,
    /// Member claims, or the provider's claims once the provider id is known.
    pub claims: ResourceCell<Vec<Claim>>,
    /// Authorizations routed to the payer.
    pub requests: ResourceCell<Vec<PayerRequest>>,
    pub password_form: FormController<PasswordChangeDraft>,
}

impl ProfileView {
    pub fn mount(ctx: ViewContext, role: Option<Role>) -> Self {
        Self {
            role,
            identity: ResourceCell::new(),
            member: ResourceCell::new(),
            provider: ResourceCell::new(),
            dashboard: ResourceCell::new(),
            plans: ResourceCell::new(),
            claims: ResourceCell::new(),
            requests: ResourceCell::new(),
            password_form: ctx.form(),
            ctx,
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub async fn load(&self) {
        let ctx = &self.ctx;
        let identity = ctx.load(&self.identity, "Profile Error", ctx.client.identity_profile());
        match self.role {
            Some(Role::Member) => {
                let _ = tokio::join!(
                    identity,
                    ctx.load(&self.member, "Profile Error", ctx.client.member_profile()),
                    ctx.load(&self.plans, "Error", ctx.client.member_plans()),
                    ctx.load(&self.claims, "Error", ctx.client.member_claims()),
                );
            }
            Some(Role::Provider) => {
                let _ = tokio::join!(identity, self.load_provider());
            }
            Some(Role::Payer) => {
                let _ = tokio::join!(
                    identity,
                    ctx.load(&self.dashboard, "Profile Error", ctx.client.payer_dashboard()),
                    ctx.load(&self.requests, "Error", ctx.client.payer_requests()),
                );
            }
            None => {
                let _ = identity.await;
            }
        }
    }

    pub async fn change_password(&mut self) -> SubmissionResult {
        self.password_form.submit().await
    }

    // Claims are keyed by provider id, so they wait for the profile.
    async fn load_provider(&self) {
        let ctx = &self.ctx;
        match ctx
            .load(&self.provider, "Profile Error", ctx.client.provider_profile())
            .await
        {
            Ok(profile) => {
                let _ = ctx
                    .load(&self.claims, "Error", ctx.client.provider_claims(profile.provider_id()))
                    .await;
            }
            Err(_) if ctx.is_mounted() => {
                self.claims
                    .set(ViewResource::Errored("Provider profile is unavailable.".to_string()));
            }
            Err(_) => {}
        }
    }
}
