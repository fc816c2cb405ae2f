//! Typed wrappers for each backend route.
//!
//! Reads return the payload of the `{"data": ...}` envelope. Form commands
//! are not wrapped here: each draft names its own route and goes through
//! `ApiClient::submit`.

use crate::error::ApiError;
use crate::models::{
    AutoReviewResult, AutocompleteSuggestion, Claim, DirectoryEntry, FormattedDescription,
    HealthBuddyReply, HealthStatus, IdentityProfile, InsurancePlan, InsuranceSubscription,
    LoginCredentials, LoginResponse, MemberProfile, PayerDashboard, PayerRequest, PendingRequest,
    PriorAuthRecord, ProviderProfile, Receipt, RegisterCredentials,
};

use super::ApiClient;

impl ApiClient {
    // ═══════════════════════════════════════════════════════════
    // Authentication (anonymous)
    // ═══════════════════════════════════════════════════════════

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        self.post_anonymous("/login", credentials).await
    }

    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<Receipt, ApiError> {
        self.post_anonymous("/register", credentials).await
    }

    /// Liveness probe. Does not require a session.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_anonymous("/health").await
    }

    // ═══════════════════════════════════════════════════════════
    // Profiles
    // ═══════════════════════════════════════════════════════════

    pub async fn identity_profile(&self) -> Result<IdentityProfile, ApiError> {
        self.get_data("/profile").await
    }

    pub async fn member_profile(&self) -> Result<MemberProfile, ApiError> {
        self.get_data("/member/profile").await
    }

    pub async fn provider_profile(&self) -> Result<ProviderProfile, ApiError> {
        self.get_data("/provider/profile").await
    }


    // ═══════════════════════════════════════════════════════════
    // Claims
    // ═══════════════════════════════════════════════════════════

    pub async fn member_claims(&self) -> Result<Vec<Claim>, ApiError> {
        self.get_data("/member/claims").await
    }

    pub async fn provider_claims(&self, provider_id: &str) -> Result<Vec<Claim>, ApiError> {
        self.get_data(&format!("/claims/provider/{}", path_segment(provider_id)?))
            .await
    }

    // ═══════════════════════════════════════════════════════════
    // Prior authorizations
    // ═══════════════════════════════════════════════════════════

    pub async fn prior_auths(&self) -> Result<Vec<PriorAuthRecord>, ApiError> {
        self.get_data("/prior-auth").await
    }

    // ═══════════════════════════════════════════════════════════
    // Member-provider handoff
    // ═══════════════════════════════════════════════════════════

    pub async fn member_pending_requests(&self) -> Result<Vec<PendingRequest>, ApiError> {
        self.get_data("/member/pending-requests").await
    }

    pub async fn provider_pending_requests(&self) -> Result<Vec<PendingRequest>, ApiError> {
        self.get_data("/provider/pending-requests").await
    }

    // ═══════════════════════════════════════════════════════════
    // Insurance plans and subscriptions
    // ═══════════════════════════════════════════════════════════

    /// Every plan offered by any payer.
    pub async fn available_plans(&self) -> Result<Vec<InsurancePlan>, ApiError> {
        self.get_data("/payers/insurance-plans").await
    }

    /// Plans the calling member is enrolled with.
    pub async fn member_plans(&self) -> Result<Vec<InsurancePlan>, ApiError> {
        self.get_data("/member/insurance-plans").await
    }

    /// Active subscriptions of another member (provider claim form).
    pub async fn member_plans_by_id(
        &self,
        member_id: &str,
    ) -> Result<Vec<InsuranceSubscription>, ApiError> {
        self.get_data(&format!(
            "/member/{}/insurance-plans",
            path_segment(member_id)?
        ))
        .await
    }

    pub async fn member_subscriptions(&self) -> Result<Vec<InsuranceSubscription>, ApiError> {
        self.get_data("/member/insurance-subscriptions").await
    }

    // ═══════════════════════════════════════════════════════════
    // Payer review
    // ═══════════════════════════════════════════════════════════

    pub async fn payer_requests(&self) -> Result<Vec<PayerRequest>, ApiError> {
        self.get_data("/payer/requests").await
    }

    pub async fn payer_subscriptions(&self) -> Result<Vec<InsuranceSubscription>, ApiError> {
        self.get_data("/payer/subscriptions").await
    }

    /// Case counts and balances for the calling payer. Not enveloped.
    pub async fn payer_dashboard(&self) -> Result<PayerDashboard, ApiError> {
        self.get_flat("/payer/dashboard", &[]).await
    }

    /// Authorizations with their AI review state.
    pub async fn ai_status(&self) -> Result<Vec<PayerRequest>, ApiError> {
        self.get_data("/ai-status").await
    }

    // ═══════════════════════════════════════════════════════════
    // Directory search
    // ═══════════════════════════════════════════════════════════

    pub async fn search_members(&self, query: &str) -> Result<Vec<DirectoryEntry>, ApiError> {
        self.get_data_with_query("/member/search", &[("q", query)])
            .await
    }

    pub async fn search_providers(&self, query: &str) -> Result<Vec<DirectoryEntry>, ApiError> {
        self.get_data_with_query("/provider/search", &[("q", query)])
            .await
    }

    // ═══════════════════════════════════════════════════════════
    // AI service
    // ═══════════════════════════════════════════════════════════

    pub async fn auto_review(&self, auth_id: &str) -> Result<AutoReviewResult, ApiError> {
        self.post("/ai/auto-review", &serde_json::json!({ "auth_id": auth_id }))
            .await
    }

    pub async fn format_description(&self, text: &str) -> Result<FormattedDescription, ApiError> {
        self.post("/ai/format-description", &serde_json::json!({ "raw_input": text }))
            .await
    }

    pub async fn autocomplete(&self, input: &str) -> Result<AutocompleteSuggestion, ApiError> {
        self.get_flat("/ai/autocomplete", &[("input", input)]).await
    }

    pub async fn health_buddy(&self, message: &str) -> Result<HealthBuddyReply, ApiError> {
        self.post("/ai/health-buddy", &serde_json::json!({ "message": message }))
            .await
    }
}

/// Reject ids that would change the route they are interpolated into.
fn path_segment(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(ApiError::Validation(format!("Invalid identifier: {id:?}")));
    }
    Ok(id)
}
