//! Concrete drafts for every form in the portals.

use crate::models::{
    ApprovalSubmission, ClaimSubmission, Decision, DecisionSubmission, PasswordChange,
    PendingRequestSubmission, PriorAuthSubmission, SubscribeRequest, Urgency,
};

use super::{Draft, Rejection};

/// Push `name` onto `missing` when `value` is blank.
fn check(missing: &mut Vec<&'static str>, name: &'static str, value: &str) {
    if value.trim().is_empty() {
        missing.push(name);
    }
}

fn with_id(prefix: &str, label: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{prefix} {label}: {id}"),
        None => prefix.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════
// Member: prior authorization
// ═══════════════════════════════════════════════════════════

/// Member prior-authorization request. `member_id` comes from the loaded
/// profile and survives a reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorAuthDraft {
    pub member_id: String,
    pub procedure: String,
    pub diagnosis: String,
    pub provider: String,
    pub urgency: Urgency,
    pub additional_notes: String,
}

impl Draft for PriorAuthDraft {
    type Payload = PriorAuthSubmission;

    const ENDPOINT: &'static str = "/prior-auth";
    const RECEIPT_ID: Option<&'static str> = Some("auth_id");
    const SUCCESS_TITLE: &'static str = "Authorization Submitted";
    const FAILURE_TITLE: &'static str = "Submission Error";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        check(&mut missing, "member_id", &self.member_id);
        check(&mut missing, "procedure", &self.procedure);
        check(&mut missing, "diagnosis", &self.diagnosis);
        check(&mut missing, "provider", &self.provider);
        missing
    }

    fn payload(&self) -> PriorAuthSubmission {
        PriorAuthSubmission {
            member_id: self.member_id.trim().to_string(),
            procedure: self.procedure.trim().to_string(),
            diagnosis: self.diagnosis.trim().to_string(),
            provider: self.provider.trim().to_string(),
            urgency: self.urgency,
            additional_notes: self.additional_notes.clone(),
        }
    }

    fn success_description(&self, id: Option<&str>) -> String {
        with_id("Request submitted successfully.", "Auth ID", id)
    }

    fn reset(&mut self) {
        *self = Self {
            member_id: std::mem::take(&mut self.member_id),
            ..Self::default()
        };
    }
}

// ═══════════════════════════════════════════════════════════
// Member: request routed to a provider
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRequestDraft {
    pub procedure: String,
    pub diagnosis: String,
    pub provider_info: String,
    pub urgency: Urgency,
    pub additional_notes: String,
    pub member_notes: String,
}

impl Draft for PendingRequestDraft {
    type Payload = PendingRequestSubmission;

    const ENDPOINT: &'static str = "/member/submit-pending-request";
    const RECEIPT_ID: Option<&'static str> = Some("request_id");
    const SUCCESS_TITLE: &'static str = "Request Submitted";
    const FAILURE_TITLE: &'static str = "Submission Error";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        check(&mut missing, "procedure", &self.procedure);
        check(&mut missing, "diagnosis", &self.diagnosis);
        check(&mut missing, "provider_info", &self.provider_info);
        missing
    }

    fn payload(&self) -> PendingRequestSubmission {
        PendingRequestSubmission {
            procedure: self.procedure.trim().to_string(),
            diagnosis: self.diagnosis.trim().to_string(),
            provider_info: self.provider_info.trim().to_string(),
            urgency: self.urgency,
            additional_notes: self.additional_notes.clone(),
            member_notes: self.member_notes.clone(),
        }
    }

    fn success_description(&self, id: Option<&str>) -> String {
        with_id("Request sent to your provider for review.", "Request ID", id)
    }
}

// ═══════════════════════════════════════════════════════════
// Member: insurance subscription
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionDraft {
    pub payer_id: String,
}

impl Draft for SubscriptionDraft {
    type Payload = SubscribeRequest;

    const ENDPOINT: &'static str = "/member/subscribe-insurance";
    const RECEIPT_ID: Option<&'static str> = Some("subscription_id");
    const SUCCESS_TITLE: &'static str = "Subscription Successful";
    const FAILURE_TITLE: &'static str = "Subscription Error";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        check(&mut missing, "payer_id", &self.payer_id);
        missing
    }

    fn missing_description(&self) -> &'static str {
        "Please select an insurance plan."
    }

    fn payload(&self) -> SubscribeRequest {
        SubscribeRequest {
            payer_id: self.payer_id.trim().to_string(),
        }
    }

    fn success_description(&self, id: Option<&str>) -> String {
        with_id("Subscribed to the selected plan.", "Subscription ID", id)
    }
}

// ═══════════════════════════════════════════════════════════
// Provider: claim
// ═══════════════════════════════════════════════════════════

/// Provider claim. `provider_id` comes from the loaded provider profile and
/// survives a reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimDraft {
    pub member_id: String,
    pub provider_id: String,
    pub procedure: String,
    pub diagnosis: String,
    pub urgency: Urgency,
    pub additional_notes: String,
    pub subscription_id: String,
}

impl Draft for ClaimDraft {
    type Payload = ClaimSubmission;

    const ENDPOINT: &'static str = "/claims";
    const RECEIPT_ID: Option<&'static str> = Some("claim_id");
    const SUCCESS_TITLE: &'static str = "Claim Submitted";
    const FAILURE_TITLE: &'static str = "Submission Error";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        check(&mut missing, "member_id", &self.member_id);
        check(&mut missing, "provider_id", &self.provider_id);
        check(&mut missing, "procedure", &self.procedure);
        check(&mut missing, "diagnosis", &self.diagnosis);
        check(&mut missing, "subscription_id", &self.subscription_id);
        missing
    }

    fn missing_description(&self) -> &'static str {
        "Please fill in all required fields including Member ID and Insurance Plan."
    }

    fn payload(&self) -> ClaimSubmission {
        ClaimSubmission {
            member_id: self.member_id.trim().to_string(),
            provider_id: self.provider_id.trim().to_string(),
            procedure: self.procedure.trim().to_string(),
            diagnosis: self.diagnosis.trim().to_string(),
            urgency: self.urgency,
            additional_notes: self.additional_notes.clone(),
            subscription_id: self.subscription_id.trim().to_string(),
        }
    }

    fn success_description(&self, id: Option<&str>) -> String {
        with_id("Claim submitted successfully.", "Claim ID", id)
    }

    fn reset(&mut self) {
        *self = Self {
            provider_id: std::mem::take(&mut self.provider_id),
            ..Self::default()
        };
    }
}

// ═══════════════════════════════════════════════════════════
// Provider: approve a member's pending request
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalDraft {
    pub request_id: String,
    pub provider_notes: String,
}

impl Draft for ApprovalDraft {
    type Payload = ApprovalSubmission;

    const ENDPOINT: &'static str = "/provider/approve-pending-request";
    const RECEIPT_ID: Option<&'static str> = Some("auth_id");
    const SUCCESS_TITLE: &'static str = "Request Approved";
    const FAILURE_TITLE: &'static str = "Approval Error";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        check(&mut missing, "request_id", &self.request_id);
        check(&mut missing, "provider_notes", &self.provider_notes);
        missing
    }

    fn missing_description(&self) -> &'static str {
        "Please add provider notes before approving."
    }

    fn payload(&self) -> ApprovalSubmission {
        ApprovalSubmission {
            request_id: self.request_id.trim().to_string(),
            provider_notes: self.provider_notes.trim().to_string(),
        }
    }

    fn success_description(&self, id: Option<&str>) -> String {
        with_id(
            "Request approved and submitted to insurance.",
            "Auth ID",
            id,
        )
    }
}

// ═══════════════════════════════════════════════════════════
// Payer: decision on an authorization
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionDraft {
    pub auth_id: String,
    pub decision: Decision,
    pub notes: String,
}

impl Default for DecisionDraft {
    fn default() -> Self {
        Self {
            auth_id: String::new(),
            decision: Decision::Approved,
            notes: String::new(),
        }
    }
}

impl Draft for DecisionDraft {
    type Payload = DecisionSubmission;

    const ENDPOINT: &'static str = "/prior-auth/decision";
    const RECEIPT_ID: Option<&'static str> = None;
    const SUCCESS_TITLE: &'static str = "Success";
    const FAILURE_TITLE: &'static str = "Error";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        check(&mut missing, "auth_id", &self.auth_id);
        missing
    }

    fn payload(&self) -> DecisionSubmission {
        DecisionSubmission {
            auth_id: self.auth_id.trim().to_string(),
            decision: self.decision,
            notes: self.notes.clone(),
        }
    }

    fn success_description(&self, _id: Option<&str>) -> String {
        format!("Request {} successfully.", self.decision)
    }
}

// ═══════════════════════════════════════════════════════════
// Profile: password change
// ═══════════════════════════════════════════════════════════

/// Password fields are cleared on success and never logged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordChangeDraft {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub notes: String,
}

impl std::fmt::Debug for PasswordChangeDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChangeDraft")
            .field("notes", &self.notes)
            .finish_non_exhaustive()
    }
}

impl Draft for PasswordChangeDraft {
    type Payload = PasswordChange;

    const ENDPOINT: &'static str = "/profile/update-password";
    const RECEIPT_ID: Option<&'static str> = None;
    const SUCCESS_TITLE: &'static str = "Success";
    const FAILURE_TITLE: &'static str = "Error";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.current_password.is_empty() {
            missing.push("current_password");
        }
        if self.new_password.is_empty() {
            missing.push("new_password");
        }
        missing
    }

    fn missing_description(&self) -> &'static str {
        "Please enter your current and new password."
    }

    /// Missing fields first, then a confirmation mismatch when one was typed.
    fn validate(&self) -> Result<(), Rejection> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(Rejection::missing(missing, self.missing_description()));
        }
        if !self.confirm_password.is_empty() && self.confirm_password != self.new_password {
            return Err(Rejection {
                title: "Password Mismatch",
                description: "New password and confirmation do not match.".to_string(),
                missing: Vec::new(),
            });
        }
        Ok(())
    }

    fn payload(&self) -> PasswordChange {
        PasswordChange {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
            notes: self.notes.clone(),
        }
    }

    fn success_description(&self, _id: Option<&str>) -> String {
        "Password updated successfully.".to_string()
    }
}

/// Serialize any draft's payload. Used by renderers that preview a request.
pub fn preview<D: Draft>(draft: &D) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(draft.payload())
}
