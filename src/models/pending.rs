use serde::{Deserialize, Serialize};

use super::enums::Urgency;
use super::envelope::{require, Validate};

/// A member request awaiting provider approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub request_id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub member_name: Option<String>,
    #[serde(default)]
    pub member_email: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub provider_email: Option<String>,
    #[serde(default)]
    pub procedure: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub member_notes: Option<String>,
}

impl PendingRequest {
    /// Status with underscores replaced and words capitalized
    /// (`approved_by_provider` -> `Approved By Provider`).
    pub fn display_status(&self) -> String {
        let raw = self.status.as_deref().unwrap_or("pending");
        raw.split('_')
            .filter(|w| !w.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Validate for PendingRequest {
    fn validate(&self) -> Result<(), String> {
        require("request_id", &self.request_id)
    }
}

/// `POST /member/submit-pending-request` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequestSubmission {
    pub procedure: String,
    pub diagnosis: String,
    pub provider_info: String,
    pub urgency: Urgency,
    pub additional_notes: String,
    pub member_notes: String,
}

/// `POST /provider/approve-pending-request` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSubmission {
    pub request_id: String,
    pub provider_notes: String,
}
