use serde::{Deserialize, Serialize};

use super::enums::Urgency;
use super::envelope::{require, Validate};

/// Claim history entry (`/member/claims`, `/claims/provider/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub medication_type: Option<String>,
    #[serde(default)]
    pub amount_reimbursed: f64,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Validate for Claim {
    fn validate(&self) -> Result<(), String> {
        require("claim_id", &self.claim_id)
    }
}

/// `POST /claims` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub member_id: String,
    pub provider_id: String,
    pub procedure: String,
    pub diagnosis: String,
    pub urgency: Urgency,
    #[serde(rename = "additionalNotes")]
    pub additional_notes: String,
    pub subscription_id: String,
}
