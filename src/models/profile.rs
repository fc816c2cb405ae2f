use serde::{Deserialize, Serialize};

use super::enums::Role;
use super::envelope::{require, Validate};

/// `GET /member/profile` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    pub profile: MemberDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDetails {
    pub name: String,
    pub member_id: String,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub coverage_start: Option<String>,
    #[serde(default)]
    pub deductible: f64,
    #[serde(default)]
    pub co_pay: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(default)]
    pub claim_history: Vec<String>,
    #[serde(default)]
    pub amount_reimbursed: f64,
    #[serde(default)]
    pub current_insurance_plan: Option<String>,
    #[serde(default)]
    pub insurance_validity: Option<String>,
}

impl MemberProfile {
    pub fn member_id(&self) -> &str {
        &self.profile.member_id
    }
}

impl Validate for MemberProfile {
    fn validate(&self) -> Result<(), String> {
        require("profile.member_id", &self.profile.member_id)?;
        require("profile.name", &self.profile.name)
    }
}

/// `GET /provider/profile` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    pub profile: ProviderDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDetails {
    pub name: String,
    pub provider_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub network_type: Option<String>,
    #[serde(default)]
    pub expertise: Option<String>,
}

impl ProviderProfile {
    pub fn provider_id(&self) -> &str {
        &self.profile.provider_id
    }
}

impl Validate for ProviderProfile {
    fn validate(&self) -> Result<(), String> {
        require("profile.provider_id", &self.profile.provider_id)?;
        require("profile.name", &self.profile.name)
    }
}

/// `GET /profile` payload: the caller's identity regardless of role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub name: String,
    pub email: String,
    pub user_type: Role,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Validate for IdentityProfile {
    fn validate(&self) -> Result<(), String> {
        require("email", &self.email)
    }
}

/// `GET /payer/dashboard` payload: the payer record itself, unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerDashboard {
    pub payer_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub approved_cases: Vec<serde_json::Value>,
    #[serde(default)]
    pub pending_cases: Vec<serde_json::Value>,
    #[serde(default)]
    pub total_amount_paid: f64,
    #[serde(default, rename = "payer_balance_left")]
    pub balance_left: f64,
}

impl PayerDashboard {
    pub fn total_cases(&self) -> usize {
        self.approved_cases.len() + self.pending_cases.len()
    }

    /// Percentage of decided-or-open cases that were approved; 0 with no cases.
    pub fn approval_rate(&self) -> f64 {
        match self.total_cases() {
            0 => 0.0,
            total => self.approved_cases.len() as f64 / total as f64 * 100.0,
        }
    }
}

impl Validate for PayerDashboard {
    fn validate(&self) -> Result<(), String> {
        require("payer_id", &self.payer_id)
    }
}

/// Typeahead hit from `/member/search` or `/provider/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(default, alias = "member_id", alias = "provider_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Validate for DirectoryEntry {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)
    }
}
