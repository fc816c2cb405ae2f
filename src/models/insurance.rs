use serde::{Deserialize, Serialize};

use super::envelope::{require, Validate};

/// An insurance plan offered by a payer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePlan {
    pub payer_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub coverage_types: Vec<String>,
    #[serde(default)]
    pub deductible_amounts: Vec<f64>,
    #[serde(default)]
    pub copay_amounts: Vec<f64>,
    #[serde(default)]
    pub max_out_of_pocket: f64,
    #[serde(default)]
    pub approval_rate: f64,
    #[serde(default)]
    pub avg_processing_time: Option<String>,
    #[serde(default)]
    pub validity_date: Option<String>,
}

impl Validate for InsurancePlan {
    fn validate(&self) -> Result<(), String> {
        require("payer_id", &self.payer_id)
    }
}

/// A member's subscription to a payer plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceSubscription {
    pub subscription_id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub member_name: Option<String>,
    pub payer_id: String,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub coverage_amount: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub amount_reimbursed: f64,
    #[serde(default)]
    pub remaining_balance: f64,
    #[serde(default)]
    pub validity_date: Option<String>,
    #[serde(default)]
    pub coverage_scheme: Vec<String>,
    #[serde(default)]
    pub deductible: f64,
    #[serde(default)]
    pub copay: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub subscription_date: Option<String>,
    #[serde(default)]
    pub claims_history: Vec<String>,
}

impl InsuranceSubscription {
    pub fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "active")
    }
}

impl Validate for InsuranceSubscription {
    fn validate(&self) -> Result<(), String> {
        require("subscription_id", &self.subscription_id)?;
        require("payer_id", &self.payer_id)
    }
}

/// `POST /member/subscribe-insurance` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub payer_id: String,
}
