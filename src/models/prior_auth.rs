use serde::{Deserialize, Serialize};

use super::enums::{Decision, Urgency};
use super::envelope::{require, Validate};

/// `POST /prior-auth` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorAuthSubmission {
    pub member_id: String,
    pub procedure: String,
    pub diagnosis: String,
    pub provider: String,
    pub urgency: Urgency,
    #[serde(rename = "additionalNotes")]
    pub additional_notes: String,
}

/// An authorization as listed by `GET /prior-auth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorAuthRecord {
    pub auth_id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub procedure: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ai_decision: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

impl Validate for PriorAuthRecord {
    fn validate(&self) -> Result<(), String> {
        require("auth_id", &self.auth_id)
    }
}

/// Row of the payer review queue (`GET /payer/requests`, `GET /ai-status`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerRequest {
    #[serde(alias = "auth_id")]
    pub id: String,
    #[serde(default)]
    pub member_name: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default, alias = "procedure")]
    pub service: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ai_decision: Option<String>,
    #[serde(default)]
    pub submitted_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl Validate for PayerRequest {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)
    }
}

/// `POST /prior-auth/decision` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSubmission {
    pub auth_id: String,
    pub decision: Decision,
    pub notes: String,
}

/// `POST /ai/auto-review` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoReviewResult {
    pub auth_id: String,
    pub decision: serde_json::Value,
    #[serde(default)]
    pub message: Option<String>,
}

impl AutoReviewResult {
    /// Decision rendered as text, whether the backend sent a string or an object.
    pub fn decision_text(&self) -> String {
        match &self.decision {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(map) => map
                .get("decision")
                .or_else(|| map.get("status"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| self.decision.to_string()),
            other => other.to_string(),
        }
    }
}

impl Validate for AutoReviewResult {
    fn validate(&self) -> Result<(), String> {
        require("auth_id", &self.auth_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payer_request_accepts_auth_id_alias() {
        let row: PayerRequest = serde_json::from_str(
            r#"{"auth_id":"AUTH9","procedure":"MRI","status":"pending","priority":"high"}"#,
        )
        .unwrap();
        assert_eq!(row.id, "AUTH9");
        assert_eq!(row.service.as_deref(), Some("MRI"));
    }

    #[test]
    fn auto_review_decision_text_from_object() {
        let result: AutoReviewResult = serde_json::from_str(
            r#"{"auth_id":"AUTH1","decision":{"decision":"approved","reason":"covered"}}"#,
        )
        .unwrap();
        assert_eq!(result.decision_text(), "approved");
    }

    #[test]
    fn auto_review_decision_text_from_string() {
        let result: AutoReviewResult =
            serde_json::from_str(r#"{"auth_id":"AUTH1","decision":"denied"}"#).unwrap();
        assert_eq!(result.decision_text(), "denied");
    }

    #[test]
    fn record_parses_urgency() {
        let record: PriorAuthRecord =
            serde_json::from_str(r#"{"auth_id":"AUTH2","urgency":"emergency"}"#).unwrap();
        assert_eq!(record.urgency, Some(Urgency::Emergency));
        assert!(record.validate().is_ok());
    }
}
