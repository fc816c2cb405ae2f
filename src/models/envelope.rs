//! Response envelopes and boundary validation.
//!
//! Resource reads arrive wrapped as `{"data": ...}`. Commands answer with a
//! flat object (`Receipt`). Every decoded payload is validated before the
//! client hands it to a view.

use serde::{Deserialize, Serialize};

/// Canonical wrapper for resource reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Shape checks that serde alone cannot express (non-empty identifiers).
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        for (index, item) in self.iter().enumerate() {
            item.validate().map_err(|e| format!("item {index}: {e}"))?;
        }
        Ok(())
    }
}

impl Validate for serde_json::Value {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Fail if `value` is blank.
pub(crate) fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("`{field}` is empty"))
    } else {
        Ok(())
    }
}

/// Flat command response: an optional message plus whatever ids the
/// backend assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Receipt {
    /// String field assigned by the backend, e.g. `auth_id`.
    pub fn id(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

impl Validate for Receipt {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl Validate for HealthStatus {
    fn validate(&self) -> Result<(), String> {
        require("status", &self.status)
    }
}
