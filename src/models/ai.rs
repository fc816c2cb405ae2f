use serde::{Deserialize, Serialize};

use super::envelope::Validate;

/// `POST /ai/format-description` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedDescription {
    pub formatted: String,
}

/// `GET /ai/autocomplete` success body. An empty suggestion is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteSuggestion {
    #[serde(default)]
    pub suggestion: String,
}

/// `POST /ai/health-buddy` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBuddyReply {
    pub response: String,
}

impl Validate for FormattedDescription {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Validate for AutocompleteSuggestion {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Validate for HealthBuddyReply {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
