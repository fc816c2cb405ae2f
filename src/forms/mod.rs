//! Draft submission and its notification flow.
//!
//! A `FormController` owns one draft. `submit()` checks required fields
//! locally (nothing is sent when any is blank), posts the payload, emits a
//! success or error notification, and resets the draft only on success.

pub mod drafts;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::Receipt;
use crate::notify::Notifier;

pub use drafts::{
    ApprovalDraft, ClaimDraft, DecisionDraft, PasswordChangeDraft, PendingRequestDraft,
    PriorAuthDraft, SubscriptionDraft,
};

/// Why a draft was not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub title: &'static str,
    pub description: String,
    pub missing: Vec<&'static str>,
}

impl Rejection {
    pub fn missing(fields: Vec<&'static str>, description: &str) -> Self {
        Self {
            title: "Missing Information",
            description: description.to_string(),
            missing: fields,
        }
    }
}

/// A form-local record submitted to one endpoint.
pub trait Draft: Default + Clone + Send + Sync {
    type Payload: Serialize + Send + Sync;

    const ENDPOINT: &'static str;
    /// Receipt field carrying the id the backend assigns, if any.
    const RECEIPT_ID: Option<&'static str>;
    const SUCCESS_TITLE: &'static str;
    const FAILURE_TITLE: &'static str;

    /// Required fields that are blank.
    fn missing_fields(&self) -> Vec<&'static str>;

    fn payload(&self) -> Self::Payload;

    fn success_description(&self, id: Option<&str>) -> String;

    fn missing_description(&self) -> &'static str {
        "Please fill in all required fields."
    }

    fn validate(&self) -> Result<(), Rejection> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Rejection::missing(missing, self.missing_description()))
        }
    }

    /// Return to the empty initial shape after a successful submit.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of one `submit()`.
#[derive(Debug)]
pub enum SubmissionResult {
    /// Accepted; the draft has been reset.
    Submitted { receipt: Receipt, id: Option<String> },
    /// Failed local validation; nothing was sent.
    Rejected(Rejection),
    /// Sent but not accepted; the draft is unchanged.
    Failed(ApiError),
}

impl SubmissionResult {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    /// Backend-assigned id of an accepted submission.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Submitted { id, .. } => id.as_deref(),
            _ => None,
        }
    }
}

/// One draft bound to the client and the notification center.
pub struct FormController<D: Draft> {
    draft: D,
    client: ApiClient,
    notifier: Arc<Notifier>,
}

impl<D: Draft> FormController<D> {
    pub fn new(client: ApiClient, notifier: Arc<Notifier>) -> Self {
        Self::with_draft(D::default(), client, notifier)
    }

    pub fn with_draft(draft: D, client: ApiClient, notifier: Arc<Notifier>) -> Self {
        Self {
            draft,
            client,
            notifier,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    /// Validate, send and settle the draft.
    pub async fn submit(&mut self) -> SubmissionResult {
        if let Err(rejection) = self.draft.validate() {
            tracing::debug!(endpoint = D::ENDPOINT, missing = ?rejection.missing, "Draft rejected");
            self.notifier
                .error(rejection.title, rejection.description.clone());
            return SubmissionResult::Rejected(rejection);
        }

        let payload = self.draft.payload();
        let outcome = match AssertUnwindSafe(self.client.submit(D::ENDPOINT, &payload))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(endpoint = D::ENDPOINT, "Submission panicked");
                Err(ApiError::Interrupted("submission panicked".to_string()))
            }
        };

        let receipt = outcome.and_then(|receipt| match D::RECEIPT_ID {
            Some(key) if receipt.id(key).is_none() => Err(ApiError::InvalidResponse(format!(
                "response is missing `{key}`"
            ))),
            _ => Ok(receipt),
        });

        match receipt {
            Ok(receipt) => {
                let id = D::RECEIPT_ID
                    .and_then(|key| receipt.id(key))
                    .map(str::to_string);
                self.notifier
                    .success(D::SUCCESS_TITLE, self.draft.success_description(id.as_deref()));
                self.draft.reset();
                SubmissionResult::Submitted { receipt, id }
            }
            Err(e) => {
                self.notifier.api_error(D::FAILURE_TITLE, &e);
                SubmissionResult::Failed(e)
            }
        }
    }
}
