//! Payer review: incoming authorizations, subscriptions, AI auto-review and
//! manual decisions.

use crate::forms::{DecisionDraft, FormController, SubmissionResult};
use crate::models::{AutoReviewResult, Decision, InsuranceSubscription, PayerRequest};
use crate::resource::ResourceCell;

use super::ViewContext;

fn review_summary(result: &AutoReviewResult) -> String {
    let notes = result
        .decision
        .get("notes")
        .and_then(|v| v.as_str())
        .or(result.message.as_deref())
        .unwrap_or("None");
    format!("AI Decision: {}. Notes: {notes}", result.decision_text())
}

pub struct PayerPortal {
    ctx: ViewContext,
    pub requests: ResourceCell<Vec<PayerRequest>>,
    pub subscriptions: ResourceCell<Vec<InsuranceSubscription>>,
}

impl PayerPortal {
    pub fn mount(ctx: ViewContext) -> Self {
        Self {
            ctx,
            requests: ResourceCell::new(),
            subscriptions: ResourceCell::new(),
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    pub async fn load(&self) {
        let ctx = &self.ctx;
        let _ = tokio::join!(
            ctx.load(&self.requests, "Error", ctx.client.payer_requests()),
            ctx.load(&self.subscriptions, "Error", ctx.client.payer_subscriptions()),
        );
    }

    /// Ask the AI reviewer to decide `auth_id`, then reload the queue.
    pub async fn auto_review(&self, auth_id: &str) -> Option<AutoReviewResult> {
        match self.ctx.client.auto_review(auth_id).await {
            Ok(result) => {
                tracing::info!(auth_id, decision = %result.decision_text(), "Auto-review completed");
                if self.ctx.is_mounted() {
                    self.ctx
                        .notifier
                        .success("AI Auto-Review Completed", review_summary(&result));
                }
                let _ = self
                    .ctx
                    .load(&self.requests, "Error", self.ctx.client.payer_requests())
                    .await;
                Some(result)
            }
            Err(e) => {
                if self.ctx.is_mounted() {
                    self.ctx.notifier.api_error("Auto-Review Error", &e);
                }
                None
            }
        }
    }
}

/// `/ai-status` board where a payer records manual decisions.
pub struct AiStatusBoard {
    ctx: ViewContext,
    pub authorizations: ResourceCell<Vec<PayerRequest>>,
    pub decision_form: FormController<DecisionDraft>,
}

impl AiStatusBoard {
    pub fn mount(ctx: ViewContext) -> Self {
        Self {
            authorizations: ResourceCell::new(),
            decision_form: ctx.form(),
            ctx,
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    pub async fn load(&self) {
        let _ = self
            .ctx
            .load(&self.authorizations, "Error", self.ctx.client.ai_status())
            .await;
    }

    pub async fn decide(
        &mut self,
        auth_id: &str,
        decision: Decision,
        notes: &str,
    ) -> SubmissionResult {
        {
            let draft = self.decision_form.draft_mut();
            draft.auth_id = auth_id.to_string();
            draft.decision = decision;
            draft.notes = notes.to_string();
        }
        let result = self.decision_form.submit().await;
        if result.is_submitted() {
            self.load().await;
        }
        result
    }
}
