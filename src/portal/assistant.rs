//! AI helpers shared by the portals: description formatting, autocomplete
//! and the health-buddy chat.

use std::sync::Mutex;

use serde::Serialize;

use super::ViewContext;

/// One exchange with the health buddy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

pub struct Assistant {
    ctx: ViewContext,
    transcript: Mutex<Vec<ChatTurn>>,
}

impl Assistant {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Rewrite free text into a clinical description. `None` on failure,
    /// which is reported as a notification.
    pub async fn format_description(&self, raw: &str) -> Option<String> {
        if raw.trim().is_empty() {
            return None;
        }
        match self.ctx.client.format_description(raw).await {
            Ok(formatted) => Some(formatted.formatted),
            Err(e) => {
                if self.ctx.is_mounted() {
                    self.ctx.notifier.api_error("Error", &e);
                }
                None
            }
        }
    }

    /// Completion for partially typed input. Failures are only logged; a
    /// missing suggestion should not interrupt typing.
    pub async fn autocomplete(&self, input: &str) -> Option<String> {
        if input.trim().is_empty() {
            return None;
        }
        match self.ctx.client.autocomplete(input).await {
            Ok(s) if !s.suggestion.trim().is_empty() => Some(s.suggestion),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "Autocomplete failed");
                None
            }
        }
    }

    /// Ask the health buddy. Successful exchanges are kept in the transcript.
    pub async fn ask(&self, question: &str) -> Option<String> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        match self.ctx.client.health_buddy(question).await {
            Ok(reply) => {
                if let Ok(mut transcript) = self.transcript.lock() {
                    transcript.push(ChatTurn {
                        question: question.to_string(),
                        answer: reply.response.clone(),
                    });
                }
                Some(reply.response)
            }
            Err(e) => {
                if self.ctx.is_mounted() {
                    self.ctx.notifier.api_error("Error", &e);
                }
                None
            }
        }
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.transcript
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}
