//! Transient user notifications (toasts).
//!
//! Events are emitted, kept in a small visible queue, and auto-dismissed
//! after the configured duration. Nothing is persisted. Renderers either
//! poll `visible()` or subscribe to a channel of emitted events.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// One toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub emitted_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, description)
    }

    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, description)
    }

    fn new(kind: NotificationKind, title: &str, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            description: description.into(),
            emitted_at: Utc::now(),
        }
    }
}

struct Visible {
    event: NotificationEvent,
    expires_at: Instant,
}

struct State {
    visible: Vec<Visible>,
    subscribers: Vec<mpsc::UnboundedSender<NotificationEvent>>,
}

/// Fan-out point for every notification in the shell.
pub struct Notifier {
    ttl: Duration,
    limit: usize,
    state: Mutex<State>,
}

impl Notifier {
    pub fn new(ttl: Duration, limit: usize) -> Self {
        Self {
            ttl,
            limit: limit.max(1),
            state: Mutex::new(State {
                visible: Vec::new(),
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.toast_duration, config.toast_limit)
    }

    /// Publish an event. The oldest toast is evicted when the queue is full.
    pub fn emit(&self, event: NotificationEvent) -> NotificationEvent {
        match event.kind {
            NotificationKind::Success => {
                tracing::debug!(title = %event.title, "Notification")
            }
            NotificationKind::Error => {
                tracing::info!(title = %event.title, description = %event.description, "Error notification")
            }
        }

        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        state.visible.retain(|v| v.expires_at > now);
        while state.visible.len() >= self.limit {
            state.visible.remove(0);
        }
        state.visible.push(Visible {
            event: event.clone(),
            expires_at: now + self.ttl,
        });
        state
            .subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
        event
    }

    pub fn success(&self, title: &str, description: impl Into<String>) -> NotificationEvent {
        self.emit(NotificationEvent::success(title, description))
    }

    pub fn error(&self, title: &str, description: impl Into<String>) -> NotificationEvent {
        self.emit(NotificationEvent::error(title, description))
    }

    /// Error toast for a failed call. Connection failures use a fixed
    /// title. Session expiry emits nothing; the redirect to login is the
    /// user-facing signal.
    pub fn api_error(&self, title: &str, err: &ApiError) -> Option<NotificationEvent> {
        if !err.is_notifiable() {
            return None;
        }
        let title = match err.class() {
            ErrorClass::Network => "Connection Error",
            _ => title,
        };
        Some(self.error(title, err.user_message()))
    }

    /// Toasts still on screen, oldest first.
    pub fn visible(&self) -> Vec<NotificationEvent> {
        let Ok(mut state) = self.state.lock() else {
            return Vec::new();
        };
        let now = Instant::now();
        state.visible.retain(|v| v.expires_at > now);
        state.visible.iter().map(|v| v.event.clone()).collect()
    }

    /// Dismiss one toast early. Returns false if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        let before = state.visible.len();
        state.visible.retain(|v| v.event.id != id);
        state.visible.len() != before
    }

    /// Receive every event emitted after this call.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<NotificationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        match self.state.lock() {
            Ok(mut state) => state.subscribers.push(tx),
            Err(poisoned) => poisoned.into_inner().subscribers.push(tx),
        }
        rx
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}
