//! HTTP client for the prior-authorization backend.
//!
//! Every call goes through one request path with two interceptors:
//! - outbound: attach `Authorization: Bearer <token>` when a session exists
//! - inbound: a 401 on an authorized call tears the session down and
//!   redirects to login before the caller sees `ApiError::SessionExpired`
//!
//! Response bodies are decoded into typed schemas here and validated, so
//! views never see a partially trusted value.

pub mod endpoints;

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{Envelope, Receipt, Validate};
use crate::navigation::{Navigator, Route};
use crate::session::SessionContext;

/// Whether a call carries the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Token attached when present; 401 means the session expired.
    Authorized,
    /// Login, registration and health. A 401 here is an ordinary failure.
    Anonymous,
}

/// Shared handle to the backend. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionContext>,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(format!(
                "{}/{}",
                crate::config::APP_NAME,
                crate::config::APP_VERSION
            ))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    // ── Untyped request path ────────────────────────────────

    /// Send an authorized request and return the decoded JSON body.
    /// An empty 2xx body decodes to `Value::Null`.
    pub async fn authorized_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        self.send(method, path, &[], body, Access::Authorized).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        access: Access,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if access == Access::Authorized {
            // Token is cloned out of the session; no lock is held across the await.
            if let Some(token) = self.session.token() {
                request = request.header(AUTHORIZATION, token.bearer());
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(method = %method, path, "Sending request");
        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                tracing::warn!(path, "Backend not reachable");
                ApiError::Network(format!("Cannot connect to backend at {}", self.base_url))
            } else if e.is_timeout() {
                tracing::warn!(path, "Backend request timed out");
                ApiError::Network("Request timed out".to_string())
            } else {
                tracing::warn!(path, error = %e, "Request failed");
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED && access == Access::Authorized {
            self.expire_session(path);
            return Err(ApiError::SessionExpired);
        }

        let text = response.text().await?;
        if !status.is_success() {
            let message = error_message(&text)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            tracing::info!(path, status = status.as_u16(), message = %message, "Backend returned error");
            return Err(ApiError::Application {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(path, error = %e, "Response body is not JSON");
            ApiError::InvalidResponse(e.to_string())
        })
    }

    /// Response interceptor for 401: clear the session and go to login.
    fn expire_session(&self, path: &str) {
        tracing::warn!(path, "Authorization rejected; clearing session");
        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "Failed to clear persisted session");
        }
        self.navigator.navigate(Route::Login);
    }

    // ── Typed helpers ───────────────────────────────────────

    /// `GET` a resource wrapped in the `{"data": ...}` envelope.
    pub async fn get_data<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        self.get_data_with_query(path, &[]).await
    }

    pub async fn get_data_with_query<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let value = self
            .send(Method::GET, path, query, None, Access::Authorized)
            .await?;
        let envelope: Envelope<T> = decode(value)?;
        envelope.data.validate().map_err(ApiError::InvalidResponse)?;
        Ok(envelope.data)
    }

    /// `GET` a flat (unwrapped) JSON object.
    pub async fn get_flat<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let value = self
            .send(Method::GET, path, query, None, Access::Authorized)
            .await?;
        decode_validated(value)
    }

    /// `POST` a JSON body and decode the flat response.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Validate,
    {
        let body = encode(body)?;
        let value = self
            .send(Method::POST, path, &[], Some(&body), Access::Authorized)
            .await?;
        decode_validated(value)
    }

    /// Command submission: `POST` the payload and return the receipt.
    pub async fn submit<B>(&self, path: &str, payload: &B) -> Result<Receipt, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let receipt: Receipt = match self.post::<B, Value>(path, payload).await? {
            Value::Null => Receipt::default(),
            value => decode(value)?,
        };
        tracing::info!(path, "Submission accepted");
        Ok(receipt)
    }

    pub(crate) async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Validate,
    {
        let body = encode(body)?;
        let value = self
            .send(Method::POST, path, &[], Some(&body), Access::Anonymous)
            .await?;
        decode_validated(value)
    }

    pub(crate) async fn get_anonymous<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let value = self
            .send(Method::GET, path, &[], None, Access::Anonymous)
            .await?;
        decode_validated(value)
    }
}

/// `message` field of an error body, if the body is JSON and carries one.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Validation(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

fn decode_validated<T: DeserializeOwned + Validate>(value: Value) -> Result<T, ApiError> {
    let parsed: T = decode(value)?;
    parsed.validate().map_err(ApiError::InvalidResponse)?;
    Ok(parsed)
}
