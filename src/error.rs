//! Error types for the session store, the API client and authentication.
//!
//! Every variant maps to one of four classes a view can react to:
//! validation (nothing was sent), network (no response), application
//! (the backend answered with an error or an unexpected shape) and
//! authentication (401, handled by session teardown).

/// Errors from the persistent key-value store behind the session.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage file is corrupt: {0}")]
    Corrupt(String),
    #[error("Internal lock error")]
    LockPoisoned,
}

/// Coarse error class used for notification and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Network,
    Application,
    Authentication,
}

/// Errors from calls against the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required input missing; no request was sent.
    #[error("{0}")]
    Validation(String),
    /// The request never produced a response.
    #[error("Connection error: {0}")]
    Network(String),
    /// Non-2xx response. `message` is the backend's `message` field when present.
    #[error("Request failed ({status}): {message}")]
    Application { status: u16, message: String },
    /// A 2xx response whose body does not match the expected schema.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    /// 401 on an authorized call. The session has already been torn down.
    #[error("Session expired")]
    SessionExpired,
    /// The call panicked or was abandoned before it settled.
    #[error("Request did not complete: {0}")]
    Interrupted(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::Network(_) => ErrorClass::Network,
            Self::Application { .. }
            | Self::InvalidResponse(_)
            | Self::Interrupted(_)
            | Self::Storage(_) => ErrorClass::Application,
            Self::SessionExpired => ErrorClass::Authentication,
        }
    }

    /// Text shown to the user in an error notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Network(_) => "Unable to connect to the server.".to_string(),
            Self::Application { message, .. } => message.clone(),
            Self::InvalidResponse(_) => {
                "Received an unexpected response from the server.".to_string()
            }
            Self::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            Self::Interrupted(_) => "The request did not complete. Please try again.".to_string(),
            Self::Storage(_) => "Unable to access local session storage.".to_string(),
        }
    }

    /// Whether the failure should be surfaced as an inline notification.
    /// Session expiry is reported through navigation instead.
    pub fn is_notifiable(&self) -> bool {
        !matches!(self, Self::SessionExpired)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Errors from login and registration.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("Connection error: {0}")]
    Network(String),
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Title and description for the error notification.
    pub fn notification_text(&self) -> (&'static str, String) {
        match self {
            Self::MissingFields(_) => (
                "Missing Information",
                "Please fill in all required fields including user type.".to_string(),
            ),
            Self::InvalidCredentials(message) => ("Login Failed", message.clone()),
            Self::Network(_) => (
                "Connection Error",
                "Unable to connect to authentication server.".to_string(),
            ),
            Self::Rejected { message, .. } => ("Request Failed", message.clone()),
            Self::InvalidResponse(_) => (
                "Login Failed",
                "Received an unexpected response from the server.".to_string(),
            ),
            Self::Storage(_) => (
                "Session Error",
                "Unable to save your session on this device.".to_string(),
            ),
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(message) => AuthError::Rejected {
                status: 0,
                message,
            },
            ApiError::Network(message) => AuthError::Network(message),
            ApiError::Application { status: 401, message } => {
                AuthError::InvalidCredentials(message)
            }
            ApiError::Application { status, message } => AuthError::Rejected { status, message },
            ApiError::InvalidResponse(message) | ApiError::Interrupted(message) => {
                AuthError::InvalidResponse(message)
            }
            ApiError::SessionExpired => {
                AuthError::InvalidCredentials("Invalid email or password".to_string())
            }
            ApiError::Storage(e) => AuthError::Storage(e),
        }
    }
}

/// Errors while bringing the shell up.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("Failed to restore session: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_message_is_verbatim() {
        let err = ApiError::Application {
            status: 400,
            message: "Procedure and diagnosis are required".into(),
        };
        assert_eq!(err.user_message(), "Procedure and diagnosis are required");
        assert_eq!(err.class(), ErrorClass::Application);
    }

    #[test]
    fn network_message_is_generic() {
        let err = ApiError::Network("tcp connect error".into());
        assert_eq!(err.user_message(), "Unable to connect to the server.");
        assert_eq!(err.class(), ErrorClass::Network);
    }

    #[test]
    fn session_expiry_is_not_notifiable() {
        assert!(!ApiError::SessionExpired.is_notifiable());
        assert_eq!(ApiError::SessionExpired.class(), ErrorClass::Authentication);
        assert!(ApiError::Network("x".into()).is_notifiable());
    }

    #[test]
    fn schema_mismatch_is_application_class() {
        let err = ApiError::InvalidResponse("missing field `data`".into());
        assert_eq!(err.class(), ErrorClass::Application);
        assert!(!err.user_message().contains("data"));
    }

    #[test]
    fn unauthorized_login_maps_to_invalid_credentials() {
        let err: AuthError = ApiError::Application {
            status: 401,
            message: "Invalid email or password".into(),
        }
        .into();
        match err {
            AuthError::InvalidCredentials(message) => {
                assert_eq!(message, "Invalid email or password")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_fields_lists_names() {
        let err = AuthError::MissingFields(vec!["email", "password"]);
        assert_eq!(err.to_string(), "Missing required fields: email, password");
        assert_eq!(err.notification_text().0, "Missing Information");
    }

    #[test]
    fn network_auth_error_notification() {
        let (title, description) = AuthError::Network("refused".into()).notification_text();
        assert_eq!(title, "Connection Error");
        assert!(description.contains("authentication server"));
    }
}
