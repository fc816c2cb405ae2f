//! Login, registration and logout.
//!
//! Every failure is classified as an `AuthError` and surfaced as a
//! notification; a failed attempt never touches the existing session.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::{AuthError, StorageError};
use crate::models::{LoginCredentials, Receipt, RegisterCredentials};
use crate::navigation::Route;
use crate::notify::Notifier;
use crate::session::Session;

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    notifier: Arc<Notifier>,
}

impl AuthService {
    pub fn new(client: ApiClient, notifier: Arc<Notifier>) -> Self {
        Self { client, notifier }
    }

    /// Authenticate, persist the session and open the role's portal.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, AuthError> {
        let result = self.try_login(credentials).await;
        match &result {
            Ok(session) => {
                tracing::info!(role = %session.role, "Logged in");
                self.notifier.success(
                    "Login Successful",
                    format!("Welcome back, {}!", session.display_name),
                );
                self.client.navigator().navigate(Route::Portal(session.role));
            }
            Err(e) => {
                tracing::info!(error = %e, "Login failed");
                let (title, description) = e.notification_text();
                self.notifier.error(title, description);
            }
        }
        result
    }

    async fn try_login(&self, credentials: &LoginCredentials) -> Result<Session, AuthError> {
        let missing = credentials.missing_fields();
        if !missing.is_empty() {
            return Err(AuthError::MissingFields(missing));
        }

        let response = self.client.login(credentials).await?;
        let email = response
            .user
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| credentials.email.trim());
        let role = response.user.user_type.unwrap_or(credentials.user_type);
        let session = Session::new(&response.token, role, &response.user.name, email);

        self.client.session().establish(session.clone())?;
        Ok(session)
    }

    /// Create an account. The caller logs in separately afterwards.
    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<Receipt, AuthError> {
        let result = self.try_register(credentials).await;
        match &result {
            Ok(_) => {
                tracing::info!(role = %credentials.user_type, "Registered account");
                self.notifier.success(
                    "Registration Successful",
                    "Account created successfully. Please log in.",
                );
                self.client.navigator().navigate(Route::Login);
            }
            Err(e) => {
                tracing::info!(error = %e, "Registration failed");
                let (title, description) = match e {
                    AuthError::Rejected { message, .. } | AuthError::InvalidCredentials(message) => {
                        ("Registration Failed", message.clone())
                    }
                    other => other.notification_text(),
                };
                self.notifier.error(title, description);
            }
        }
        result
    }

    async fn try_register(&self, credentials: &RegisterCredentials) -> Result<Receipt, AuthError> {
        let missing = credentials.missing_fields();
        if !missing.is_empty() {
            return Err(AuthError::MissingFields(missing));
        }
        Ok(self.client.register(credentials).await?)
    }

    /// Register, then log straight in with the same credentials.
    pub async fn register_and_login(
        &self,
        credentials: &RegisterCredentials,
    ) -> Result<Session, AuthError> {
        self.try_register(credentials).await.inspect_err(|e| {
            let (title, description) = e.notification_text();
            self.notifier.error(title, description);
        })?;
        self.login(&credentials.login()).await
    }

    /// End the session. Safe to call when already logged out; the
    /// notification is only shown when a session actually ended.
    pub fn logout(&self) -> Result<bool, StorageError> {
        let result = self.client.session().clear();
        self.client.navigator().navigate(Route::Login);
        match &result {
            Ok(true) => {
                tracing::info!("Logged out");
                self.notifier
                    .success("Logged Out", "You have been successfully logged out.");
            }
            Ok(false) => tracing::debug!("Logout without active session"),
            Err(e) => tracing::error!(error = %e, "Failed to clear persisted session"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::notify::NotificationKind;
    use crate::session::KEY_AUTH_TOKEN;
    use crate::session::storage::KeyValueStore;
    use crate::test_support::{MockBackend, TestShell};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Json;
    use serde_json::{json, Value};

    fn service(shell: &TestShell) -> AuthService {
        AuthService::new(shell.client.clone(), shell.notifier.clone())
    }

    async fn login_backend() -> MockBackend {
        MockBackend::start(|router| {
            router.route(
                "/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "x" {
                        (
                            StatusCode::OK,
                            Json(json!({ "message": "Login successful", "token": "T1", "user": { "name": "A" } })),
                        )
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "message": "Invalid email or password" })),
                        )
                    }
                }),
            )
        })
        .await
    }

    #[tokio::test]
    async fn login_persists_session_and_opens_portal() {
        let backend = login_backend().await;
        let shell = TestShell::anonymous(&backend);

        let session = service(&shell)
            .login(&LoginCredentials::new("a@b.com", "x", Role::Member))
            .await
            .unwrap();

        assert_eq!(session.token.expose(), "T1");
        assert_eq!(session.role, Role::Member);
        assert_eq!(session.display_name, "A");
        assert_eq!(session.email, "a@b.com");
        assert_eq!(shell.store.get(KEY_AUTH_TOKEN).unwrap().as_deref(), Some("T1"));
        assert_eq!(shell.navigator.current(), Route::Portal(Role::Member));
        assert_eq!(shell.notifier.visible()[0].description, "Welcome back, A!");
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let backend = login_backend().await;
        let shell = TestShell::anonymous(&backend);

        let err = service(&shell)
            .login(&LoginCredentials::new("a@b.com", "nope", Role::Member))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials(ref m) if m == "Invalid email or password"));
        assert!(shell.store.is_empty());
        let toast = &shell.notifier.visible()[0];
        assert_eq!(toast.title, "Login Failed");
        assert_eq!(toast.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn failed_login_keeps_existing_session() {
        let backend = login_backend().await;
        let shell = TestShell::logged_in(&backend, Role::Payer);

        let _ = service(&shell)
            .login(&LoginCredentials::new("a@b.com", "nope", Role::Member))
            .await;

        assert_eq!(shell.session.role(), Some(Role::Payer));
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_backend() {
        let shell = TestShell::anonymous(&MockBackend::start(|router| router).await);

        let err = service(&shell)
            .login(&LoginCredentials::new("", "", Role::Provider))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::MissingFields(ref f) if f == &vec!["email", "password"]));
        assert_eq!(shell.notifier.visible()[0].title, "Missing Information");
    }

    #[tokio::test]
    async fn login_response_without_token_fails_closed() {
        let backend = MockBackend::start(|router| {
            router.route(
                "/login",
                post(|| async { Json(json!({ "token": "", "user": { "name": "A" } })) }),
            )
        })
        .await;
        let shell = TestShell::anonymous(&backend);

        let err = service(&shell)
            .login(&LoginCredentials::new("a@b.com", "x", Role::Member))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
        assert!(!shell.session.is_authenticated());
    }

    #[tokio::test]
    async fn register_and_login_creates_session() {
        let backend = MockBackend::start(|router| {
            router
                .route(
                    "/register",
                    post(|Json(body): Json<Value>| async move {
                        assert_eq!(body["name"], "Dr P");
                        (StatusCode::CREATED, Json(json!({ "message": "User registered successfully" })))
                    }),
                )
                .route(
                    "/login",
                    post(|| async {
                        Json(json!({ "token": "T2", "user": { "name": "Dr P", "user_type": "provider" } }))
                    }),
                )
        })
        .await;
        let shell = TestShell::anonymous(&backend);
        let credentials = RegisterCredentials {
            name: "Dr P".into(),
            email: "p@x.com".into(),
            password: "pw".into(),
            user_type: Role::Provider,
        };

        let session = service(&shell).register_and_login(&credentials).await.unwrap();
        assert_eq!(session.role, Role::Provider);
        assert_eq!(shell.navigator.current(), Route::Portal(Role::Provider));
    }

    #[tokio::test]
    async fn duplicate_registration_reports_backend_message() {
        let backend = MockBackend::start(|router| {
            router.route(
                "/register",
                post(|| async {
                    (StatusCode::BAD_REQUEST, Json(json!({ "message": "User already exists" })))
                }),
            )
        })
        .await;
        let shell = TestShell::anonymous(&backend);
        let credentials = RegisterCredentials {
            name: "A".into(),
            email: "a@b.com".into(),
            password: "pw".into(),
            user_type: Role::Member,
        };

        assert!(service(&shell).register(&credentials).await.is_err());
        let toast = &shell.notifier.visible()[0];
        assert_eq!(toast.title, "Registration Failed");
        assert_eq!(toast.description, "User already exists");
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let shell = TestShell::logged_in(&MockBackend::start(|router| router).await, Role::Member);
        let auth = service(&shell);

        assert!(auth.logout().unwrap());
        assert!(shell.store.is_empty());
        assert_eq!(shell.navigator.current(), Route::Login);
        assert_eq!(shell.notifier.visible()[0].title, "Logged Out");

        assert!(!auth.logout().unwrap());
        assert!(shell.store.is_empty());
        assert_eq!(shell.notifier.visible().len(), 1);
    }
}
