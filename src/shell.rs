//! Application shell: owns the session, client and notifier, resolves
//! routes against the session, and mounts one view at a time.
//!
//! Views never navigate on their own. When the client tears a session down
//! (401) it moves the navigator to login; the shell notices the route
//! changed under it and follows.

use std::sync::Arc;

use crate::auth::AuthService;
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{AuthError, BootError, StorageError};
use crate::models::{HealthStatus, LoginCredentials, RegisterCredentials, Role};
use crate::navigation::{self, Navigator, Route};
use crate::notify::Notifier;
use crate::portal::{
    AiStatusBoard, MemberPortal, PayerPortal, ProfileView, ProviderPortal, ViewContext,
};
use crate::session::storage::KeyValueStore;
use crate::session::{Session, SessionContext};

/// Redirects followed by a single `open` before giving up.
const MAX_REDIRECTS: usize = 3;

/// The view currently mounted.
pub enum ActiveView {
    Landing,
    Login,
    Member(MemberPortal),
    Provider(ProviderPortal),
    Payer(PayerPortal),
    Profile(ProfileView),
    AiStatus(AiStatusBoard),
    NotFound,
}

impl ActiveView {
    fn mount(route: Route, ctx: ViewContext) -> Self {
        match route {
            Route::Landing => Self::Landing,
            Route::Login => Self::Login,
            Route::Portal(Role::Member) => Self::Member(MemberPortal::mount(ctx)),
            Route::Portal(Role::Provider) => Self::Provider(ProviderPortal::mount(ctx)),
            Route::Portal(Role::Payer) => Self::Payer(PayerPortal::mount(ctx)),
            Route::Profile => Self::Profile(ProfileView::mount(ctx, None)),
            Route::RoleProfile(role) => Self::Profile(ProfileView::mount(ctx, Some(role))),
            Route::AiStatus => Self::AiStatus(AiStatusBoard::mount(ctx)),
            Route::NotFound => Self::NotFound,
        }
    }

    fn context(&self) -> Option<&ViewContext> {
        match self {
            Self::Member(v) => Some(v.context()),
            Self::Provider(v) => Some(v.context()),
            Self::Payer(v) => Some(v.context()),
            Self::Profile(v) => Some(v.context()),
            Self::AiStatus(v) => Some(v.context()),
            Self::Landing | Self::Login | Self::NotFound => None,
        }
    }

    async fn load(&mut self) {
        match self {
            Self::Member(v) => v.load().await,
            Self::Provider(v) => v.load().await,
            Self::Payer(v) => v.load().await,
            Self::Profile(v) => v.load().await,
            Self::AiStatus(v) => v.load().await,
            Self::Landing | Self::Login | Self::NotFound => {}
        }
    }

    fn unmount(&self) {
        if let Some(ctx) = self.context() {
            ctx.unmount();
        }
    }
}

pub struct AppShell {
    config: ClientConfig,
    session: Arc<SessionContext>,
    navigator: Navigator,
    notifier: Arc<Notifier>,
    client: ApiClient,
    auth: AuthService,
    route: Route,
    view: ActiveView,
}

impl AppShell {
    /// Restore any persisted session and build the client around it. No
    /// view is mounted until the first `open`.
    pub fn boot(
        config: ClientConfig,
        store: impl KeyValueStore + 'static,
    ) -> Result<Self, BootError> {
        let session = Arc::new(SessionContext::restore(store)?);
        let navigator = Navigator::default();
        let notifier = Arc::new(Notifier::from_config(&config));
        let client = ApiClient::new(&config, session.clone(), navigator.clone())?;
        let auth = AuthService::new(client.clone(), notifier.clone());

        tracing::info!(
            base_url = %config.base_url,
            authenticated = session.is_authenticated(),
            "Shell booted"
        );

        Ok(Self {
            config,
            session,
            navigator,
            notifier,
            client,
            auth,
            route: Route::Landing,
            view: ActiveView::Landing,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ActiveView {
        &mut self.view
    }

    // ── Navigation ──────────────────────────────────────────

    /// Show `requested`, or wherever the session sends it instead. The
    /// previous view is unmounted first so its late results are dropped.
    /// Returns the route actually shown.
    pub async fn open(&mut self, requested: Route) -> Route {
        let mut target = requested;
        for _ in 0..MAX_REDIRECTS {
            let route = navigation::resolve(target, self.session.current().as_ref());
            if route != target {
                tracing::debug!(from = %target.path(), to = %route.path(), "Route redirected");
            }

            self.view.unmount();
            self.navigator.navigate(route);
            self.route = route;
            let ctx = ViewContext::new(self.client.clone(), self.notifier.clone());
            self.view = ActiveView::mount(route, ctx);
            self.view.load().await;

            let now = self.navigator.current();
            if now == route {
                return route;
            }
            target = now;
        }
        tracing::warn!(path = %self.route.path(), "Too many redirects while opening route");
        self.route
    }

    /// Open the path typed into the address bar.
    pub async fn open_path(&mut self, path: &str) -> Route {
        self.open(Route::parse(path)).await
    }

    /// Follow a navigation that happened outside `open`, such as a session
    /// teardown. Returns whether the view changed.
    pub async fn sync_route(&mut self) -> bool {
        let current = self.navigator.current();
        if current == self.route {
            return false;
        }
        self.open(current).await;
        true
    }

    // ── Session lifecycle ───────────────────────────────────

    pub async fn login(&mut self, credentials: &LoginCredentials) -> Result<Session, AuthError> {
        let result = self.auth.login(credentials).await;
        self.sync_route().await;
        result
    }

    pub async fn register(&mut self, credentials: &RegisterCredentials) -> Result<(), AuthError> {
        let result = self.auth.register(credentials).await.map(|_| ());
        self.sync_route().await;
        result
    }

    pub async fn logout(&mut self) -> Result<bool, StorageError> {
        let result = self.auth.logout();
        self.sync_route().await;
        result
    }

    /// Backend liveness, for the landing page status badge.
    pub async fn health(&self) -> Option<HealthStatus> {
        match self.client.health().await {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::warn!(error = %e, "Health check failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::{FileStore, MemoryStore};
    use crate::session::{KEY_AUTH_TOKEN, KEY_USER_EMAIL, KEY_USER_NAME, KEY_USER_TYPE};
    use crate::test_support::MockBackend;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::Json;
    use serde_json::json;

    fn persisted_member() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_entries(&[
            (KEY_AUTH_TOKEN, "T1"),
            (KEY_USER_EMAIL, "m@x.com"),
            (KEY_USER_NAME, "Mia"),
            (KEY_USER_TYPE, "member"),
        ]))
    }

    #[tokio::test]
    async fn protected_route_without_session_opens_login() {
        let backend = MockBackend::start(|router| router).await;
        let mut shell = AppShell::boot(backend.config(), MemoryStore::new()).unwrap();

        assert_eq!(shell.open_path("/provider").await, Route::Login);
        assert!(matches!(shell.view(), ActiveView::Login));
    }

    #[tokio::test]
    async fn restored_session_lands_in_own_portal() {
        let backend = MockBackend::start(|router| {
            router.route(
                "/member/profile",
                get(|| async {
                    Json(json!({ "data": { "email": "m@x.com", "profile": { "name": "Mia", "member_id": "M100" } } }))
                }),
            )
        })
        .await;
        let mut shell = AppShell::boot(backend.config(), persisted_member()).unwrap();

        assert_eq!(shell.open(Route::Landing).await, Route::Portal(Role::Member));
        let ActiveView::Member(portal) = shell.view() else {
            panic!("expected member portal");
        };
        assert_eq!(portal.profile.value().unwrap().member_id(), "M100");
        assert_eq!(shell.open_path("/payer").await, Route::Portal(Role::Member));
    }

    #[tokio::test]
    async fn expired_token_during_load_ends_on_login() {
        let backend = MockBackend::start(|router| {
            router.fallback(|| async {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token has expired" })))
            })
        })
        .await;
        let store = persisted_member();
        let mut shell = AppShell::boot(backend.config(), store.clone()).unwrap();

        assert_eq!(shell.open(Route::Portal(Role::Member)).await, Route::Login);
        assert!(matches!(shell.view(), ActiveView::Login));
        assert!(shell.session().is_none());
        assert!(store.is_empty());
        assert!(shell.notifier().visible().is_empty());
    }

    #[tokio::test]
    async fn login_opens_portal_and_logout_returns_to_login() {
        let backend = MockBackend::start(|router| {
            router
                .route(
                    "/login",
                    post(|| async {
                        Json(json!({ "token": "T9", "user": { "name": "Dr P", "user_type": "provider" } }))
                    }),
                )
                .route(
                    "/provider/profile",
                    get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "message": "Provider not found" }))) }),
                )
        })
        .await;
        let mut shell = AppShell::boot(backend.config(), MemoryStore::new()).unwrap();
        shell.open(Route::Login).await;

        let session = shell
            .login(&LoginCredentials::new("p@x.com", "pw", Role::Provider))
            .await
            .unwrap();

        assert_eq!(session.token.expose(), "T9");
        assert_eq!(shell.route(), Route::Portal(Role::Provider));
        assert!(matches!(shell.view(), ActiveView::Provider(_)));

        assert!(shell.logout().await.unwrap());
        assert_eq!(shell.route(), Route::Login);
        assert!(shell.session().is_none());
    }

    #[tokio::test]
    async fn corrupt_session_file_boots_logged_out() {
        let backend = MockBackend::start(|router| router).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut shell = AppShell::boot(backend.config(), FileStore::new(&path)).unwrap();

        assert!(shell.session().is_none());
        assert_eq!(shell.open(Route::Portal(Role::Member)).await, Route::Login);
        assert_eq!(FileStore::new(&path).get(KEY_AUTH_TOKEN).unwrap(), None);
    }

    #[tokio::test]
    async fn health_reports_backend_status() {
        let backend = MockBackend::start(|router| {
            router.route(
                "/health",
                get(|| async { Json(json!({ "status": "healthy", "message": "Backend is running" })) }),
            )
        })
        .await;
        let shell = AppShell::boot(backend.config(), MemoryStore::new()).unwrap();

        assert!(shell.health().await.unwrap().is_healthy());
    }
}
