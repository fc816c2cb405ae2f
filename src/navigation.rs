//! Routes, role gating, and the navigator views observe.
//!
//! The navigator is a `watch` channel: every subscriber sees the latest
//! route, and a session teardown anywhere in the client is visible to the
//! shell as a change to `Route::Login`.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::Role;
use crate::session::Session;

/// Every surface the shell can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Public landing page (`/`).
    Landing,
    /// Login/registration surface.
    Login,
    /// Role portal (`/member`, `/provider`, `/payer`).
    Portal(Role),
    /// Generic profile page with password change (`/profile`).
    Profile,
    /// Role-specific profile page (`/profile/member`, ...).
    RoleProfile(Role),
    /// AI review status board (`/status`).
    AiStatus,
    NotFound,
}

impl Route {
    /// Parse a path, ignoring query string and trailing slash.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Landing,
            "/login" => Route::Login,
            "/member" => Route::Portal(Role::Member),
            "/provider" => Route::Portal(Role::Provider),
            "/payer" => Route::Portal(Role::Payer),
            "/profile" => Route::Profile,
            "/profile/member" => Route::RoleProfile(Role::Member),
            "/profile/provider" => Route::RoleProfile(Role::Provider),
            "/profile/payer" => Route::RoleProfile(Role::Payer),
            "/status" => Route::AiStatus,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Portal(role) => format!("/{role}"),
            Route::Profile => "/profile".to_string(),
            Route::RoleProfile(role) => format!("/profile/{role}"),
            Route::AiStatus => "/status".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Whether the route needs an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Landing | Route::Login | Route::NotFound)
    }

    /// Role required by the route, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Portal(role) | Route::RoleProfile(role) => Some(*role),
            Route::AiStatus => Some(Role::Payer),
            _ => None,
        }
    }
}

/// Route the shell should actually show for `requested`.
///
/// - protected route without a session -> `Login`
/// - route of another role -> the session's own portal
/// - `Landing`/`Login` with a session -> the session's own portal
pub fn resolve(requested: Route, session: Option<&Session>) -> Route {
    match session {
        None if requested.is_protected() => Route::Login,
        None => requested,
        Some(session) => match requested {
            Route::Landing | Route::Login => Route::Portal(session.role),
            other => match other.required_role() {
                Some(role) if role != session.role => Route::Portal(session.role),
                _ => other,
            },
        },
    }
}

// ═══════════════════════════════════════════════════════════
// Navigator
// ═══════════════════════════════════════════════════════════

/// Cloneable handle to the current route.
#[derive(Clone)]
pub struct Navigator {
    tx: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Route {
        *self.tx.borrow()
    }

    /// Switch to `route`. Subscribers are notified even if the route is
    /// unchanged, so a repeated redirect to login is still observable.
    pub fn navigate(&self, route: Route) {
        tracing::debug!(path = %route.path(), "Navigating");
        self.tx.send_replace(route);
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}
