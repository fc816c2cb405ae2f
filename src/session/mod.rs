//! Session state: the single read/write boundary for the auth token and
//! the identity derived from it.
//!
//! Key properties:
//! - Persisted under `authToken`, `userEmail`, `userName`, `userType`
//! - A legacy `jwt` key is migrated to `authToken` on restore
//! - Incomplete records (token without name or role) are cleared on restore
//! - Token bytes are zeroed on drop and never printed

pub mod storage;

use std::sync::RwLock;

use zeroize::Zeroize;

use crate::error::StorageError;
use crate::models::Role;
use storage::KeyValueStore;

pub const KEY_AUTH_TOKEN: &str = "authToken";
pub const KEY_USER_EMAIL: &str = "userEmail";
pub const KEY_USER_NAME: &str = "userName";
pub const KEY_USER_TYPE: &str = "userType";

/// Keys written by older portal builds; removed whenever the session is cleared.
const LEGACY_TOKEN_KEY: &str = "jwt";
const LEGACY_KEYS: [&str; 3] = [LEGACY_TOKEN_KEY, "userRole", "userId"];

const SESSION_KEYS: [&str; 4] = [KEY_AUTH_TOKEN, KEY_USER_EMAIL, KEY_USER_NAME, KEY_USER_TYPE];

// ═══════════════════════════════════════════════════════════
// SessionToken: zeroed on drop
// ═══════════════════════════════════════════════════════════

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

// ═══════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════

/// Proof of authentication plus derived identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub role: Role,
    pub display_name: String,
    pub email: String,
}

impl Session {
    pub fn new(token: &str, role: Role, display_name: &str, email: &str) -> Self {
        Self {
            token: SessionToken::new(token),
            role,
            display_name: display_name.to_string(),
            email: email.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// SessionContext: shared by the shell, the client and every view
// ═══════════════════════════════════════════════════════════

/// Owner of the current session and its persisted copy.
///
/// Readers clone what they need under a short read lock. Writers persist
/// first and only then swap the in-memory value, so a failed write never
/// leaves memory and storage disagreeing about who is logged in.
pub struct SessionContext {
    store: Box<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    /// Context with no active session. Storage is left untouched.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            current: RwLock::new(None),
        }
    }

    /// Context initialised from whatever session the store holds. An
    /// unreadable record counts as no session and is cleared.
    pub fn restore(store: impl KeyValueStore + 'static) -> Result<Self, StorageError> {
        let ctx = Self::new(store);
        let session = match ctx.load_persisted() {
            Ok(session) => session,
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(reason, "Persisted session is unreadable; starting logged out");
                if let Err(e) = ctx.remove_all_keys() {
                    tracing::warn!(error = %e, "Failed to clear unreadable session");
                }
                None
            }
            Err(e) => return Err(e),
        };
        if let Some(session) = &session {
            tracing::info!(role = %session.role, "Restored persisted session");
        }
        *ctx.current.write().map_err(|_| StorageError::LockPoisoned)? = session;
        Ok(ctx)
    }

    // ── Read path ───────────────────────────────────────────

    /// Snapshot of the active session.
    pub fn current(&self) -> Option<Session> {
        self.current.read().ok()?.clone()
    }

    /// Token for the outbound request interceptor.
    pub fn token(&self) -> Option<SessionToken> {
        let guard = self.current.read().ok()?;
        guard
            .as_ref()
            .map(|s| s.token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn role(&self) -> Option<Role> {
        self.current.read().ok()?.as_ref().map(|s| s.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    // ── Write path ──────────────────────────────────────────

    /// Persist and activate a freshly authenticated session.
    pub fn establish(&self, session: Session) -> Result<(), StorageError> {
        if let Err(e) = self.persist(&session) {
            let previous = self.current();
            let rollback = match &previous {
                Some(prev) => self.persist(prev),
                None => self.remove_all_keys(),
            };
            if let Err(rollback_err) = rollback {
                tracing::error!(error = %rollback_err, "Failed to roll back session storage");
            }
            return Err(e);
        }
        let mut current = self.current.write().map_err(|_| StorageError::LockPoisoned)?;
        *current = Some(session);
        Ok(())
    }

    /// Remove the session from memory and storage. Returns whether one was
    /// active. Memory is always cleared, even when storage fails.
    pub fn clear(&self) -> Result<bool, StorageError> {
        let was_active = match self.current.write() {
            Ok(mut current) => current.take().is_some(),
            Err(poisoned) => poisoned.into_inner().take().is_some(),
        };
        self.remove_all_keys()?;
        Ok(was_active)
    }

    // ── Internal ────────────────────────────────────────────

    fn persist(&self, session: &Session) -> Result<(), StorageError> {
        self.store.set(KEY_AUTH_TOKEN, session.token.expose())?;
        self.store.set(KEY_USER_EMAIL, &session.email)?;
        self.store.set(KEY_USER_NAME, &session.display_name)?;
        self.store.set(KEY_USER_TYPE, session.role.as_str())?;
        Ok(())
    }

    fn remove_all_keys(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in SESSION_KEYS.iter().chain(LEGACY_KEYS.iter()) {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove session key");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn load_persisted(&self) -> Result<Option<Session>, StorageError> {
        let mut token = self.store.get(KEY_AUTH_TOKEN)?;
        if token.is_none() {
            if let Some(legacy) = self.store.get(LEGACY_TOKEN_KEY)? {
                tracing::info!("Migrating legacy token key");
                self.store.set(KEY_AUTH_TOKEN, &legacy)?;
                self.store.remove(LEGACY_TOKEN_KEY)?;
                token = Some(legacy);
            }
        }

        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };

        let name = self.store.get(KEY_USER_NAME)?.filter(|n| !n.trim().is_empty());
        let role = self
            .store
            .get(KEY_USER_TYPE)?
            .and_then(|r| r.parse::<Role>().ok());
        let email = self.store.get(KEY_USER_EMAIL)?.unwrap_or_default();

        match (name, role) {
            (Some(name), Some(role)) => Ok(Some(Session::new(&token, role, &name, &email))),
            _ => {
                tracing::warn!("Persisted session is incomplete; clearing it");
                self.remove_all_keys()?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storage::MemoryStore;

    type SharedStore = Arc<MemoryStore>;

    fn member_session() -> Session {
        Session::new("T1", Role::Member, "A", "a@b.com")
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = SessionToken::new("secret-token");
        assert_eq!(format!("{token:?}"), "SessionToken(***)");
        assert_eq!(token.bearer(), "Bearer secret-token");
    }

    #[test]
    fn establish_persists_all_four_keys() {
        let store = SharedStore::default();
        let ctx = SessionContext::new(store.clone());
        ctx.establish(member_session()).unwrap();

        assert_eq!(store.get(KEY_AUTH_TOKEN).unwrap().as_deref(), Some("T1"));
        assert_eq!(store.get(KEY_USER_EMAIL).unwrap().as_deref(), Some("a@b.com"));
        assert_eq!(store.get(KEY_USER_NAME).unwrap().as_deref(), Some("A"));
        assert_eq!(store.get(KEY_USER_TYPE).unwrap().as_deref(), Some("member"));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.role(), Some(Role::Member));
    }

    #[test]
    fn clear_removes_every_key_and_is_idempotent() {
        let store = SharedStore::default();
        store.set(LEGACY_TOKEN_KEY, "old").unwrap();
        let ctx = SessionContext::new(store.clone());
        ctx.establish(member_session()).unwrap();

        assert!(ctx.clear().unwrap());
        assert!(store.is_empty());
        assert!(!ctx.is_authenticated());

        assert!(!ctx.clear().unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn restore_reads_complete_session() {
        let store = MemoryStore::with_entries(&[
            (KEY_AUTH_TOKEN, "T9"),
            (KEY_USER_NAME, "Dr P"),
            (KEY_USER_TYPE, "provider"),
            (KEY_USER_EMAIL, "p@x.com"),
        ]);
        let ctx = SessionContext::restore(store).unwrap();
        let session = ctx.current().unwrap();
        assert_eq!(session.token.expose(), "T9");
        assert_eq!(session.role, Role::Provider);
        assert_eq!(session.display_name, "Dr P");
    }

    #[test]
    fn restore_migrates_legacy_token_key() {
        let store = Arc::new(MemoryStore::with_entries(&[
            (LEGACY_TOKEN_KEY, "LEGACY"),
            (KEY_USER_NAME, "A"),
            (KEY_USER_TYPE, "member"),
        ]));
        let ctx = SessionContext::restore(store.clone()).unwrap();
        assert_eq!(ctx.token().unwrap().expose(), "LEGACY");
        assert_eq!(store.get(KEY_AUTH_TOKEN).unwrap().as_deref(), Some("LEGACY"));
        assert_eq!(store.get(LEGACY_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn restore_clears_incomplete_session() {
        let store = Arc::new(MemoryStore::with_entries(&[
            (KEY_AUTH_TOKEN, "T1"),
            (KEY_USER_TYPE, "member"),
        ]));
        let ctx = SessionContext::restore(store.clone()).unwrap();
        assert!(ctx.current().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn restore_rejects_unknown_role() {
        let store = MemoryStore::with_entries(&[
            (KEY_AUTH_TOKEN, "T1"),
            (KEY_USER_NAME, "A"),
            (KEY_USER_TYPE, "admin"),
        ]);
        let ctx = SessionContext::restore(store).unwrap();
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn restore_with_empty_store_has_no_session() {
        let ctx = SessionContext::restore(MemoryStore::new()).unwrap();
        assert!(ctx.current().is_none());
        assert!(ctx.token().is_none());
    }

    #[test]
    fn restore_from_corrupt_file_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let ctx = SessionContext::restore(storage::FileStore::new(&path)).unwrap();

        assert!(ctx.current().is_none());
        let reopened = storage::FileStore::new(&path);
        assert_eq!(reopened.get(KEY_AUTH_TOKEN).unwrap(), None);
    }

    #[test]
    fn blank_token_is_not_authenticated() {
        let ctx = SessionContext::new(MemoryStore::new());
        ctx.establish(Session::new("  ", Role::Payer, "Pay", "")).unwrap();
        assert!(!ctx.is_authenticated());
    }
}
