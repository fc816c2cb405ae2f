//! Test fixtures: an in-process backend and a wired-up client.

use std::sync::Arc;

use axum::Router;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::models::Role;
use crate::navigation::Navigator;
use crate::notify::Notifier;
use crate::portal::ViewContext;
use crate::session::storage::MemoryStore;
use crate::session::{Session, SessionContext};

/// Axum router served on an ephemeral localhost port.
pub struct MockBackend {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn start(build: impl FnOnce(Router) -> Router) -> Self {
        let app = build(Router::new());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Client, session and notifier sharing one inspectable store.
pub struct TestShell {
    pub store: Arc<MemoryStore>,
    pub session: Arc<SessionContext>,
    pub navigator: Navigator,
    pub notifier: Arc<Notifier>,
    pub client: ApiClient,
}

impl TestShell {
    pub fn anonymous(backend: &MockBackend) -> Self {
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(SessionContext::new(store.clone()));
        let navigator = Navigator::default();
        let config = backend.config();
        let client = ApiClient::new(&config, session.clone(), navigator.clone()).unwrap();
        Self {
            store,
            session,
            navigator,
            notifier: Arc::new(Notifier::from_config(&config)),
            client,
        }
    }

    /// Session `T1` for `role`, persisted in the shared store.
    pub fn logged_in(backend: &MockBackend, role: Role) -> Self {
        let shell = Self::anonymous(backend);
        shell
            .session
            .establish(Session::new("T1", role, "Test User", "user@example.com"))
            .unwrap();
        shell
    }

    pub fn view(&self) -> ViewContext {
        ViewContext::new(self.client.clone(), self.notifier.clone())
    }
}
