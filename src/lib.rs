pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod portal;
pub mod resource;
pub mod session;
pub mod shell;

#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, AuthError, BootError, StorageError};
pub use navigation::{Navigator, Route};
pub use notify::{NotificationEvent, NotificationKind, Notifier};
pub use resource::{ResourceCell, ViewResource};
pub use session::{Session, SessionContext};
pub use shell::{ActiveView, AppShell};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Calling it twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Boot the shell against the configured backend with the session stored
/// under the user's data directory.
pub fn run(config: ClientConfig) -> Result<AppShell, BootError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    AppShell::boot(config, session::storage::FileStore::default_location())
}
