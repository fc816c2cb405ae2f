use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "PriorAuth";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when `PRIORAUTH_API_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Connect timeout for the backend. Requests themselves have no timeout.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// How long a toast stays visible before it is auto-dismissed.
const DEFAULT_TOAST_SECS: u64 = 5;

/// Maximum number of toasts visible at once.
const DEFAULT_TOAST_LIMIT: usize = 3;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "priorauth_portal=info,warn"
}

/// Get the application data directory
/// ~/.priorauth/ on all platforms
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".priorauth")
}

/// File backing the persisted session keys.
pub fn session_file() -> PathBuf {
    app_data_dir().join("session.json")
}

/// Runtime configuration for the client and its notification center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub toast_duration: Duration,
    pub toast_limit: usize,
}

impl ClientConfig {
    /// Configuration pointing at an explicit backend.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Read overrides from `PRIORAUTH_API_URL`, `PRIORAUTH_CONNECT_TIMEOUT_SECS`
    /// and `PRIORAUTH_TOAST_SECS`. Unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("PRIORAUTH_API_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Some(secs) = env_secs("PRIORAUTH_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_secs("PRIORAUTH_TOAST_SECS") {
            config.toast_duration = Duration::from_secs(secs);
        }
        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            toast_duration: Duration::from_secs(DEFAULT_TOAST_SECS),
            toast_limit: DEFAULT_TOAST_LIMIT,
        }
    }
}

fn env_secs(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring non-numeric duration override");
            None
        }
    }
}
