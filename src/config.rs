#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

use anyhow::{Context, Result};
use reqwest::Client;
use state::InitCell;
use tokio::runtime::Runtime;

/// Runtime and host-integration configuration shared across the crate.
pub struct ConfigState {
    /// Root URL of the host application, used to build result deep links.
    base_url:         String,
    /// Default per-request timeout for result downloads.
    http_timeout:     Duration,
    /// Display name used as the sender of notification emails.
    support_name:     String,
    /// Email address used as the sender of notification emails.
    support_email:    String,
    /// Lazily constructed reqwest HTTP client shared by network helpers.
    http_client:      InitCell<Client>,
}

impl ConfigState {
    /// Construct a new configuration instance by reading environment
    /// variables, falling back to defaults where unset.
    fn new() -> Result<Self> {
        let base_url = std::env::var("MOSS_UTILS_BASE_URL")
            .map(|value| value.trim_end_matches('/').to_owned())
            .unwrap_or_else(|_| "http://localhost".to_string());

        let support_name = std::env::var("MOSS_UTILS_SUPPORT_NAME")
            .unwrap_or_else(|_| "Plagiarism scanning".to_string());
        let support_email = std::env::var("MOSS_UTILS_SUPPORT_EMAIL")
            .unwrap_or_else(|_| "noreply@localhost".to_string());

        Ok(Self {
            base_url,
            http_timeout: read_timeout_secs("MOSS_UTILS_HTTP_TIMEOUT_SECS", 180),
            support_name,
            support_email,
            http_client: InitCell::new(),
        })
    }

    /// Returns the root URL of the host application, without a trailing
    /// slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default per-request download timeout.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Returns the notification sender's display name.
    pub fn support_name(&self) -> &str {
        &self.support_name
    }

    /// Returns the notification sender's email address.
    pub fn support_email(&self) -> &str {
        &self.support_email
    }

    /// Returns a clone of the shared reqwest HTTP client, building it on
    /// first use.
    pub fn http_client(&self) -> Result<Client> {
        if let Some(client) = self.http_client.try_get() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            // Avoid macOS dynamic store lookups that fail in sandboxed environments.
            .no_proxy()
            .build()
            .context("Failed to construct shared HTTP client")?;
        self.http_client.set(client);
        Ok(self.http_client.get().clone())
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let slot = slot();
    let mut guard = slot.lock().expect("config slot poisoned");
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = ConfigState::new().map(Arc::new)?;
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Returns the active configuration, initializing it on demand.
pub fn get() -> ConfigHandle {
    ensure_initialized().expect("configuration initialization failed")
}

/// Returns the host application's root URL.
pub fn base_url() -> String {
    get().base_url().to_string()
}

/// Returns the default per-request download timeout.
pub fn http_timeout() -> Duration {
    get().http_timeout()
}

/// Returns a clone of the shared reqwest HTTP client.
pub fn http_client() -> Result<Client> {
    get().http_client()
}

/// Global storage for the shared tokio runtime.
static RUNTIME_SLOT: OnceLock<Runtime> = OnceLock::new();

/// Returns the shared multi-threaded tokio runtime used by the download
/// helpers.
pub fn runtime() -> &'static Runtime {
    RUNTIME_SLOT.get_or_init(|| Runtime::new().expect("failed to build tokio runtime"))
}

/// Parses an environment variable into a `Duration`, falling back to
/// `default_secs` when parsing fails or the variable is missing.
fn read_timeout_secs(env: &str, default_secs: u64) -> Duration {
    std::env::var(env)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default_secs))
}
