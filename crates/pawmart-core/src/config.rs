// ── Client configuration ──

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use pawmart_api::TlsMode;

use crate::store::SliceKey;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to build a [`Marketplace`](crate::Marketplace).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin; every endpoint path is appended to it.
    pub api_url: Url,
    pub timeout: Duration,
    pub tls: TlsMode,
    /// Slices persisted alongside the auth session.
    pub persist: Vec<SliceKey>,
    /// Directory holding the persisted snapshot. `None` keeps state in
    /// memory only.
    pub state_path: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            tls: TlsMode::System,
            persist: Vec::new(),
            state_path: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    pub fn persisting(mut self, slices: impl IntoIterator<Item = SliceKey>) -> Self {
        self.persist = slices.into_iter().collect();
        self
    }
}
