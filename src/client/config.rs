//! Client configuration options.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// URL scheme used to reach the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// `https` (the only sensible choice against the public API)
    #[default]
    Https,
    /// `http`, mostly for local mock servers
    Http,
}

impl Protocol {
    /// The scheme as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Https => "https",
            Protocol::Http => "http",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "https" => Ok(Protocol::Https),
            "http" => Ok(Protocol::Http),
            other => Err(Error::Config(format!("unsupported protocol '{other}'"))),
        }
    }
}

/// Request-time settings read by every call.
///
/// # Example
///
/// ```
/// use scryfall_rs::{Protocol, Settings};
///
/// let settings = Settings::default()
///     .with_sleep_time(0.25)
///     .with_header("Accept", "application/json")
///     .with_lazy_loading(false);
/// assert_eq!(settings.protocol, Protocol::Https);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds to wait before each request
    pub sleep_time: f64,
    /// URL scheme
    pub protocol: Protocol,
    /// API host
    pub domain: String,
    /// Bytes per chunk when streaming bulk downloads
    pub chunk_size: usize,
    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Fetch pages on demand instead of all at once
    pub lazy_loading: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sleep_time: 0.1,
            protocol: Protocol::Https,
            domain: "api.scryfall.com".to_string(),
            chunk_size: 8192,
            headers: BTreeMap::new(),
            lazy_loading: true,
        }
    }
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `SCRYFALL_*` environment variables on top of the
    /// defaults.
    ///
    /// Recognised: `SCRYFALL_PROTOCOL`, `SCRYFALL_DOMAIN`,
    /// `SCRYFALL_SLEEP_TIME`, `SCRYFALL_CHUNK_SIZE`, `SCRYFALL_LAZY_LOADING`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(protocol) = lookup("SCRYFALL_PROTOCOL") {
            settings.protocol = protocol.parse()?;
        }
        if let Some(domain) = lookup("SCRYFALL_DOMAIN") {
            settings.domain = domain;
        }
        if let Some(sleep) = lookup("SCRYFALL_SLEEP_TIME") {
            settings.sleep_time = sleep
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("SCRYFALL_SLEEP_TIME is not a number: {sleep}")))?;
        }
        if let Some(chunk) = lookup("SCRYFALL_CHUNK_SIZE") {
            settings.chunk_size = chunk
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("SCRYFALL_CHUNK_SIZE is not an integer: {chunk}")))?;
        }
        if let Some(lazy) = lookup("SCRYFALL_LAZY_LOADING") {
            settings.lazy_loading = match lazy.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(Error::Config(format!(
                        "SCRYFALL_LAZY_LOADING is not a boolean: {other}"
                    )))
                }
            };
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Set the throttle delay in seconds.
    pub fn with_sleep_time(mut self, seconds: f64) -> Self {
        self.sleep_time = seconds;
        self
    }

    /// Set the URL scheme.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the API host (may include a port).
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the bulk download chunk size.
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes;
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Enable or disable lazy page loading.
    pub fn with_lazy_loading(mut self, enabled: bool) -> Self {
        self.lazy_loading = enabled;
        self
    }

    /// Check the value ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.sleep_time.is_finite() || self.sleep_time < 0.0 {
            return Err(Error::Config(format!(
                "sleep_time must be a finite number >= 0, got {}",
                self.sleep_time
            )));
        }
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if self.domain.trim().is_empty() {
            return Err(Error::Config("domain must not be empty".to_string()));
        }
        Ok(())
    }

    /// The throttle delay as a [`Duration`].
    pub fn throttle(&self) -> Duration {
        Duration::from_secs_f64(self.sleep_time.max(0.0))
    }

    /// `{protocol}://{domain}` without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.domain.trim_end_matches('/'))
    }
}

static GLOBAL_SETTINGS: Lazy<SharedSettings> = Lazy::new(SharedSettings::default);

/// Shared, mutable handle to [`Settings`].
///
/// Clones point at the same settings. Each request takes a snapshot, so an
/// update only affects requests issued after it.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    /// Wrap a settings value in a new, independent handle.
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// The process-wide handle used by [`ScryfallClient::new`](crate::ScryfallClient::new).
    pub fn global() -> Self {
        GLOBAL_SETTINGS.clone()
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Edit the settings in place. Invalid edits are rolled back.
    ///
    /// ```
    /// use scryfall_rs::{Settings, SharedSettings};
    ///
    /// let shared = SharedSettings::new(Settings::default());
    /// shared.update(|s| s.sleep_time = 0.5).unwrap();
    /// assert!(shared.update(|s| s.chunk_size = 0).is_err());
    /// assert_eq!(shared.snapshot().chunk_size, 8192);
    /// ```
    pub fn update(&self, edit: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut edited = guard.clone();
        edit(&mut edited);
        edited.validate()?;
        *guard = edited;
        Ok(())
    }

    /// Replace the settings wholesale.
    pub fn replace(&self, settings: Settings) -> Result<()> {
        self.update(|s| *s = settings)
    }
}

/// Configuration for the default reqwest transport.
///
/// `timeout` bounds buffered API calls end to end. Streamed downloads are
/// only bounded by `connect_timeout` and `read_timeout`, so a large bulk
/// file may take as long as it needs while data keeps arriving.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Total timeout for buffered requests; `None` disables it
    pub timeout: Option<Duration>,
    /// Timeout for establishing a connection
    pub connect_timeout: Duration,
    /// Maximum idle time between reads, streamed downloads included
    pub read_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            user_agent: format!("scryfall-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total timeout for buffered requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Remove the total timeout for buffered requests.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
