//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TrendSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Trends page and HTTP behavior
    #[serde(default)]
    pub source: SourceConfig,

    /// Markup anchors for extraction
    #[serde(default)]
    pub selectors: TrendSelectors,

    /// Document rendering
    #[serde(default)]
    pub render: RenderConfig,

    /// Mail relay
    #[serde(default)]
    pub email: EmailConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(AppError::validation("source.url is empty"));
        }
        url::Url::parse(&self.source.url)?;
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        self.source.timezone()?;
        if self.selectors.container_selector.trim().is_empty() {
            return Err(AppError::validation("selectors.container_selector is empty"));
        }
        if self.email.relay.trim().is_empty() {
            return Err(AppError::validation("email.relay is empty"));
        }
        if self.email.port == 0 {
            return Err(AppError::validation("email.port must be > 0"));
        }
        self.store.validate()
    }
}

/// Trends page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Page listing the trends
    #[serde(default = "defaults::url")]
    pub url: String,

    /// User-Agent header; the source rejects default client identifiers
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// IANA zone the publish time is shown in
    #[serde(default = "defaults::timezone")]
    pub display_timezone: String,
}

impl SourceConfig {
    /// Parse the configured display timezone.
    pub fn timezone(&self) -> Result<Tz> {
        self.display_timezone.parse::<Tz>().map_err(|e| {
            AppError::validation(format!(
                "source.display_timezone '{}' is invalid: {e}",
                self.display_timezone
            ))
        })
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            display_timezone: defaults::timezone(),
        }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Stylesheet inlined into the document
    #[serde(default = "defaults::style_path")]
    pub style_path: PathBuf,

    /// Most-active section keeps this many records, highest metric first
    #[serde(default = "defaults::most_active_limit")]
    pub most_active_limit: usize,

    /// Search page used for trends without a link (`?q={name}` is appended)
    #[serde(default = "defaults::search_url")]
    pub search_url: String,

    /// Linked from the section header
    #[serde(default = "defaults::explore_url")]
    pub explore_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style_path: defaults::style_path(),
            most_active_limit: defaults::most_active_limit(),
            search_url: defaults::search_url(),
            explore_url: defaults::explore_url(),
        }
    }
}

/// Mail relay settings. Credentials come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "defaults::relay")]
    pub relay: String,

    /// Submission port (STARTTLS)
    #[serde(default = "defaults::port")]
    pub port: u16,

    #[serde(default = "defaults::subject_prefix")]
    pub subject_prefix: String,
}

impl EmailConfig {
    /// Subject line for a given short timestamp.
    pub fn subject(&self, short_timestamp: &str) -> String {
        format!("{} - {}", self.subject_prefix, short_timestamp)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            relay: defaults::relay(),
            port: defaults::port(),
            subject_prefix: defaults::subject_prefix(),
        }
    }
}

/// Snapshot store backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Local,
    S3,
}

/// Snapshot store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Root directory for the local backend
    #[serde(default = "defaults::root_dir")]
    pub root_dir: PathBuf,

    /// Bucket for the S3 backend
    #[serde(default)]
    pub bucket: Option<String>,

    /// Key prefix for the S3 backend
    #[serde(default = "defaults::prefix")]
    pub prefix: String,

    /// Credential file for the S3 backend
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Check that the selected backend has what it needs.
    pub fn validate(&self) -> Result<()> {
        match self.backend {
            StoreBackend::Local => {
                if self.root_dir.as_os_str().is_empty() {
                    return Err(AppError::config("store.root_dir is empty"));
                }
            }
            StoreBackend::S3 => {
                if self.bucket.as_deref().is_none_or(|b| b.trim().is_empty()) {
                    return Err(AppError::config("store.bucket is required for the s3 backend"));
                }
                if self.credentials_path.is_none() {
                    return Err(AppError::config(
                        "store.credentials_path is required for the s3 backend",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            root_dir: defaults::root_dir(),
            bucket: None,
            prefix: defaults::prefix(),
            credentials_path: None,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Source defaults
    pub fn url() -> String {
        "https://getdaytrends.com/united-states/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn timezone() -> String {
        "America/New_York".into()
    }

    // Render defaults
    pub fn style_path() -> PathBuf {
        PathBuf::from("styles/email.css")
    }
    pub fn most_active_limit() -> usize {
        10
    }
    pub fn search_url() -> String {
        "https://x.com/search".into()
    }
    pub fn explore_url() -> String {
        "https://x.com/explore/tabs/trending".into()
    }

    // Email defaults
    pub fn relay() -> String {
        "smtp.gmail.com".into()
    }
    pub fn port() -> u16 {
        587
    }
    pub fn subject_prefix() -> String {
        "US Trends Summary".into()
    }

    // Store defaults
    pub fn root_dir() -> PathBuf {
        PathBuf::from("storage")
    }
    pub fn prefix() -> String {
        "trend-tracker".into()
    }
}
