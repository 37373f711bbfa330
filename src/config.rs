// src/config.rs

//! Application configuration structures.
//!
//! Configuration is assembled once at startup from CLI flags plus the
//! mail credential from the environment, then passed into the watch
//! loop as an immutable value.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable holding the SMTP account password.
pub const CREDENTIAL_ENV_VAR: &str = "EMAIL_PASS";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Sender address for alert mail
    pub sender: String,

    /// Recipient addresses for alert mail (at least one)
    pub recipients: Vec<String>,

    /// SMTP submission settings
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Seconds to wait between watch cycles
    #[serde(default = "defaults::delay_secs")]
    pub delay_secs: u64,

    /// HTTP fetching behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Watched site settings
    #[serde(default)]
    pub site: SiteConfig,
}

impl WatchConfig {
    /// Create a configuration with the required mail addresses and
    /// defaults everywhere else.
    pub fn new(sender: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            sender: sender.into(),
            recipients,
            smtp: SmtpConfig::default(),
            delay_secs: defaults::delay_secs(),
            http: HttpConfig::default(),
            site: SiteConfig::default(),
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.sender.trim().is_empty() {
            return Err(AppError::validation("sender is empty"));
        }
        if self.recipients.is_empty() {
            return Err(AppError::validation("at least one recipient is required"));
        }
        if self.recipients.iter().any(|r| r.trim().is_empty()) {
            return Err(AppError::validation("recipient address is empty"));
        }
        if self.smtp.host.trim().is_empty() {
            return Err(AppError::validation("smtp.host is empty"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.max_concurrent == 0 {
            return Err(AppError::validation("http.max_concurrent must be > 0"));
        }
        url::Url::parse(&self.site.listing_url)
            .map_err(|e| AppError::validation(format!("site.listing_url is invalid: {e}")))?;
        url::Url::parse(&self.site.base_url)
            .map_err(|e| AppError::validation(format!("site.base_url is invalid: {e}")))?;
        Ok(())
    }
}

/// SMTP submission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname
    #[serde(default = "defaults::smtp_host")]
    pub host: String,

    /// SMTP submission port
    #[serde(default = "defaults::smtp_port")]
    pub port: u16,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: defaults::smtp_host(),
            port: defaults::smtp_port(),
        }
    }
}

/// HTTP client and fetching behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent detail-page requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Delay between detail-page requests in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            request_delay_ms: 0,
        }
    }
}

/// Watched site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// URL of the adoption listing page
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Base URL for resolving relative detail-page links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            base_url: defaults::base_url(),
        }
    }
}

/// SMTP account password, sourced from the process environment only.
///
/// Kept out of the CLI surface so the secret never appears in argv.
#[derive(Clone)]
pub struct SmtpCredential(String);

impl SmtpCredential {
    /// Read the credential from the environment.
    ///
    /// A missing or empty value is a startup error; the watch loop is
    /// never entered without mail access.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CREDENTIAL_ENV_VAR) {
            Ok(value) if !value.is_empty() => Ok(Self(value)),
            _ => Err(AppError::config(format!(
                "No SMTP password in ${CREDENTIAL_ENV_VAR}, so email is not possible"
            ))),
        }
    }

    pub fn from_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SmtpCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SmtpCredential(***)")
    }
}

mod defaults {
    // Mail defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }

    // Cycle default: one hour between checks
    pub fn delay_secs() -> u64 {
        3600
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pawwatch/1.0)".into()
    }
    pub fn timeout() -> u64 {
        7
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Site defaults
    pub fn listing_url() -> String {
        "https://www.animalhumanesociety.org/adoption?f%5B0%5D=animal_type%3ADog".into()
    }
    pub fn base_url() -> String {
        "https://www.animalhumanesociety.org".into()
    }
}
