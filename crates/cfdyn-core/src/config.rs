//! Configuration for a cfdyn run
//!
//! Configuration comes from environment variables only. It is read once at
//! startup into a [`SyncConfig`] and handed to each component by reference;
//! nothing below the binary touches the environment.

use crate::error::{Error, Result};
use std::time::Duration;

/// Cloudflare API v4 base URL
pub const DEFAULT_CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// "What is my IP" service
pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com/json";

/// Pushover message endpoint
pub const DEFAULT_PUSHOVER_URL: &str = "https://api.pushover.net:443/1/messages.json";

/// Default per-request timeout
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Environment variable names
pub mod vars {
    pub const CLOUDFLARE_EMAIL: &str = "CLOUDFLARE_EMAIL";
    pub const CLOUDFLARE_KEY: &str = "CLOUDFLARE_KEY";
    pub const DOMAIN_NAME: &str = "DOMAIN_NAME";
    pub const SUBDOMAIN: &str = "SUBDOMAIN";
    pub const PUSHOVER_APP_TOKEN: &str = "PUSHOVER_APP_TOKEN";
    pub const PUSHOVER_USER_TOKEN: &str = "PUSHOVER_USER_TOKEN";
    pub const LOG_LEVEL: &str = "CFDYN_LOG_LEVEL";
    pub const MODE: &str = "CFDYN_MODE";
    pub const HTTP_TIMEOUT_SECS: &str = "CFDYN_HTTP_TIMEOUT_SECS";
    pub const CLOUDFLARE_API_BASE: &str = "CFDYN_CLOUDFLARE_API_BASE";
    pub const IP_LOOKUP_URL: &str = "CFDYN_IP_LOOKUP_URL";
    pub const PUSHOVER_URL: &str = "CFDYN_PUSHOVER_URL";
}

/// Cloudflare global API key credentials
///
/// The Debug implementation never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudflareCredentials {
    /// Account email, sent as `X-Auth-Email`
    pub email: String,
    /// Global API key, sent as `X-Auth-Key`
    pub api_key: String,
}

impl std::fmt::Debug for CloudflareCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareCredentials")
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

/// Pushover credentials
#[derive(Clone, PartialEq, Eq)]
pub struct PushoverCredentials {
    /// Application token
    pub app_token: String,
    /// User key
    pub user_token: String,
}

impl std::fmt::Debug for PushoverCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverCredentials")
            .field("app_token", &"<REDACTED>")
            .field("user_token", &"<REDACTED>")
            .finish()
    }
}

/// URLs of the three external services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Cloudflare API base, without trailing slash
    pub cloudflare_api_base: String,
    /// Public IP lookup URL
    pub ip_lookup_url: String,
    /// Pushover message URL
    pub pushover_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cloudflare_api_base: DEFAULT_CLOUDFLARE_API_BASE.to_string(),
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
            pushover_url: DEFAULT_PUSHOVER_URL.to_string(),
        }
    }
}

/// Configuration for one run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Zone name, e.g. "example.com"
    pub base_domain: String,

    /// Record label under the zone, e.g. "home"
    pub subdomain: String,

    /// Cloudflare credentials
    pub cloudflare: CloudflareCredentials,

    /// Pushover credentials, present only when both tokens are set
    pub pushover: Option<PushoverCredentials>,

    /// Service URLs
    pub endpoints: Endpoints,

    /// Per-request timeout
    pub http_timeout: Duration,

    /// Resolve and compare, but never send the update
    pub dry_run: bool,

    /// Log level name (trace, debug, info, warn, error)
    pub log_level: String,
}

impl SyncConfig {
    /// Create a configuration with default endpoints and settings
    pub fn new(
        base_domain: impl Into<String>,
        subdomain: impl Into<String>,
        cloudflare: CloudflareCredentials,
    ) -> Self {
        Self {
            base_domain: base_domain.into(),
            subdomain: subdomain.into(),
            cloudflare,
            pushover: None,
            endpoints: Endpoints::default(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            dry_run: false,
            log_level: "info".to_string(),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated the same as unset ones. The result is
    /// validated before it is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                Error::config(format!(
                    "{key} is required. Set it via: export {key}=..."
                ))
            })
        };

        let cloudflare = CloudflareCredentials {
            email: require(vars::CLOUDFLARE_EMAIL)?,
            api_key: require(vars::CLOUDFLARE_KEY)?,
        };
        let base_domain = require(vars::DOMAIN_NAME)?;
        let subdomain = require(vars::SUBDOMAIN)?;

        let pushover = match (
            get(vars::PUSHOVER_APP_TOKEN),
            get(vars::PUSHOVER_USER_TOKEN),
        ) {
            (Some(app_token), Some(user_token)) => Some(PushoverCredentials {
                app_token,
                user_token,
            }),
            (None, None) => None,
            _ => {
                tracing::warn!(
                    "Only one of {} and {} is set, notifications disabled",
                    vars::PUSHOVER_APP_TOKEN,
                    vars::PUSHOVER_USER_TOKEN
                );
                None
            }
        };

        let dry_run = match get(vars::MODE).map(|mode| mode.to_lowercase()).as_deref() {
            None | Some("live") => false,
            Some("dry-run") => true,
            Some(other) => {
                return Err(Error::config(format!(
                    "{} '{}' is not valid. Valid modes: live, dry-run",
                    vars::MODE,
                    other
                )));
            }
        };

        let http_timeout = match get(vars::HTTP_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    Error::config(format!(
                        "{} must be a whole number of seconds. Got: {}",
                        vars::HTTP_TIMEOUT_SECS,
                        raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            cloudflare_api_base: get(vars::CLOUDFLARE_API_BASE)
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.cloudflare_api_base),
            ip_lookup_url: get(vars::IP_LOOKUP_URL).unwrap_or(defaults.ip_lookup_url),
            pushover_url: get(vars::PUSHOVER_URL).unwrap_or(defaults.pushover_url),
        };

        let config = Self {
            base_domain,
            subdomain,
            cloudflare,
            pushover,
            endpoints,
            http_timeout,
            dry_run,
            log_level: get(vars::LOG_LEVEL).unwrap_or_else(|| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fully-qualified record name, `<subdomain>.<base_domain>`
    pub fn record_name(&self) -> String {
        format!("{}.{}", self.subdomain, self.base_domain)
    }

    /// Whether a notifier should be built for this run
    pub fn notifications_enabled(&self) -> bool {
        self.pushover.is_some()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_domain_name(&self.base_domain)?;
        validate_subdomain(&self.subdomain)?;
        check_name_shape(&self.record_name())?;

        if self.cloudflare.email.is_empty() || self.cloudflare.api_key.is_empty() {
            return Err(Error::config("Cloudflare email and API key are required"));
        }

        let timeout_secs = self.http_timeout.as_secs();
        if !(1..=300).contains(&timeout_secs) {
            return Err(Error::config(format!(
                "{} must be between 1 and 300 seconds. Got: {}",
                vars::HTTP_TIMEOUT_SECS,
                timeout_secs
            )));
        }

        for (name, url) in [
            (vars::CLOUDFLARE_API_BASE, &self.endpoints.cloudflare_api_base),
            (vars::IP_LOOKUP_URL, &self.endpoints.ip_lookup_url),
            (vars::PUSHOVER_URL, &self.endpoints.pushover_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(Error::config(format!(
                    "{name} must use HTTP or HTTPS scheme. Got: {url}"
                )));
            }
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(Error::config(format!(
                "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                vars::LOG_LEVEL,
                self.log_level
            ))),
        }
    }
}

/// Check that a string is a plausible DNS name (RFC 1035 label rules)
///
/// Not exhaustive, but catches typos such as empty labels or stray spaces.
pub fn validate_domain_name(domain: &str) -> Result<()> {
    check_name_shape(domain)?;

    for label in domain.split('.') {
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(Error::config(format!(
                "Domain label contains invalid characters. Label: '{label}'"
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{label}'"
            )));
        }
    }

    Ok(())
}

/// Check the record label placed in front of the zone name
///
/// Cloudflare accepts record names that are not strict hostnames, such as
/// the wildcard `*`, so only the shape is checked. A `*` label is allowed in
/// the leftmost position only.
pub fn validate_subdomain(subdomain: &str) -> Result<()> {
    check_name_shape(subdomain)?;

    if subdomain.split('.').skip(1).any(|label| label.contains('*')) {
        return Err(Error::config(format!(
            "Wildcard is only allowed as the leftmost label. Got: {subdomain}"
        )));
    }

    Ok(())
}

/// Length and empty-label checks shared by every name
fn check_name_shape(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::config("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(Error::config(format!(
                "Domain name has empty label: '{domain}'"
            )));
        }

        if label.len() > 63 {
            return Err(Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }
    }

    Ok(())
}
