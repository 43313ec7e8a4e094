//! Runtime configuration loaded from environment variables.
//!
//! DESIGN
//! ======
//! Numeric knobs fall back to their defaults when unset or unparsable, the
//! same way the rest of the server treats tuning variables. Values that
//! would make the invitation flow meaningless (a zero TTL, a base URL that
//! is not http(s)) are rejected at startup instead.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
/// Canonical magic-link lifetime. Every invitation code path reads the TTL
/// from [`Config::invitation_ttl`], never from a literal.
pub const DEFAULT_INVITATION_TTL_HOURS: i64 = 72;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("INVITATION_TTL_HOURS must be positive, got {0}")]
    NonPositiveTtl(i64),
    #[error("INVITATION_SWEEP_INTERVAL_SECS must be positive")]
    ZeroSweepInterval,
    #[error("PUBLIC_BASE_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Resend credentials for invitation emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailerConfig {
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Origin used to build magic links, without trailing slash. The server
    /// answers `/magic/{token}` itself by serving the client build, so the
    /// default points back at this process.
    pub public_base_url: String,
    /// Built client bundle (`trunk build` output), served for every path
    /// the API does not claim.
    pub client_dir: PathBuf,
    pub invitation_ttl: time::Duration,
    pub sweep_interval: Duration,
    /// `None` disables invitation emails.
    pub mailer: Option<MailerConfig>,
}

impl Config {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value is present but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value is present but unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT);
        let ttl_hours = parse_or(&lookup, "INVITATION_TTL_HOURS", DEFAULT_INVITATION_TTL_HOURS);
        if ttl_hours <= 0 {
            return Err(ConfigError::NonPositiveTtl(ttl_hours));
        }
        let sweep_secs = parse_or(&lookup, "INVITATION_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS);
        if sweep_secs == 0 {
            return Err(ConfigError::ZeroSweepInterval);
        }

        let base = lookup("PUBLIC_BASE_URL").unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_owned());
        let base = base.trim().trim_end_matches('/').to_owned();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base));
        }

        let mailer = match (non_empty(&lookup, "RESEND_API_KEY"), non_empty(&lookup, "RESEND_FROM")) {
            (Some(api_key), Some(from)) => Some(MailerConfig { api_key, from }),
            _ => None,
        };

        let client_dir = non_empty(&lookup, "CLIENT_DIST_DIR").map_or_else(default_client_dir, PathBuf::from);

        Ok(Self {
            port,
            public_base_url: base,
            client_dir,
            invitation_ttl: time::Duration::hours(ttl_hours),
            sweep_interval: Duration::from_secs(sweep_secs),
            mailer,
        })
    }

    /// Public URL a recipient opens to log in with `token`.
    #[must_use]
    pub fn magic_link(&self, token: &str) -> String {
        format!("{}/magic/{token}", self.public_base_url)
    }
}

fn default_client_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../client/dist")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
