//! Configuration Module
//!
//! Loads server, OTP, store and mail settings from environment variables
//! once at startup. Components receive the pieces they need explicitly.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::otp::{OtpSettings, DEFAULT_CODE_LENGTH};

/// SMTP submission settings for the notifier.
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// Sender address, defaults to the username
    pub from_address: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl MailConfig {
    /// Reads `SMTP_*` variables. Returns `None` when host, username or
    /// password is missing.
    pub fn from_env() -> Option<Self> {
        let smtp_host = non_empty_var("SMTP_HOST")?;
        let username = non_empty_var("SMTP_USERNAME")?;
        let password = non_empty_var("SMTP_PASSWORD")?;

        Some(Self {
            smtp_port: parsed_var("SMTP_PORT").unwrap_or(587),
            from_address: non_empty_var("SMTP_FROM").unwrap_or_else(|| username.clone()),
            smtp_host,
            username,
            password,
        })
    }
}

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Digits per generated code
    pub otp_length: usize,
    /// Validity window of an issued code, in seconds
    pub otp_ttl: u64,
    /// Base URL of an external cache server; embedded cache when unset
    pub store_url: Option<String>,
    /// Capacity of the embedded cache
    pub store_max_entries: usize,
    /// Embedded cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Mail submission settings, absent when not configured
    pub mail: Option<MailConfig>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `OTP_LENGTH` - Digits per code, must be positive (default: 6)
    /// - `OTP_TTL_SECS` - Code validity in seconds, must be positive (default: 300)
    /// - `STORE_URL` - External cache server base URL (default: embedded cache)
    /// - `STORE_MAX_ENTRIES` - Embedded cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - Embedded cache sweep frequency in seconds (default: 1)
    /// - `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            otp_length: parsed_var("OTP_LENGTH")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.otp_length),
            otp_ttl: parsed_var("OTP_TTL_SECS")
                .filter(|&n: &u64| n > 0)
                .unwrap_or(defaults.otp_ttl),
            store_url: non_empty_var("STORE_URL"),
            store_max_entries: parsed_var("STORE_MAX_ENTRIES")
                .unwrap_or(defaults.store_max_entries),
            cleanup_interval: parsed_var("CLEANUP_INTERVAL")
                .filter(|&n: &u64| n > 0)
                .unwrap_or(defaults.cleanup_interval),
            mail: MailConfig::from_env(),
        }
    }

    /// Issuance settings derived from this configuration.
    pub fn otp_settings(&self) -> OtpSettings {
        OtpSettings {
            code_length: self.otp_length,
            validity: Duration::from_secs(self.otp_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            otp_length: DEFAULT_CODE_LENGTH,
            otp_ttl: 300,
            store_url: None,
            store_max_entries: 10_000,
            cleanup_interval: 1,
            mail: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
