//! Configuration module for environment variable parsing.
//!
//! Process-level settings only. Operator settings that may change while the
//! server runs (notification address, webhook) live behind the
//! [`SettingsProvider`](crate::settings::SettingsProvider) instead.

use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::notify::SmtpTls;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Secret used to sign authenticity tokens. Generated at start-up when unset.
    pub nonce_secret: Option<String>,

    /// Authenticity token lifetime in seconds
    pub nonce_lifetime_secs: u64,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP relay port. Defaults to the conventional port for `smtp_tls`.
    pub smtp_port: u16,

    /// How the SMTP connection is secured
    pub smtp_tls: SmtpTls,

    /// Optional SMTP username
    pub smtp_username: Option<String>,

    /// Optional SMTP password
    pub smtp_password: Option<String>,

    /// Transport timeout for the detached webhook POST, in milliseconds
    pub webhook_timeout_ms: u64,

    /// JSON file holding the operator/site settings, re-read per request
    pub settings_path: PathBuf,

    /// Optional JSON message catalog for localized strings
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let smtp_tls = parse_tls("SMTP_TLS");

        Config {
            port: parse_or("PORT", 8080),

            nonce_secret: non_empty("NONCE_SECRET"),

            nonce_lifetime_secs: parse_or("NONCE_LIFETIME_SECS", 86_400),

            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),

            smtp_port: parse_or("SMTP_PORT", smtp_tls.default_port()),

            smtp_tls,

            smtp_username: non_empty("SMTP_USERNAME"),

            smtp_password: non_empty("SMTP_PASSWORD"),

            webhook_timeout_ms: parse_or("WEBHOOK_TIMEOUT_MS", 5000),

            settings_path: env::var("SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("settings.json")),

            catalog_path: non_empty("CATALOG_PATH").map(PathBuf::from),
        }
    }
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_or<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

/// Parse the SMTP TLS mode, falling back to plaintext when unset or invalid.
fn parse_tls(name: &str) -> SmtpTls {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return SmtpTls::default(),
    };

    raw.parse().unwrap_or_else(|e: String| {
        warn!(env_var = name, value = %raw, error = %e, "Invalid TLS mode, using default");
        SmtpTls::default()
    })
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
