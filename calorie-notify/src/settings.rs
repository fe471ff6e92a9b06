//! Operator and site settings.
//!
//! Settings are read through a [`SettingsProvider`] on every submission, so
//! edits take effect on the next request without any invalidation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

/// Option key for the operator notification address.
pub const NOTIFICATION_EMAIL_KEY: &str = "wpcc-notification-email";
/// Option key for the webhook URL.
pub const WEBHOOK_URL_KEY: &str = "wpcc_zapier_webhook";
/// Option key for the webhook enabled flag.
pub const WEBHOOK_ENABLED_KEY: &str = "wpcc_enable_zapier";
/// Option key for the site display name.
pub const SITE_NAME_KEY: &str = "blogname";
/// Option key for the site administrative address.
pub const ADMIN_EMAIL_KEY: &str = "admin_email";
/// Option key for the site home URL.
pub const HOME_URL_KEY: &str = "home";

/// The only value of [`WEBHOOK_ENABLED_KEY`] that enables the webhook.
pub const WEBHOOK_ENABLED_SENTINEL: &str = "true";

/// Point-in-time copy of the key-value settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsSnapshot {
    values: HashMap<String, String>,
}

impl SettingsSnapshot {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Value for `key`, or an empty string when absent.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SettingsSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Source of settings, consulted fresh on every call.
pub trait SettingsProvider: Send + Sync {
    fn snapshot(&self) -> SettingsSnapshot;
}

/// Settings stored as a flat JSON object of strings on disk.
///
/// The file is re-read on every snapshot. A missing or malformed file yields
/// an empty snapshot, which disables the webhook and leaves addresses blank.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsProvider for JsonFileSettings {
    fn snapshot(&self) -> SettingsSnapshot {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "settings_read_failed");
                return SettingsSnapshot::default();
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&raw) {
            Ok(values) => SettingsSnapshot::new(values),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "settings_parse_failed");
                SettingsSnapshot::default()
            }
        }
    }
}

/// In-process settings that can be swapped at runtime.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.into(), value.into());
    }
}

impl SettingsProvider for MemorySettings {
    fn snapshot(&self) -> SettingsSnapshot {
        let values = self
            .values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        SettingsSnapshot::new(values.clone())
    }
}

/// Operator-configured notification settings.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationConfig {
    /// Operator address; already falls back to the site admin address.
    pub notification_email: String,
    pub webhook_url: String,
    /// Raw flag value; compared against [`WEBHOOK_ENABLED_SENTINEL`].
    pub webhook_enabled: String,
}

impl NotificationConfig {
    pub fn from_snapshot(snapshot: &SettingsSnapshot) -> Self {
        let configured = snapshot.get(NOTIFICATION_EMAIL_KEY);
        let notification_email = if configured.is_empty() {
            snapshot.get(ADMIN_EMAIL_KEY)
        } else {
            configured
        };

        Self {
            notification_email: notification_email.to_string(),
            webhook_url: snapshot.get(WEBHOOK_URL_KEY).to_string(),
            webhook_enabled: snapshot.get(WEBHOOK_ENABLED_KEY).to_string(),
        }
    }

    pub fn webhook_enabled(&self) -> bool {
        self.webhook_enabled == WEBHOOK_ENABLED_SENTINEL
    }
}

/// Platform-level identity of the site sending mail.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteIdentity {
    pub name: String,
    pub admin_email: String,
    pub home_url: String,
}

impl SiteIdentity {
    pub fn from_snapshot(snapshot: &SettingsSnapshot) -> Self {
        Self {
            name: snapshot.get(SITE_NAME_KEY).to_string(),
            admin_email: snapshot.get(ADMIN_EMAIL_KEY).to_string(),
            home_url: snapshot.get(HOME_URL_KEY).to_string(),
        }
    }
}
