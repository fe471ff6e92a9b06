//! Calorie Notify - intake handler for calorie calculator results.
//!
//! A submission carries a precomputed result and the profile fields the user
//! entered. After the authenticity token is checked, the fields are
//! normalized and the submission fans out to three independent channels:
//!
//! ```text
//! POST /send-result → RequestGuard → CanonicalProfile ─┬→ webhook (detached)
//!                                                       ├→ user email
//!                                                       └→ operator email
//!                                                             ↓
//!                                                      DeliveryReport (JSON)
//! ```

pub mod config;
pub mod i18n;
pub mod notify;
pub mod profile;
pub mod settings;
pub mod submission;
pub mod util;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use i18n::Catalog;
pub use notify::{DeliveryReport, Dispatcher, Mailer, SmtpMailer, WebhookForwarder};
pub use profile::CanonicalProfile;
pub use settings::{JsonFileSettings, MemorySettings, SettingsProvider};
pub use submission::{SubmissionForm, SubmissionRequest};
pub use web::{router, AppState, RequestGuard};
