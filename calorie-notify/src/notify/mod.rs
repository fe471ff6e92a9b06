//! Notification fan-out.
//!
//! ## Flow
//!
//! ```text
//! SubmissionRequest → CanonicalProfile ─┬→ WebhookForwarder (detached POST)
//!                                       └→ MessageComposer → Mailer (user, operator)
//!                                                  ↓
//!                                           DeliveryReport
//! ```

pub mod compose;
pub mod dispatcher;
pub mod mailer;
pub mod webhook;

pub use compose::{MailHeaders, MessageComposer, OutgoingMail};
pub use dispatcher::{DeliveryReport, Dispatcher};
pub use mailer::{build_message, MailError, Mailer, SmtpMailer, SmtpTls};
pub use webhook::{WebhookForwarder, WebhookOutcome, WebhookRecord, WebhookStatus};
