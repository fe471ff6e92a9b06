//! Submission fan-out: webhook first, then the user and operator emails.
//!
//! Each channel is attempted unconditionally and reported on its own. Nothing
//! in here returns an error; failures end up as values in [`DeliveryReport`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use super::compose::{MailHeaders, MessageComposer, OutgoingMail};
use super::mailer::Mailer;
use super::webhook::{WebhookForwarder, WebhookRecord, WebhookStatus};
use crate::i18n::Catalog;
use crate::profile::CanonicalProfile;
use crate::settings::{NotificationConfig, SettingsProvider, SiteIdentity};
use crate::submission::SubmissionRequest;

/// Per-channel outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub zapier: WebhookStatus,
    pub user_email_sent: bool,
    pub notification_email_sent: bool,
}

/// Orchestrates normalization, forwarding and mail delivery.
#[derive(Clone)]
pub struct Dispatcher {
    settings: Arc<dyn SettingsProvider>,
    mailer: Arc<dyn Mailer>,
    forwarder: WebhookForwarder,
    catalog: Arc<Catalog>,
}

impl Dispatcher {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        mailer: Arc<dyn Mailer>,
        forwarder: WebhookForwarder,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            settings,
            mailer,
            forwarder,
            catalog,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run every channel for `request` and collect the outcomes.
    pub async fn dispatch(&self, request: &SubmissionRequest) -> DeliveryReport {
        let snapshot = self.settings.snapshot();
        let config = NotificationConfig::from_snapshot(&snapshot);
        let site = SiteIdentity::from_snapshot(&snapshot);

        let profile = CanonicalProfile::from_fields(&request.fields, &self.catalog);

        let record = WebhookRecord::new(&request.user_email, &request.result, &profile);
        let zapier = self.forwarder.forward(&config, &record).to_status(&self.catalog);

        let headers = MailHeaders::from_site(&site);
        let composer = MessageComposer::new(&self.catalog, &headers);

        let user_mail =
            composer.user_confirmation(&request.user_email, &request.result, &profile);
        let user_email_sent = self.deliver("user", &user_mail).await;

        let operator_mail =
            composer.operator_notification(&config.notification_email, &request.user_email);
        let notification_email_sent = self.deliver("operator", &operator_mail).await;

        let report = DeliveryReport {
            zapier,
            user_email_sent,
            notification_email_sent,
        };

        info!(
            user_email = %request.user_email,
            unit_system = profile.unit_system.as_str(),
            zapier = ?report.zapier,
            user_email_sent = report.user_email_sent,
            notification_email_sent = report.notification_email_sent,
            "submission_dispatched"
        );

        report
    }

    async fn deliver(&self, audience: &'static str, mail: &OutgoingMail) -> bool {
        match self.mailer.send(mail).await {
            Ok(()) => {
                info!(audience, to = %mail.to, "email_sent");
                true
            }
            Err(e) => {
                error!(audience, to = %mail.to, error = %e, "email_send_failed");
                false
            }
        }
    }
}
