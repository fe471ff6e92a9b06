//! Message composition for the two outbound emails.
//!
//! Both messages are plain text. Interpolated values are inserted verbatim;
//! escaping is left to the mail transport.

use tracing::debug;
use url::Url;

use crate::i18n::Catalog;
use crate::profile::CanonicalProfile;
use crate::settings::SiteIdentity;
use crate::util::sanitize_text;

/// Sender headers shared by every message of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailHeaders {
    pub from_name: String,
    pub from_address: String,
    pub reply_to: String,
}

impl MailHeaders {
    /// Derive the headers from the site identity.
    ///
    /// The sender address is `notification@<host>` with any leading `www.`
    /// removed from the home URL host. When the home URL has no host the
    /// address is left as the bare `notification@` prefix.
    pub fn from_site(site: &SiteIdentity) -> Self {
        let mut from_address = String::from("notification@");
        match bare_domain(&site.home_url) {
            Some(domain) => from_address.push_str(&domain),
            None => debug!(home_url = %site.home_url, "mail_headers_no_site_host"),
        }

        Self {
            from_name: sanitize_text(&site.name),
            from_address,
            reply_to: site.admin_email.clone(),
        }
    }

    /// `From` header value, display name quoted.
    pub fn from_header(&self) -> String {
        format!("\"{}\" <{}>", self.from_name, self.from_address)
    }
}

fn bare_domain(home_url: &str) -> Option<String> {
    let url = Url::parse(home_url).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// A fully composed plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub headers: MailHeaders,
}

/// Builds the localized user and operator messages.
pub struct MessageComposer<'a> {
    catalog: &'a Catalog,
    headers: &'a MailHeaders,
}

impl<'a> MessageComposer<'a> {
    pub fn new(catalog: &'a Catalog, headers: &'a MailHeaders) -> Self {
        Self { catalog, headers }
    }

    /// Confirmation sent to the person who submitted the form.
    pub fn user_confirmation(
        &self,
        to: &str,
        result: &str,
        profile: &CanonicalProfile,
    ) -> OutgoingMail {
        let c = self.catalog;
        let lines = [
            c.tr("Hi!").to_string(),
            c.tr("It’s Calorie Calculator.").to_string(),
            c.tr("Looks like you requested your target daily calorie intake.").to_string(),
            format!("{}\n", c.fmt("It is %s", result)),
            format!("{}\n", c.tr("Your parameters:")),
            c.fmt("Sex: %s", &profile.gender),
            c.fmt("Age: %s", &profile.age),
            c.fmt("Height: %s", &profile.height),
            c.fmt("Weight: %s", &profile.weight),
            c.fmt("Activity level: %s", &profile.activity),
            format!("{}\n", c.fmt("Goal: %s", &profile.goal)),
            format!("{}\n", c.tr("You go!")),
            c.tr("Best regards,").to_string(),
            c.tr("Calorie Calculator.").to_string(),
        ];

        OutgoingMail {
            to: to.to_string(),
            subject: c.tr("Your optimal calories").to_string(),
            body: lines.join("\n"),
            headers: self.headers.clone(),
        }
    }

    /// Notice sent to the site operator about a new submitter.
    pub fn operator_notification(&self, to: &str, submitter_email: &str) -> OutgoingMail {
        let c = self.catalog;
        let lines = [
            c.tr("Hey, someone just shared their email address with you.").to_string(),
            format!("{}\n", c.fmt("Here it is: %s", submitter_email)),
            format!(
                "{}\n",
                c.tr("Make it the beginning of your brand’s active conversation.")
            ),
            c.tr("Best regards,").to_string(),
            c.tr("Calorie Calculator.").to_string(),
        ];

        OutgoingMail {
            to: to.to_string(),
            subject: c.tr("New Calorie Calculator user").to_string(),
            body: lines.join("\n"),
            headers: self.headers.clone(),
        }
    }
}
