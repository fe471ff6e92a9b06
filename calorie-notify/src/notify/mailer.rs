//! Mail transport.
//!
//! [`Mailer`] is the seam between the dispatcher and whatever actually delivers
//! mail. [`SmtpMailer`] delivers through an SMTP relay with lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::AsyncSmtpTransportBuilder;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use super::compose::OutgoingMail;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid {field} address {value:?}: {source}")]
    Address {
        field: &'static str,
        value: String,
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Sends a composed message. Success means the transport accepted it.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpTls {
    /// Implicit TLS from the first byte (SMTPS).
    Wrapper,
    /// Plaintext greeting upgraded with STARTTLS.
    StartTls,
    /// No encryption, for a local MTA.
    #[default]
    None,
}

impl SmtpTls {
    /// Conventional port for this mode.
    pub fn default_port(self) -> u16 {
        match self {
            SmtpTls::Wrapper => 465,
            SmtpTls::StartTls => 587,
            SmtpTls::None => 25,
        }
    }

    fn transport_builder(
        self,
        smtp_host: &str,
    ) -> Result<AsyncSmtpTransportBuilder, MailError> {
        Ok(match self {
            SmtpTls::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)?,
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)?
            }
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host),
        })
    }
}

impl std::str::FromStr for SmtpTls {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wrapper" | "tls" | "smtps" => Ok(SmtpTls::Wrapper),
            "starttls" => Ok(SmtpTls::StartTls),
            "none" | "plain" | "" => Ok(SmtpTls::None),
            other => Err(format!("unknown SMTP TLS mode {other:?}")),
        }
    }
}

/// SMTP relay delivery.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(
        smtp_host: &str,
        smtp_port: u16,
        tls: SmtpTls,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, MailError> {
        let mut builder = tls.transport_builder(smtp_host)?.port(smtp_port);

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// Convert an [`OutgoingMail`] into a lettre message.
pub fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let from = Mailbox::new(
        Some(mail.headers.from_name.clone()).filter(|name| !name.is_empty()),
        parse_address("from", &mail.headers.from_address)?,
    );

    let mut builder = Message::builder()
        .from(from)
        .to(Mailbox::new(None, parse_address("to", &mail.to)?))
        .subject(&mail.subject)
        .header(ContentType::TEXT_PLAIN);

    if !mail.headers.reply_to.is_empty() {
        builder = builder.reply_to(Mailbox::new(
            None,
            parse_address("reply-to", &mail.headers.reply_to)?,
        ));
    }

    Ok(builder.body(mail.body.clone())?)
}

fn parse_address(field: &'static str, value: &str) -> Result<lettre::Address, MailError> {
    value.parse().map_err(|source| MailError::Address {
        field,
        value: value.to_string(),
        source,
    })
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        let response = self.transport.send(message).await?;

        info!(
            to = %mail.to,
            subject = %mail.subject,
            smtp_code = %response.code(),
            "smtp_message_accepted"
        );

        Ok(())
    }
}
