use std::fmt::{Debug, Formatter};

use anyhow::Context;
use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

use crate::configuration::EmailClientSettings;
use crate::domain::EmailMessage;
use crate::routes::error_chain_fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Delivers rendered emails.
///
/// Built once at start-up and shared by every request.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError>;
}

#[derive(thiserror::Error)]
pub enum DeliveryError {
    #[error("{0:?} is not a valid recipient address")]
    InvalidRecipient(String, #[source] AddressError),
    #[error("Failed to build the email message")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("The mail transport failed to deliver the message")]
    Transport(#[source] BoxError),
}

impl Debug for DeliveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Mail sender on top of a `lettre` transport, SMTP by default.
pub struct EmailClient<T = AsyncSmtpTransport<Tokio1Executor>> {
    transport: T,
    sender: Mailbox,
}

impl<T> EmailClient<T> {
    pub fn new(transport: T, sender: Mailbox) -> Self {
        Self { transport, sender }
    }

    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }
}

impl EmailClient {
    /// Builds the STARTTLS SMTP client described by the settings.
    ///
    /// No connection is opened here; the transport connects lazily and pools
    /// its connections. See [`EmailClient::verify`] to check the relay upfront.
    pub fn from_settings(settings: &EmailClientSettings) -> Result<Self, anyhow::Error> {
        let sender = settings
            .sender_email
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid sender email address: {}", settings.sender_email))?;

        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose_secret().to_owned(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .with_context(|| format!("Failed to set up SMTP relay {}", settings.smtp_host))?
            .port(settings.smtp_port)
            .credentials(credentials)
            .timeout(Some(settings.timeout()))
            .build();

        Ok(Self::new(transport, sender))
    }

    /// Connects and authenticates against the relay once.
    #[tracing::instrument(name = "Verify SMTP relay", skip(self))]
    pub async fn verify(&self) -> Result<bool, lettre::transport::smtp::Error> {
        self.transport.test_connection().await
    }
}

#[async_trait]
impl<T> MailSender for EmailClient<T>
where
    T: AsyncTransport + Send + Sync,
    T::Error: Into<BoxError>,
{
    #[tracing::instrument(
        name = "Send email",
        skip(self, message),
        fields(recipient = %message.recipient)
    )]
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        let recipient = message
            .recipient
            .parse::<Mailbox>()
            .map_err(|e| DeliveryError::InvalidRecipient(message.recipient.clone(), e))?;

        let email = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(message.body.clone())?;

        self.transport
            .send(email)
            .await
            .map_err(|e| DeliveryError::Transport(e.into()))?;

        Ok(())
    }
}
