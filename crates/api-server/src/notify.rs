//! Email notifications.
//!
//! Sends are dispatched onto their own task after the triggering write has
//! committed. Failures are logged there and never reach the request.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{authentication::Credentials, AsyncSmtpTransport},
    AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub message: String,
}

impl OutgoingEmail {
    pub fn booking_confirmation(
        to: impl Into<String>,
        booking_id: &str,
        transaction_id: Option<&str>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: "Booking successful".to_string(),
            message: format!(
                "Booking id: {},TransactionId:{}",
                booking_id,
                transaction_id.unwrap_or_default()
            ),
        }
    }

    /// The message wrapped in a paragraph. Transaction ids come from the
    /// client, so the text is escaped before it goes into markup.
    pub fn html_body(&self) -> String {
        format!("<p>{}</p>", escape_html(&self.message))
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// SMTP relay with login credentials
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let from: Mailbox = config.username.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.message.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body()),
                    ),
            )?;
        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        let response = self.transport.send(message).await?;
        tracing::debug!(code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

/// Send `email` in the background. The handle is only useful to tests;
/// request handlers drop it.
pub fn dispatch(mailer: Arc<dyn Mailer>, email: OutgoingEmail) -> JoinHandle<()> {
    tokio::spawn(async move {
        match mailer.send(&email).await {
            Ok(()) => tracing::info!(recipient = %email.to, subject = %email.subject, "Email sent"),
            Err(err) => tracing::warn!(
                recipient = %email.to,
                error = %err,
                "Failed to send email"
            ),
        }
    })
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
