//! SMTP delivery over `lettre`'s async transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as LettreAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info};

use crate::config::MailConfig;

use super::{DeliveryReceipt, MailError, Mailer, Outgoing};

/// Mailer backed by an [`AsyncSmtpTransport`]. The transport is built once at
/// startup and connections are reused across requests.
pub struct SmtpMailer {
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.config.smtp_host)
            .field("port", &self.config.smtp_port)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let transport = build_transport(&config)?;
        Ok(Self { config, transport })
    }
}

/// Build a `lettre::Message` from an outgoing mail and the sender config.
///
/// Free function so it can be tested without constructing the async transport
/// (which needs a Tokio runtime).
fn build_message(config: &MailConfig, mail: &Outgoing) -> Result<Message, MailError> {
    let from_address: Address = config
        .from_address
        .parse()
        .map_err(|e| MailError::InvalidAddress(format!("from address: {e}")))?;
    let from = Mailbox::new(Some(config.from_name.clone()), from_address);

    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|e| MailError::InvalidAddress(format!("recipient: {e}")))?;

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone());

    if let Some(ref reply_to) = mail.reply_to {
        let reply: Mailbox = reply_to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("reply-to: {e}")))?;
        builder = builder.reply_to(reply);
    }

    // Plain-text fallback plus HTML, wrapped with any attachments.
    let alternative = MultiPart::alternative()
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(mail.text.clone()),
        )
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(mail.html.clone()),
        );

    let message = if mail.attachments.is_empty() {
        builder
            .multipart(alternative)
            .map_err(|e| MailError::Compose(e.to_string()))?
    } else {
        let mut mixed = MultiPart::mixed().multipart(alternative);
        for attachment in &mail.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| MailError::Compose(format!("attachment content type: {e}")))?;
            mixed = mixed.singlepart(
                LettreAttachment::new(attachment.filename.clone())
                    .body(attachment.bytes.clone(), content_type),
            );
        }
        builder
            .multipart(mixed)
            .map_err(|e| MailError::Compose(e.to_string()))?
    };

    Ok(message)
}

/// Build the async SMTP transport from configuration.
fn build_transport(
    config: &MailConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
    let builder = if config.tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError::Transport(format!("SMTP TLS relay error: {e}")))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };

    let builder = builder.port(config.smtp_port);

    let builder = if let (Some(ref user), Some(ref pass)) = (&config.smtp_user, &config.smtp_pass)
    {
        builder.credentials(Credentials::new(user.clone(), pass.clone()))
    } else {
        builder
    };

    Ok(builder.build())
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: Outgoing) -> Result<DeliveryReceipt, MailError> {
        debug!(to = %mail.to, subject = %mail.subject, "building email message");
        let message = build_message(&self.config, &mail)?;

        info!(to = %mail.to, subject = %mail.subject, "sending email");
        let response = self.transport.send(message).await.map_err(|e| {
            error!(error = %e, "SMTP send failed");
            MailError::Transport(e.to_string())
        })?;

        info!(to = %mail.to, code = %response.code(), "email sent");
        Ok(DeliveryReceipt {
            code: response.code().to_string(),
        })
    }

    async fn verify(&self) -> Result<(), MailError> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| MailError::Transport(format!("SMTP connection test failed: {e}")))?;
        Ok(())
    }
}
