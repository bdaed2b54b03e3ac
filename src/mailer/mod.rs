//! Notification gateway: composes and dispatches outbound email.
//!
//! The [`Mailer`] trait is the seam between route handlers and the SMTP
//! transport. Delivery is synchronous from the caller's perspective and
//! attempted at most once per request; there is no retry and no queue.

pub mod compose;
pub mod smtp;

pub use smtp::SmtpMailer;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Compose(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// A single attachment carried inline in the message.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One outbound message, fully composed. The sender identity comes from
/// process-wide configuration, never from user input; `reply_to` carries the
/// submitter's address so replies route back to them.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Outgoing {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
            text: text.into(),
            reply_to: None,
            attachments: Vec::new(),
        }
    }

    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Outcome of a successful delivery attempt.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// SMTP reply code reported by the transport.
    pub code: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand one message to the transport. At-most-once: a failure is
    /// surfaced to the caller, never retried.
    async fn send(&self, mail: Outgoing) -> Result<DeliveryReceipt, MailError>;

    /// Probe the transport connection. Used by the health endpoint.
    async fn verify(&self) -> Result<(), MailError>;
}
