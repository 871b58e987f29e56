//! Outbound mail.

use async_trait::async_trait;
use thiserror::Error;

use journalsync_core::journal::is_valid_email;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// A plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: Option<String>,
}

impl Mail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            reply_to: None,
        }
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

/// Sends plain-text mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(&self, mail: &Mail) -> Result<(), MailError>;
}

/// Mailer that writes each message to the log instead of delivering it.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_mail(&self, mail: &Mail) -> Result<(), MailError> {
        if !is_valid_email(&mail.to) {
            return Err(MailError::InvalidRecipient(mail.to.clone()));
        }
        tracing::info!(
            from = %self.from,
            to = %mail.to,
            reply_to = mail.reply_to.as_deref(),
            subject = %mail.subject,
            body = %mail.body,
            "Mail sent"
        );
        Ok(())
    }
}
