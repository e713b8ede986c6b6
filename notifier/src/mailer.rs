//! Outbound email seam
//!
//! Delivery belongs to an external service. The notifier only builds the MIME
//! message and hands it to a `Mailer`: either an on-disk outbox that a relay
//! picks up, or the log.

use std::path::{Path, PathBuf};

use lettre::message::{Mailbox, MultiPart};
use lettre::{FileTransport, Message, Transport};
use tracing::info;

use crate::digest::Digest;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("Outbox write error: {0}")]
    Outbox(#[from] lettre::transport::file::Error),
}

/// One notification addressed to the office.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub digest: Digest,
}

impl OutgoingEmail {
    /// Assemble a multipart/alternative message (plain text + HTML).
    pub fn to_message(&self) -> Result<Message, MailError> {
        let from: Mailbox = self.from.parse()?;
        let to: Mailbox = self.to.parse()?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.digest.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                self.digest.text.clone(),
                self.digest.html.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

pub trait Mailer: Send + Sync {
    /// Hand off the email; returns a message id.
    fn send(&self, email: &OutgoingEmail) -> Result<String, MailError>;
}

/// Writes each message as `<id>.eml` into a directory.
pub struct OutboxMailer {
    dir: PathBuf,
    transport: FileTransport,
}

impl OutboxMailer {
    pub fn new<P: AsRef<Path>>(dir: P) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            transport: FileTransport::new(dir.as_ref()),
        })
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<String, MailError> {
        let message = email.to_message()?;
        let id = self.transport.send(&message)?;
        info!(
            id = %id,
            to = %email.to,
            subject = %email.digest.subject,
            outbox = %self.dir.display(),
            "birthday email written to outbox"
        );
        Ok(id)
    }
}

/// Builds the message and logs it without delivering anything.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<String, MailError> {
        let message = email.to_message()?;
        let bytes = message.formatted().len();
        let id = format!("log-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        info!(
            id = %id,
            to = %email.to,
            subject = %email.digest.subject,
            bytes,
            "birthday email built (no outbox configured)"
        );
        Ok(id)
    }
}
