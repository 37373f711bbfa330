// src/services/notify.rs

//! Alert notifier service.
//!
//! Composes one email per newly listed record (HTML body plus the
//! record's photo inlined by content id) and hands it to the mail
//! transport. Failures are isolated per record: a bad image or a
//! rejected submission drops that record's alert only.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use log::{info, warn};

use crate::config::{SmtpConfig, SmtpCredential, WatchConfig};
use crate::error::{AppError, Result};
use crate::models::Record;
use crate::services::{FetchedImage, PageFetcher};

/// Subject line for every alert.
const SUBJECT: &str = "New Dog at the Humane Society!";

/// Content id of the inlined photo, referenced from the HTML body.
const IMAGE_CID: &str = "photo";

/// Aggregate result of a notification batch.
#[derive(Debug, Default)]
pub struct NotifyOutcome {
    pub sent: usize,
    pub failures: usize,
}

/// Boundary for delivering a composed message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<()>;
}

/// SMTP submission over STARTTLS with account credentials.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Create a mailer for the given server, authenticating as the
    /// sender address.
    pub fn new(smtp: &SmtpConfig, sender: &str, credential: &SmtpCredential) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
            .port(smtp.port)
            .credentials(Credentials::new(
                sender.to_string(),
                credential.expose().to_string(),
            ))
            .build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, message: Message) -> Result<()> {
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Service that formats and dispatches one alert per new record.
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    fetcher: Arc<dyn PageFetcher>,
    sender: Mailbox,
    recipients: Vec<Mailbox>,
}

impl Notifier {
    /// Create a notifier, parsing all mail addresses up front.
    pub fn new(
        transport: Arc<dyn MailTransport>,
        fetcher: Arc<dyn PageFetcher>,
        config: &WatchConfig,
    ) -> Result<Self> {
        let sender: Mailbox = config.sender.parse()?;
        let recipients = config
            .recipients
            .iter()
            .map(|r| r.parse::<Mailbox>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            transport,
            fetcher,
            sender,
            recipients,
        })
    }

    /// Send one alert per record, isolating per-record failures.
    pub async fn notify_all(&self, records: &[Record]) -> NotifyOutcome {
        let mut outcome = NotifyOutcome::default();
        for record in records {
            match self.notify_one(record).await {
                Ok(()) => {
                    outcome.sent += 1;
                    info!("Sent alert for {} (id {})", record.name, record.id);
                }
                Err(error) => {
                    outcome.failures += 1;
                    warn!("Failed to send alert for id {}: {}", record.id, error);
                }
            }
        }
        outcome
    }

    /// Compose and deliver the alert for one record.
    ///
    /// Fetching the photo is part of composition; its failure is a
    /// delivery failure for this record.
    pub async fn notify_one(&self, record: &Record) -> Result<()> {
        let image = self.fetcher.fetch_image(&record.image_url).await?;
        let message = self.compose(record, image)?;
        self.transport.deliver(message).await
    }

    fn compose(&self, record: &Record, image: FetchedImage) -> Result<Message> {
        let mut builder = Message::builder().from(self.sender.clone()).subject(SUBJECT);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        let content_type = ContentType::parse(&image.content_type)
            .or_else(|_| ContentType::parse("image/jpeg"))
            .map_err(|e| AppError::notify(&record.id, e))?;

        let message = builder.multipart(
            MultiPart::related()
                .singlepart(SinglePart::html(build_body(record)))
                .singlepart(
                    Attachment::new_inline(IMAGE_CID.to_string()).body(image.bytes, content_type),
                ),
        )?;
        Ok(message)
    }
}

/// Build the HTML body for one record's alert.
fn build_body(record: &Record) -> String {
    format!(
        "<p>Name: {}</p><p>Breed: {}</p><p>Age: {}</p><p>Gender: {}</p>\
         <p>Link: {}</p><p>Location: {}</p><img src=\"cid:{IMAGE_CID}\">",
        record.name, record.breed, record.age, record.gender, record.link, record.location
    )
}
