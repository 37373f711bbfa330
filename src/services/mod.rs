//! Service layer for the watcher application.
//!
//! This module contains the business logic for:
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Snapshot parsing (`RecordParser`)
//! - Alert dispatch (`Notifier`, `SmtpMailer`)

mod fetch;
mod notify;
mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use fetch::{FetchedImage, HttpFetcher, PageFetcher};
pub use notify::{MailTransport, Notifier, NotifyOutcome, SmtpMailer};
pub use parser::{ParseOutcome, RecordParser};
