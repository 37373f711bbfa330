// src/services/testing.rs

//! In-memory collaborator doubles and HTML fixtures shared by the
//! service and pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use lettre::message::Message;

use crate::error::{AppError, Result};
use crate::models::Record;
use crate::services::{FetchedImage, MailTransport, PageFetcher};

/// Fetcher serving pages from an in-memory map.
///
/// Text fetches for unknown or failed URLs error; image fetches succeed
/// with placeholder bytes unless the URL is marked failing.
pub(crate) struct MockFetcher {
    pages: Mutex<HashMap<String, String>>,
    failing: Mutex<HashSet<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn set_page(&self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.lock().unwrap().insert(url.into(), body.into());
    }

    pub fn fail_url(&self, url: impl Into<String>) {
        self.failing.lock().unwrap().insert(url.into());
    }

    pub fn unfail_url(&self, url: &str) {
        self.failing.lock().unwrap().remove(url);
    }

    fn is_failing(&self, url: &str) -> bool {
        self.failing.lock().unwrap().contains(url)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        if self.is_failing(url) {
            return Err(AppError::config(format!("mock fetch failure: {url}")));
        }
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::config(format!("mock page missing: {url}")))
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        if self.is_failing(url) {
            return Err(AppError::config(format!("mock image failure: {url}")));
        }
        Ok(FetchedImage {
            bytes: vec![0xFF, 0xD8, 0xFF],
            content_type: "image/jpeg".to_string(),
        })
    }
}

/// Transport recording delivered messages.
pub(crate) struct MockTransport {
    sent: Mutex<Vec<Message>>,
    fail_next: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next delivery fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Formatted wire bytes of every delivered message, for header
    /// assertions.
    pub fn sent_formatted(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| String::from_utf8_lossy(&m.formatted()).into_owned())
            .collect()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn deliver(&self, message: Message) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::config("mock delivery failure"));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// A complete record for tests that bypass parsing.
pub(crate) fn sample_record(id: &str, name: &str) -> Record {
    Record {
        id: id.to_string(),
        name: name.to_string(),
        breed: "Terrier Mix".to_string(),
        age: "2 years".to_string(),
        gender: "Male".to_string(),
        location: "Golden Valley".to_string(),
        link: format!("https://example.com/animals/{id}"),
        image_url: format!("https://example.com/photos/{id}.jpg"),
    }
}

/// Listing page HTML with one item link per path.
pub(crate) fn listing_html(paths: &[&str]) -> String {
    let links: String = paths
        .iter()
        .map(|p| format!("<div class=\"animal--image-wrapper\"><a href=\"{p}\">photo</a></div>"))
        .collect();
    format!("<html><body>{links}</body></html>")
}

/// Detail page HTML with every field the parser requires.
pub(crate) fn detail_html(id: &str, name: &str) -> String {
    format!(
        concat!(
            "<html><body>",
            "<div class=\"animal-title\"><h1>{name}</h1></div>",
            "<div class=\"animal--breed\">Terrier Mix</div>",
            "<div class=\"animal--sex\">Male</div>",
            "<div class=\"animal--age\">2 years</div>",
            "<div class=\"animal--location\"><div class=\"field__item\">Golden Valley</div></div>",
            "<div class=\"animal--details-bottom\"><div class=\"animal-item\">Animal ID: {id}</div></div>",
            "<div id=\"animal--main-image\"><img src=\"/photos/{id}.jpg\"></div>",
            "</body></html>",
        ),
        name = name,
        id = id,
    )
}
