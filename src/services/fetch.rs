// src/services/fetch.rs

//! Page fetching boundary.
//!
//! The watch loop and parser only see the `PageFetcher` trait; the
//! reqwest-backed implementation lives here so tests can substitute an
//! in-memory fetcher.

use async_trait::async_trait;

use crate::config::HttpConfig;
use crate::error::Result;
use crate::utils::http;

/// Image bytes plus the content type reported by the server.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Boundary for retrieving remote documents and images.
///
/// Every failure mode (timeout, non-success status, transport error) is
/// reported as an error value; nothing escapes a watch cycle uncaught.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page body as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetch an image resource.
    async fn fetch_image(&self, url: &str) -> Result<FetchedImage>;
}

/// HTTP-backed fetcher with a shared configured client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?.to_vec();
        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}
