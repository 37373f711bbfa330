// src/services/parser.rs

//! Record parser service.
//!
//! Turns one listing page into a fresh snapshot: extracts the detail
//! links, fetches each detail page with bounded concurrency, and
//! assembles the successfully parsed records keyed by stable id. A
//! single bad detail page is counted and logged, never fatal.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::warn;
use scraper::{Html, Selector};
use url::Url;

use crate::config::WatchConfig;
use crate::error::{AppError, Result};
use crate::models::{DetailSelectors, ListingSelectors, Record, Snapshot};
use crate::services::PageFetcher;
use crate::utils::{extract_record_id, resolve_url};

/// Aggregate result of building one snapshot.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub snapshot: Snapshot,
    /// Number of detail pages attempted
    pub attempted: usize,
    /// Number of detail pages that failed to fetch or parse
    pub failures: usize,
}

/// Service for parsing listing and detail pages into records.
pub struct RecordParser {
    fetcher: Arc<dyn PageFetcher>,
    base_url: Url,
    link_sel: Selector,
    link_attr: String,
    id_sel: Selector,
    name_sel: Selector,
    breed_sel: Selector,
    age_sel: Selector,
    gender_sel: Selector,
    location_sel: Selector,
    image_sel: Selector,
    image_attr: String,
    max_concurrent: usize,
    request_delay: Duration,
}

impl RecordParser {
    /// Create a parser, compiling all selectors up front.
    ///
    /// An invalid selector is a startup error, not a per-cycle one.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        listing: &ListingSelectors,
        detail: &DetailSelectors,
        config: &WatchConfig,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            base_url: Url::parse(&config.site.base_url)?,
            link_sel: Self::parse_selector(&listing.link_selector)?,
            link_attr: listing.link_attr.clone(),
            id_sel: Self::parse_selector(&detail.id_selector)?,
            name_sel: Self::parse_selector(&detail.name_selector)?,
            breed_sel: Self::parse_selector(&detail.breed_selector)?,
            age_sel: Self::parse_selector(&detail.age_selector)?,
            gender_sel: Self::parse_selector(&detail.gender_selector)?,
            location_sel: Self::parse_selector(&detail.location_selector)?,
            image_sel: Self::parse_selector(&detail.image_selector)?,
            image_attr: detail.image_attr.clone(),
            max_concurrent: config.http.max_concurrent.max(1),
            request_delay: Duration::from_millis(config.http.request_delay_ms),
        })
    }

    /// Extract the ordered, deduplicated detail links from listing HTML,
    /// resolved to absolute URLs.
    pub fn extract_links(&self, listing_html: &str) -> Vec<String> {
        let document = Html::parse_document(listing_html);
        let mut seen = std::collections::HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&self.link_sel) {
            if let Some(href) = element.value().attr(&self.link_attr) {
                let link = resolve_url(&self.base_url, href);
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }
        links
    }

    /// Build a snapshot from listing HTML.
    ///
    /// Detail pages are fetched with bounded concurrency; the snapshot
    /// is assembled only after every fetch has completed or failed.
    pub async fn build_snapshot(&self, listing_html: &str) -> ParseOutcome {
        let links = self.extract_links(listing_html);

        let mut outcome = ParseOutcome {
            attempted: links.len(),
            ..ParseOutcome::default()
        };

        let mut detail_stream = stream::iter(links)
            .map(|link| async move {
                let result = self.fetch_record(&link).await;
                (link, result)
            })
            .buffer_unordered(self.max_concurrent);

        while let Some((link, result)) = detail_stream.next().await {
            match result {
                Ok(record) => outcome.snapshot.insert(record),
                Err(error) => {
                    outcome.failures += 1;
                    warn!("Failed to parse detail page {link}: {error}");
                }
            }

            if self.request_delay.as_millis() > 0 {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        outcome
    }

    /// Fetch one detail page and parse it into a record.
    async fn fetch_record(&self, link: &str) -> Result<Record> {
        let html = self.fetcher.fetch_text(link).await?;
        self.parse_detail(&html, link)
    }

    /// Parse one detail page's HTML into a record.
    ///
    /// Any missing required field fails this record only.
    pub fn parse_detail(&self, html: &str, link: &str) -> Result<Record> {
        let document = Html::parse_document(html);

        let id_label = self.required_text(&document, &self.id_sel, link, "id")?;
        let id = extract_record_id(&id_label)
            .ok_or_else(|| AppError::parse(link, "empty id label"))?;

        let name = self.required_text(&document, &self.name_sel, link, "name")?;
        let breed = self.required_text(&document, &self.breed_sel, link, "breed")?;
        let age = self.required_text(&document, &self.age_sel, link, "age")?;
        let location = self.required_text(&document, &self.location_sel, link, "location")?;

        // Gender is display-only and not always present
        let gender = Self::select_text(&document, &self.gender_sel).unwrap_or_default();

        let image_href = document
            .select(&self.image_sel)
            .next()
            .and_then(|el| el.value().attr(&self.image_attr))
            .ok_or_else(|| AppError::parse(link, "missing required field: image"))?;
        let image_url = resolve_url(&self.base_url, image_href);

        Ok(Record {
            id,
            name,
            breed,
            age,
            gender,
            location,
            link: link.to_string(),
            image_url,
        })
    }

    fn required_text(
        &self,
        document: &Html,
        selector: &Selector,
        link: &str,
        field: &str,
    ) -> Result<String> {
        Self::select_text(document, selector)
            .ok_or_else(|| AppError::parse(link, format!("missing required field: {field}")))
    }

    /// Collect an element's text with whitespace normalized, None if the
    /// element is absent or its text is empty.
    fn select_text(document: &Html, selector: &Selector) -> Option<String> {
        let element = document.select(selector).next()?;
        let text: String = element.text().collect::<Vec<_>>().join(" ");
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        }
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchConfig;
    use crate::services::testing::{detail_html, listing_html, MockFetcher};

    fn test_config() -> WatchConfig {
        let mut config = WatchConfig::new("alerts@example.com", vec!["me@example.com".into()]);
        config.site.listing_url = "https://example.com/adoption".to_string();
        config.site.base_url = "https://example.com".to_string();
        config
    }

    fn test_parser(fetcher: Arc<MockFetcher>) -> RecordParser {
        RecordParser::new(
            fetcher,
            &ListingSelectors::default(),
            &DetailSelectors::default(),
            &test_config(),
        )
        .expect("selectors compile")
    }

    #[test]
    fn extract_links_resolves_and_dedupes() {
        let parser = test_parser(Arc::new(MockFetcher::new()));
        let html = listing_html(&["/animals/1", "/animals/2", "/animals/1"]);

        let links = parser.extract_links(&html);
        assert_eq!(
            links,
            vec![
                "https://example.com/animals/1".to_string(),
                "https://example.com/animals/2".to_string(),
            ]
        );
    }

    #[test]
    fn parse_detail_extracts_all_fields() {
        let parser = test_parser(Arc::new(MockFetcher::new()));
        let html = detail_html("56646767", "Rex");

        let record = parser
            .parse_detail(&html, "https://example.com/animals/1")
            .unwrap();
        assert_eq!(record.id, "56646767");
        assert_eq!(record.name, "Rex");
        assert_eq!(record.breed, "Terrier Mix");
        assert_eq!(record.age, "2 years");
        assert_eq!(record.gender, "Male");
        assert_eq!(record.location, "Golden Valley");
        assert_eq!(record.link, "https://example.com/animals/1");
        assert_eq!(record.image_url, "https://example.com/photos/56646767.jpg");
    }

    #[test]
    fn parse_detail_missing_name_fails() {
        let parser = test_parser(Arc::new(MockFetcher::new()));
        let html = detail_html("1", "Rex").replace("animal-title", "other-title");

        let error = parser
            .parse_detail(&html, "https://example.com/animals/1")
            .unwrap_err();
        assert!(error.to_string().contains("name"));
    }

    #[test]
    fn parse_detail_missing_gender_is_empty() {
        let parser = test_parser(Arc::new(MockFetcher::new()));
        let html = detail_html("1", "Rex").replace("animal--sex", "animal--hidden");

        let record = parser
            .parse_detail(&html, "https://example.com/animals/1")
            .unwrap();
        assert_eq!(record.gender, "");
    }

    #[tokio::test]
    async fn build_snapshot_isolates_detail_failures() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_page("https://example.com/animals/1", detail_html("1", "Rex"));
        fetcher.fail_url("https://example.com/animals/2");
        fetcher.set_page("https://example.com/animals/3", detail_html("3", "Luna"));
        let parser = test_parser(Arc::clone(&fetcher));

        let listing = listing_html(&["/animals/1", "/animals/2", "/animals/3"]);
        let outcome = parser.build_snapshot(&listing).await;

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.failures, 1);
        assert_eq!(outcome.snapshot.len(), 2);
        assert!(outcome.snapshot.contains_id("1"));
        assert!(outcome.snapshot.contains_id("3"));
    }

    #[tokio::test]
    async fn build_snapshot_missing_field_counts_as_failure() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_page(
            "https://example.com/animals/1",
            detail_html("1", "Rex").replace("animal--breed", "animal--hidden"),
        );
        let parser = test_parser(Arc::clone(&fetcher));

        let outcome = parser.build_snapshot(&listing_html(&["/animals/1"])).await;
        assert_eq!(outcome.failures, 1);
        assert!(outcome.snapshot.is_empty());
    }

    #[test]
    fn invalid_selector_is_startup_error() {
        let mut listing = ListingSelectors::default();
        listing.link_selector = "[[invalid".to_string();
        let result = RecordParser::new(
            Arc::new(MockFetcher::new()),
            &listing,
            &DetailSelectors::default(),
            &test_config(),
        );
        assert!(result.is_err());
    }
}
