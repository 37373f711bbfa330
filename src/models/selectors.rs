//! CSS selectors for scraping the listing and detail pages.

use serde::{Deserialize, Serialize};

/// CSS selectors for the listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Selector for each item link on the listing page
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "defaults::attr_name")]
    pub link_attr: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            link_selector: defaults::link_selector(),
            link_attr: defaults::attr_name(),
        }
    }
}

/// CSS selectors for the per-item detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailSelectors {
    /// Selector for the stable id element
    #[serde(default = "defaults::id_selector")]
    pub id_selector: String,

    /// Selector for the name element
    #[serde(default = "defaults::name_selector")]
    pub name_selector: String,

    /// Selector for the breed element
    #[serde(default = "defaults::breed_selector")]
    pub breed_selector: String,

    /// Selector for the age element
    #[serde(default = "defaults::age_selector")]
    pub age_selector: String,

    /// Selector for the gender element
    #[serde(default = "defaults::gender_selector")]
    pub gender_selector: String,

    /// Selector for the location element
    #[serde(default = "defaults::location_selector")]
    pub location_selector: String,

    /// Selector for the main photo element
    #[serde(default = "defaults::image_selector")]
    pub image_selector: String,

    /// HTML attribute name for extracting the photo URL (usually "src")
    #[serde(default = "defaults::image_attr")]
    pub image_attr: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            id_selector: defaults::id_selector(),
            name_selector: defaults::name_selector(),
            breed_selector: defaults::breed_selector(),
            age_selector: defaults::age_selector(),
            gender_selector: defaults::gender_selector(),
            location_selector: defaults::location_selector(),
            image_selector: defaults::image_selector(),
            image_attr: defaults::image_attr(),
        }
    }
}

mod defaults {
    // Listing page
    pub fn link_selector() -> String {
        "div.animal--image-wrapper a".into()
    }
    pub fn attr_name() -> String {
        "href".into()
    }

    // Detail page
    pub fn id_selector() -> String {
        "div.animal--details-bottom div.animal-item".into()
    }
    pub fn name_selector() -> String {
        "div.animal-title h1".into()
    }
    pub fn breed_selector() -> String {
        "div.animal--breed".into()
    }
    pub fn age_selector() -> String {
        "div.animal--age".into()
    }
    pub fn gender_selector() -> String {
        "div.animal--sex".into()
    }
    pub fn location_selector() -> String {
        "div.animal--location div.field__item".into()
    }
    pub fn image_selector() -> String {
        "div#animal--main-image img".into()
    }
    pub fn image_attr() -> String {
        "src".into()
    }
}
