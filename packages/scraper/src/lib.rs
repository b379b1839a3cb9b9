#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scraper for the bostonplans.org "Development Projects" listing.
//!
//! Fetches the paginated listing sequentially and extracts one
//! [`Development`](dev_comps_models::Development) per project card. The
//! site's markup is not contract-controlled, so [`listing`] parses with a
//! primary card selector and falls back to a permissive anchor scan when
//! the expected structure is missing.

pub mod listing;

use std::collections::BTreeMap;

/// Errors that can occur during scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Parsing the response body failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A URL could not be parsed or resolved.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Configuration for a listing scrape.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Site root used to resolve relative project links.
    pub base_url: String,
    /// Path of the paginated listing under `base_url`.
    pub listing_path: String,
    /// Number of pages to fetch (page 1 is the bare listing URL; pages
    /// ≥ 2 add `?page=N`).
    pub max_pages: u32,
    /// Politeness delay between page fetches, in milliseconds.
    pub delay_ms: u64,
    /// Additional HTTP headers to include in requests.
    pub headers: BTreeMap<String, String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        // A browser-like UA; the listing serves trimmed HTML to unknown
        // clients.
        headers.insert(
            "User-Agent".to_owned(),
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/124.0.0.0 Safari/537.36"
                .to_owned(),
        );

        Self {
            base_url: "https://www.bostonplans.org".to_owned(),
            listing_path: "/projects/development-projects".to_owned(),
            max_pages: 20,
            delay_ms: 400,
            headers,
        }
    }
}

impl ListingConfig {
    /// Sets the maximum number of pages to fetch.
    #[must_use]
    pub const fn with_max_pages(mut self, max: u32) -> Self {
        self.max_pages = max;
        self
    }

    /// Sets the delay between page fetches.
    #[must_use]
    pub const fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Adds an HTTP header to include in requests.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Full listing URL for a 1-indexed page number.
    #[must_use]
    pub fn page_url(&self, page: u32) -> String {
        let list_url = format!("{}{}", self.base_url, self.listing_path);
        if page <= 1 {
            list_url
        } else {
            format!("{list_url}?page={page}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_query_parameter() {
        let config = ListingConfig::default();
        assert_eq!(
            config.page_url(1),
            "https://www.bostonplans.org/projects/development-projects"
        );
    }

    #[test]
    fn later_pages_add_the_page_parameter() {
        let config = ListingConfig::default();
        assert_eq!(
            config.page_url(3),
            "https://www.bostonplans.org/projects/development-projects?page=3"
        );
    }

    #[test]
    fn default_config_sends_a_user_agent() {
        let config = ListingConfig::default();
        assert!(config.headers.contains_key("User-Agent"));
    }
}
