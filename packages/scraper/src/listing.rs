//! Listing page fetching and parsing.
//!
//! Each listing page repeats a "project card" structure
//! (`div.projectTableWrapper > div.devprojectTable`) whose first anchor
//! carries the project address and detail link. When a page yields zero
//! cards through that structure — the site occasionally reshuffles its
//! markup — a permissive fallback scans every anchor under the listing's
//! URL namespace instead, filtering out navigation and heading links by
//! text.

use scraper::{Html, Selector};
use url::Url;

use dev_comps_models::Development;

use crate::{ListingConfig, ScrapeError};

/// Anchor texts that appear in navigation/headers, not project cards.
const NAV_ANCHOR_TEXTS: &[&str] = &["Development Projects & Plans", "Projects & Plans"];

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{selector}': {e}")))
}

/// Extracts developments from one listing page.
///
/// Tries the structural card selector first, then the permissive anchor
/// fallback. Entries are de-duplicated by resolved absolute link within
/// the page.
///
/// # Errors
///
/// Returns [`ScrapeError`] if a selector fails to parse (a programming
/// error, not a markup problem — unparseable markup just yields fewer
/// entries).
pub fn parse_list_page(html: &str, base: &Url) -> Result<Vec<Development>, ScrapeError> {
    let document = Html::parse_document(html);
    let namespace = "/projects/development-projects";

    let mut devs: Vec<Development> = Vec::new();

    // ── Primary path: the observed card structure ───────────────────
    let card_sel = parse_selector("div.projectTableWrapper div.devprojectTable")?;
    let anchor_sel = parse_selector("a[href]")?;

    for card in document.select(&card_sel) {
        let Some(anchor) = card.select(&anchor_sel).next() else {
            continue;
        };
        let address = anchor.text().collect::<Vec<_>>().join("").trim().to_owned();
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(link) = base.join(href) else {
            log::debug!("Skipping unresolvable href '{href}'");
            continue;
        };
        if !address.is_empty() && link.path().contains(namespace) {
            devs.push(Development::new(address, link.into()));
        }
    }

    // ── Fallback path: any project links in the list view ───────────
    if devs.is_empty() {
        let fallback_sel = parse_selector(&format!(r#"a[href*="{namespace}/"]"#))?;

        for anchor in document.select(&fallback_sel) {
            let text = anchor.text().collect::<Vec<_>>().join("").trim().to_owned();
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if text.is_empty() || href.is_empty() {
                continue;
            }
            // Skip obvious non-item links (nav, category headers, etc.)
            if NAV_ANCHOR_TEXTS.iter().any(|nav| text.contains(nav)) {
                continue;
            }
            let Ok(link) = base.join(href) else {
                log::debug!("Skipping unresolvable href '{href}'");
                continue;
            };
            devs.push(Development::new(text, link.into()));
        }
    }

    // Deduplicate by resolved absolute link
    let mut seen = std::collections::BTreeSet::new();
    devs.retain(|d| seen.insert(d.link.clone()));

    Ok(devs)
}

/// Scrapes up to `config.max_pages` pages of the development-projects
/// listing, sleeping `config.delay_ms` between page fetches.
///
/// A page that fails to fetch is skipped with a warning and the scrape
/// continues with the next page, so one bad page costs at most its own
/// entries.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the configured base URL is invalid or a
/// selector fails to parse; page-level fetch failures are not errors.
pub async fn scrape_developments(
    client: &reqwest::Client,
    config: &ListingConfig,
) -> Result<Vec<Development>, ScrapeError> {
    let base = Url::parse(&config.base_url)?;

    let mut all_devs: Vec<Development> = Vec::new();

    for page in 1..=config.max_pages {
        let url = config.page_url(page);

        match fetch_page(client, config, &url).await {
            Ok(body) => {
                let page_devs = parse_list_page(&body, &base)?;
                log::info!("Page {page}: {} items", page_devs.len());
                all_devs.extend(page_devs);
            }
            Err(e) => {
                log::warn!("Skipping page {page} ({url}): {e}");
            }
        }

        if page < config.max_pages {
            tokio::time::sleep(std::time::Duration::from_millis(config.delay_ms)).await;
        }
    }

    log::info!("Scrape complete — {} total entries", all_devs.len());
    Ok(all_devs)
}

/// Fetches one listing page with the configured headers.
async fn fetch_page(
    client: &reqwest::Client,
    config: &ListingConfig,
    url: &str,
) -> Result<String, ScrapeError> {
    let mut req = client
        .get(url)
        .timeout(std::time::Duration::from_secs(30));
    for (key, value) in &config.headers {
        req = req.header(key.as_str(), value.as_str());
    }

    let resp = req.send().await?.error_for_status()?;
    Ok(resp.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.bostonplans.org").unwrap()
    }

    const PRIMARY_PAGE: &str = r#"
        <html><body>
          <div class="projectTableWrapper">
            <div class="devprojectTable">
              <a href="/projects/development-projects/10-stonley-road">10 Stonley Road</a>
              <span>Jamaica Plain</span>
            </div>
            <div class="devprojectTable">
              <a href="/projects/development-projects/88-black-falcon">88 Black Falcon Ave</a>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn primary_selector_extracts_cards() {
        let devs = parse_list_page(PRIMARY_PAGE, &base()).unwrap();
        assert_eq!(devs.len(), 2);
        assert_eq!(devs[0].address, "10 Stonley Road");
        assert_eq!(
            devs[0].link,
            "https://www.bostonplans.org/projects/development-projects/10-stonley-road"
        );
        assert!(devs.iter().all(|d| d.location.is_none()));
    }

    #[test]
    fn fallback_scans_anchors_when_no_cards_match() {
        let html = r#"
            <html><body>
              <nav><a href="/projects/development-projects/">Development Projects &amp; Plans</a></nav>
              <h2><a href="/projects/development-projects/">Projects &amp; Plans</a></h2>
              <ul>
                <li><a href="/projects/development-projects/a-street">1 A Street</a></li>
                <li><a href="/projects/development-projects/b-street">2 B Street</a></li>
                <li><a href="/projects/development-projects/c-street">3 C Street</a></li>
                <li><a href="/projects/development-projects/d-street">4 D Street</a></li>
                <li><a href="/projects/development-projects/e-street">5 E Street</a></li>
              </ul>
            </body></html>
        "#;
        let devs = parse_list_page(html, &base()).unwrap();
        assert_eq!(devs.len(), 5);
        assert_eq!(devs[0].address, "1 A Street");
        assert_eq!(devs[4].address, "5 E Street");
    }

    #[test]
    fn fallback_is_not_used_when_primary_matches() {
        let html = r#"
            <html><body>
              <div class="projectTableWrapper">
                <div class="devprojectTable">
                  <a href="/projects/development-projects/real-card">Real Card</a>
                </div>
              </div>
              <a href="/projects/development-projects/loose-anchor">Loose Anchor</a>
            </body></html>
        "#;
        let devs = parse_list_page(html, &base()).unwrap();
        assert_eq!(devs.len(), 1);
        assert_eq!(devs[0].address, "Real Card");
    }

    #[test]
    fn duplicate_links_are_collapsed() {
        let html = r#"
            <html><body>
              <a href="/projects/development-projects/twice">1 Same Pl</a>
              <a href="/projects/development-projects/twice">1 Same Pl</a>
              <a href="/projects/development-projects/once">2 Other St</a>
            </body></html>
        "#;
        let devs = parse_list_page(html, &base()).unwrap();
        assert_eq!(devs.len(), 2);
    }

    #[test]
    fn cards_outside_the_listing_namespace_are_ignored() {
        let html = r#"
            <html><body>
              <div class="projectTableWrapper">
                <div class="devprojectTable">
                  <a href="/news/some-article">Not a project</a>
                </div>
              </div>
            </body></html>
        "#;
        // Primary yields nothing, and the fallback namespace filter skips
        // the news link too.
        let devs = parse_list_page(html, &base()).unwrap();
        assert!(devs.is_empty());
    }

    #[test]
    fn empty_page_parses_to_no_entries() {
        let devs = parse_list_page("<html><body></body></html>", &base()).unwrap();
        assert!(devs.is_empty());
    }
}
