use log::{debug, error, info};
use url::Url;

use crate::document::Document;
use crate::error::ScrapeError;
use crate::fetcher::PageFetcher;

/// Article links on the listing page are the anchors inside `<h2>` headings.
const ARTICLE_LINK_SELECTOR: &str = "h2 a";

/// Fetches the listing page and returns its article URLs in document order.
///
/// An unreachable listing page yields no links rather than an error.
pub async fn discover_links<F: PageFetcher>(fetcher: &F, listing_url: &str) -> Vec<String> {
    let Some(content) = fetcher.fetch(listing_url).await else {
        return Vec::new();
    };

    let document = Document::parse(&content);
    let base = Url::parse(listing_url).ok();

    match links_from_document(&document, base.as_ref()) {
        Ok(links) => {
            info!("Discovered {} article links on {}", links.len(), listing_url);
            links
        }
        Err(e) => {
            error!("Could not read links from {}: {}", listing_url, e);
            Vec::new()
        }
    }
}

/// Resolves every heading anchor's `href` against `base` when one is given.
/// Duplicates are kept.
pub fn links_from_document(document: &Document, base: Option<&Url>) -> Result<Vec<String>, ScrapeError> {
    let mut links = Vec::new();

    for anchor in document.select(ARTICLE_LINK_SELECTOR)? {
        let Some(href) = anchor.attr("href").map(str::trim) else {
            debug!("Skipping heading anchor without href: {:?}", anchor.text());
            continue;
        };

        let link = match base.map(|b| b.join(href)) {
            Some(Ok(resolved)) => resolved.to_string(),
            _ => href.to_string(),
        };
        links.push(link);
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::StaticFetcher;

    const LISTING: &str = r#"
        <html><body>
          <h2 class="entry"><a href="https://xornal.test/b">B</a></h2>
          <p><a href="https://xornal.test/ignored">not a heading</a></p>
          <h2><span><a href="https://xornal.test/a">A</a></span></h2>
          <h3><a href="https://xornal.test/h3">h3</a></h3>
          <h2><a>no href</a></h2>
          <h2><a href="/relative/c">C</a></h2>
          <h2><a href="https://xornal.test/b">B again</a></h2>
        </body></html>"#;

    #[tokio::test]
    async fn test_discover_links_in_document_order() {
        let fetcher = StaticFetcher::new().with_page("https://xornal.test/news", LISTING);
        let links = discover_links(&fetcher, "https://xornal.test/news").await;

        assert_eq!(
            links,
            vec![
                "https://xornal.test/b",
                "https://xornal.test/a",
                "https://xornal.test/relative/c",
                "https://xornal.test/b",
            ]
        );
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_listing_fetch_yields_no_links() {
        let fetcher = StaticFetcher::new();
        assert!(discover_links(&fetcher, "https://xornal.test/news").await.is_empty());
    }

    #[test]
    fn test_without_base_hrefs_are_kept_verbatim() {
        let document = Document::parse(br#"<h2><a href="/x">x</a></h2>"#);
        assert_eq!(links_from_document(&document, None).unwrap(), vec!["/x"]);
    }

    #[test]
    fn test_page_without_headings_has_no_links() {
        let document = Document::parse(b"<p>nothing here</p>");
        assert!(links_from_document(&document, None).unwrap().is_empty());
    }
}
