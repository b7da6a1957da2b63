use log::{info, warn};

use crate::document::Document;
use crate::error::ScrapeError;
use crate::fetcher::PageFetcher;
use crate::models::SiteSummary;

const MISSING_TITLE: &str = "Not found title";
const MISSING_DESCRIPTION: &str = "Not found description";

/// Title and meta description of the site's root page, or `None` when the
/// page could not be fetched.
pub async fn extract_site_summary<F: PageFetcher>(fetcher: &F, base_url: &str) -> Option<SiteSummary> {
    let content = fetcher.fetch(base_url).await?;
    let document = Document::parse(&content);

    match summary_from_document(&document) {
        Ok(summary) => {
            info!("Site title: {:?}", summary.title);
            Some(summary)
        }
        Err(e) => {
            warn!("Could not read site summary from {}: {}", base_url, e);
            None
        }
    }
}

pub fn summary_from_document(document: &Document) -> Result<SiteSummary, ScrapeError> {
    let title = document
        .find("title")?
        .map(|node| node.text())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| MISSING_TITLE.to_string());

    let description = document
        .find(r#"meta[name="description"]"#)?
        .and_then(|node| node.attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());

    Ok(SiteSummary { title, description })
}
