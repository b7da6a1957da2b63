use std::fmt;

use log::{info, warn};

use crate::dates::MonthTable;
use crate::error::ScrapeError;
use crate::extractor::{ArticleExtractor, MediaPolicy};
use crate::fetcher::PageFetcher;
use crate::listing::discover_links;
use crate::models::{ArticleEnvelope, ArticleRecord, SiteSummary};
use crate::site::extract_site_summary;

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Site root, read once for the site summary.
    pub base_url: String,
    /// Listing page that article links are discovered from.
    pub listing_url: String,
    pub months: MonthTable,
    pub media_policy: MediaPolicy,
}

#[derive(Debug)]
pub enum RunWarning {
    SiteSummaryUnavailable { url: String },
    ArticleUnreachable { url: String },
    ArticleFailed { url: String, error: ScrapeError },
    NoArticlesFound,
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::SiteSummaryUnavailable { url } => {
                write!(f, "site summary unavailable, {url} could not be fetched")
            }
            RunWarning::ArticleUnreachable { url } => write!(f, "skipped {url}: page could not be fetched"),
            RunWarning::ArticleFailed { url, error } => write!(f, "skipped {url}: {error}"),
            RunWarning::NoArticlesFound => write!(f, "no articles were found"),
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    pub site: Option<SiteSummary>,
    pub links: Vec<String>,
    pub records: Vec<ArticleRecord>,
    pub warnings: Vec<RunWarning>,
}

impl RunReport {
    /// Consumes the report's records, tagging each with `website_id`.
    pub fn into_envelopes(self, website_id: i64) -> Vec<ArticleEnvelope> {
        self.records
            .into_iter()
            .map(|record| ArticleEnvelope::new(record, website_id))
            .collect()
    }
}

/// Runs site summary, link discovery and article extraction in sequence,
/// one fetch at a time.
pub struct Crawler<F> {
    fetcher: F,
    base_url: String,
    listing_url: String,
    extractor: ArticleExtractor,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, settings: CrawlSettings) -> Self {
        Crawler {
            fetcher,
            base_url: settings.base_url,
            listing_url: settings.listing_url,
            extractor: ArticleExtractor::new(settings.months, settings.media_policy),
        }
    }

    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();

        info!("Extracting title and description data from {}", self.base_url);
        report.site = extract_site_summary(&self.fetcher, &self.base_url).await;
        if report.site.is_none() {
            let warning = RunWarning::SiteSummaryUnavailable {
                url: self.base_url.clone(),
            };
            warn!("{}", warning);
            report.warnings.push(warning);
        }

        info!("Discovering article links on {}", self.listing_url);
        report.links = discover_links(&self.fetcher, &self.listing_url).await;

        info!("Extracting {} articles", report.links.len());
        for url in &report.links {
            match self.extractor.extract(&self.fetcher, url).await {
                Ok(Some(record)) => report.records.push(record),
                Ok(None) => {
                    let warning = RunWarning::ArticleUnreachable { url: url.clone() };
                    warn!("{}", warning);
                    report.warnings.push(warning);
                }
                Err(error) => {
                    let warning = RunWarning::ArticleFailed {
                        url: url.clone(),
                        error,
                    };
                    warn!("{}", warning);
                    report.warnings.push(warning);
                }
            }
        }

        if report.records.is_empty() {
            warn!("No articles were found.");
            report.warnings.push(RunWarning::NoArticlesFound);
        } else {
            info!("Processed {} results.", report.records.len());
        }

        report
    }
}
