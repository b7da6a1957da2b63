use log::{debug, info, warn};

use crate::dates::MonthTable;
use crate::document::{Document, Node};
use crate::error::ScrapeError;
use crate::fetcher::PageFetcher;
use crate::models::{AUTHOR, ArticleRecord, RawDateParts};

/// What to do with a `<figure>` that has no `<img src>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaPolicy {
    /// Drop that media entry and keep the article.
    #[default]
    Lenient,
    /// Fail the whole article with [`ScrapeError::MissingMediaSource`].
    Strict,
}

/// Turns one article page into an [`ArticleRecord`].
///
/// Field policies:
/// - container `article.post` and title `h1.title`: required
/// - date block `div.dateText`: optional, unusable dates become `None`
/// - body `div.content`: optional, empty description when absent
/// - `figure img[src]`: see [`MediaPolicy`]
/// - category list `ul.categories`: optional, empty when absent
#[derive(Debug, Clone, Default)]
pub struct ArticleExtractor {
    months: MonthTable,
    media_policy: MediaPolicy,
}

impl ArticleExtractor {
    pub fn new(months: MonthTable, media_policy: MediaPolicy) -> Self {
        ArticleExtractor { months, media_policy }
    }

    /// Fetches and parses `url`. `Ok(None)` means the page could not be
    /// fetched and the article should be skipped.
    pub async fn extract<F: PageFetcher>(&self, fetcher: &F, url: &str) -> Result<Option<ArticleRecord>, ScrapeError> {
        let Some(content) = fetcher.fetch(url).await else {
            return Ok(None);
        };

        let document = Document::parse(&content);
        let record = self.parse(url, &document)?;
        info!("Successfully scraped article: {}", url);

        Ok(Some(record))
    }

    pub fn parse(&self, url: &str, document: &Document) -> Result<ArticleRecord, ScrapeError> {
        let article = document
            .root()
            .find_with_class("article", "post")?
            .ok_or(ScrapeError::MissingRequiredField("article container"))?;

        let title = article
            .find_with_class("h1", "title")?
            .map(|node| node.text())
            .filter(|text| !text.is_empty())
            .ok_or(ScrapeError::MissingRequiredField("title"))?;

        let publication_date = self.publication_date(url, article)?;

        let description = match article.find_with_class("div", "content")? {
            Some(body) => body
                .select("p")?
                .iter()
                .map(|p| p.text())
                .collect::<Vec<_>>()
                .join(" "),
            None => String::new(),
        };

        let media = self.media(url, article)?;

        let categories = match article.find_with_class("ul", "categories")? {
            Some(list) => list.select("a")?.iter().map(|a| a.text()).collect(),
            None => Vec::new(),
        };

        Ok(ArticleRecord {
            link: url.to_string(),
            title,
            publication_date,
            author: AUTHOR.to_string(),
            description,
            categories,
            media,
        })
    }

    fn publication_date(&self, url: &str, article: Node<'_>) -> Result<Option<String>, ScrapeError> {
        let Some(block) = article.find_with_class("div", "dateText")? else {
            return Ok(None);
        };

        let Some(parts) = date_parts(block)? else {
            warn!("Incomplete date block in {}, leaving publication date empty", url);
            return Ok(None);
        };

        match self.months.normalize(&parts) {
            Ok(timestamp) => Ok(Some(timestamp)),
            Err(e) => {
                warn!("{} in {}, leaving publication date empty", e, url);
                Ok(None)
            }
        }
    }

    fn media(&self, url: &str, article: Node<'_>) -> Result<Vec<String>, ScrapeError> {
        let mut media = Vec::new();

        for (index, figure) in article.select("figure")?.into_iter().enumerate() {
            let src = figure.find("img")?.and_then(|img| img.attr("src"));
            match (src, self.media_policy) {
                (Some(src), _) => media.push(src.to_string()),
                (None, MediaPolicy::Strict) => return Err(ScrapeError::MissingMediaSource { index }),
                (None, MediaPolicy::Lenient) => {
                    debug!("Skipping figure #{} without image source in {}", index, url)
                }
            }
        }

        Ok(media)
    }
}

fn date_parts(block: Node<'_>) -> Result<Option<RawDateParts>, ScrapeError> {
    let part = |class: &str| -> Result<Option<String>, ScrapeError> {
        Ok(block.find_with_class("span", class)?.map(|node| node.text()))
    };

    let (Some(day), Some(month), Some(year)) = (part("dayMonth")?, part("month")?, part("year")?) else {
        return Ok(None);
    };

    Ok(Some(RawDateParts { day, month, year }))
}
