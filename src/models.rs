use chrono::{DateTime, Utc};
use serde::Serialize;

/// Every article on the site is attributed to the paper itself.
pub const AUTHOR: &str = "Xornal Vigo";

/// Name under which the site is registered with the website store.
pub const WEBSITE_NAME: &str = "xornalvigo";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub link: String,
    pub title: String,
    /// `YYYY-MM-DD 00:00:00`, or `None` when the page carries no usable date.
    pub publication_date: Option<String>,
    pub author: String,
    pub description: String,
    pub categories: Vec<String>,
    pub media: Vec<String>,
}

/// Day, month abbreviation and year exactly as they appear in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDateParts {
    pub day: String,
    pub month: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Website {
    pub name: String,
    pub link: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub inserted_at: DateTime<Utc>,
}

impl Website {
    pub fn new(link: &str, summary: Option<&SiteSummary>, inserted_at: DateTime<Utc>) -> Self {
        Website {
            name: WEBSITE_NAME.to_string(),
            link: link.to_string(),
            title: summary.map(|s| s.title.clone()),
            description: summary.map(|s| s.description.clone()),
            inserted_at,
        }
    }
}

/// An article tagged with the id of the website it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct WebsiteArticle {
    #[serde(flatten)]
    pub record: ArticleRecord,
    pub website_id: i64,
}

/// Wire shape handed to storage: `{"article": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleEnvelope {
    pub article: WebsiteArticle,
}

impl ArticleEnvelope {
    pub fn new(record: ArticleRecord, website_id: i64) -> Self {
        ArticleEnvelope {
            article: WebsiteArticle { record, website_id },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunOutput<'a> {
    pub website: &'a Website,
    pub results: &'a [ArticleEnvelope],
}
