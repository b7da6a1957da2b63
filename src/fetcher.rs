use anyhow::Result;
use log::{debug, warn};
use reqwest::Client;

use crate::error::ScrapeError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13.5; rv:116.0) Gecko/20100101 Firefox/116.0";

/// Source of raw page bodies.
///
/// A failed fetch is logged by the implementation and reported as `None`;
/// callers skip the item and carry on.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        Ok(HttpFetcher { client })
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let fetch_error = |source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(fetch_error)?;
        let body = response.bytes().await.map_err(fetch_error)?;

        Ok(body.to_vec())
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        match self.try_fetch(url).await {
            Ok(body) => {
                debug!("Fetched {} bytes from {}", body.len(), url);
                Some(body)
            }
            Err(e) => {
                warn!("Error fetching {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::PageFetcher;

    /// Serves fixture pages from memory and records every requested URL.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages.get(url).map(|html| html.as_bytes().to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_yields_none() {
        let fetcher = HttpFetcher::new(None).unwrap();
        assert!(fetcher.fetch("http://127.0.0.1:1/listing").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_url_yields_none() {
        let fetcher = HttpFetcher::new(Some("xornal-test")).unwrap();
        assert!(fetcher.fetch("not a url").await.is_none());
    }

    #[tokio::test]
    async fn test_static_fetcher_serves_known_pages_only() {
        let fetcher = testing::StaticFetcher::new().with_page("https://a.test/", "<p>hi</p>");

        assert_eq!(fetcher.fetch("https://a.test/").await, Some(b"<p>hi</p>".to_vec()));
        assert!(fetcher.fetch("https://b.test/").await.is_none());
        assert_eq!(fetcher.requests(), vec!["https://a.test/", "https://b.test/"]);
    }
}
