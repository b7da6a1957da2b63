//! Thin query layer over `scraper`.
//!
//! `html5ever` builds a best-effort tree for any input, so parsing never
//! fails; only a malformed CSS query can.

use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(raw: &[u8]) -> Self {
        let source = String::from_utf8_lossy(raw);
        Document {
            html: Html::parse_document(&source),
        }
    }

    pub fn root(&self) -> Node<'_> {
        Node(self.html.root_element())
    }

    /// First element matching `css` anywhere in the document.
    pub fn find(&self, css: &str) -> Result<Option<Node<'_>>, ScrapeError> {
        self.root().find(css)
    }

    pub fn select(&self, css: &str) -> Result<Vec<Node<'_>>, ScrapeError> {
        self.root().select(css)
    }
}

#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    pub fn find(&self, css: &str) -> Result<Option<Node<'a>>, ScrapeError> {
        let selector = parse_selector(css)?;
        Ok(self.0.select(&selector).next().map(Node))
    }

    /// First `tag` element carrying `class` among its classes.
    pub fn find_with_class(&self, tag: &str, class: &str) -> Result<Option<Node<'a>>, ScrapeError> {
        self.find(&format!("{tag}.{class}"))
    }

    /// Every match in document order.
    pub fn select(&self, css: &str) -> Result<Vec<Node<'a>>, ScrapeError> {
        let selector = parse_selector(css)?;
        Ok(self.0.select(&selector).map(Node).collect())
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Concatenated descendant text with surrounding whitespace trimmed.
    pub fn text(&self) -> String {
        self.0.text().collect::<String>().trim().to_string()
    }
}

fn parse_selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css}: {e}")))
}
