use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("invalid date: day={day:?} month={month:?} year={year:?}")]
    InvalidDate {
        day: String,
        month: String,
        year: String,
    },

    #[error("figure #{index} has no image source")]
    MissingMediaSource { index: usize },

    #[error("invalid selector `{0}`")]
    Selector(String),
}
