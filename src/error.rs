use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Couldn't fetch page {page}: {source}")]
    Fetch {
        page: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("Page {page} responded with status {status}")]
    HttpStatus { page: u32, status: StatusCode },

    #[error("Invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Cookie file is not valid JSON: {0}")]
    CookieJson(#[from] serde_json::Error),
}

impl Error {
    /// The page number a transport failure happened on, if this is one.
    pub fn failed_page(&self) -> Option<u32> {
        match self {
            Error::Fetch { page, .. } | Error::HttpStatus { page, .. } => Some(*page),
            _ => None,
        }
    }
}
