use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("bad response from {url}: HTTP {status}")]
    BadStatus { url: String, status: u16 },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Network { url, .. }
            | FetchError::Timeout { url }
            | FetchError::BadStatus { url, .. } => url,
        }
    }
}

/// Where the daily price workbook comes from.
#[async_trait]
pub trait WorkbookSource: Send + Sync {
    /// URL (or other locator) used for `date`, for logging.
    fn locate(&self, date: NaiveDate) -> String;

    async fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError>;
}

/// `yasai{month}-{day}.xlsx`, no zero padding.
pub fn document_name(date: NaiveDate) -> String {
    format!("yasai{}-{}.xlsx", date.month(), date.day())
}

pub fn document_url(base_url: &str, date: NaiveDate) -> String {
    format!("{}{}", base_url, document_name(date))
}
