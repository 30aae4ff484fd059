use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::external::workbook_source::{document_url, FetchError, WorkbookSource};

/// Downloads the published workbook over HTTP(S).
pub struct HttpWorkbookSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkbookSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network {
                url: base_url.clone(),
                message: format!("failed to build http client: {}", e),
            })?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl WorkbookSource for HttpWorkbookSource {
    fn locate(&self, date: NaiveDate) -> String {
        document_url(&self.base_url, date)
    }

    async fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError> {
        let url = self.locate(date);
        let parsed = url::Url::parse(&url).map_err(|e| FetchError::InvalidUrl {
            url: url.clone(),
            message: e.to_string(),
        })?;

        info!("📥 Downloading price workbook from {}", url);

        let resp = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| classify(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| classify(&url, e))?;
        debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}

fn classify(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout { url: url.to_string() }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
