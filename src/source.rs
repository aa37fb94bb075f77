// src/source.rs
use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Instant;

use crate::config::PollerConfig;
use crate::errors::{PollError, Result};
use crate::models::{NoticeBody, ResultsResponse};

/// Where the poller gets its snapshots from.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    /// Fetch the latest grading results.
    async fn fetch(&self) -> Result<ResultsResponse>;
}

/// Reads results from the challenge server's update endpoint.
pub struct HttpSource {
    client: Client,
    url: String,
    referer: Option<String>,
}

impl HttpSource {
    pub fn new(client: Client, url: impl Into<String>, referer: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            referer,
        }
    }

    /// Build a source with its own client, honouring the configured timeout.
    pub fn from_config(config: &PollerConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::new(client, config.update_url(), config.referer.clone()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ResultsSource for HttpSource {
    async fn fetch(&self) -> Result<ResultsResponse> {
        let mut request = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/json");
        if let Some(referer) = &self.referer {
            request = request.header(header::REFERER, referer);
        }

        let start = Instant::now();
        let resp = request.send().await?;
        let status = resp.status();
        log::debug!(
            "GET {} -> {} ({}ms)",
            self.url,
            status,
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(PollError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        parse_update_body(&bytes)
    }
}

/// Decode an update response body, turning the server's NOTICE reply into
/// an error rather than an empty snapshot.
pub fn parse_update_body(bytes: &[u8]) -> Result<ResultsResponse> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if let Ok(NoticeBody { notice }) = serde_json::from_value::<NoticeBody>(value.clone()) {
        return Err(PollError::Notice(notice));
    }
    Ok(serde_json::from_value(value)?)
}
