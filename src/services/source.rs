// src/services/source.rs

//! Source client: one GET against the configured trends page.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::SourceConfig;
use crate::utils::http::{create_async_client, fetch_text};

/// Anything that can hand back the raw trends page.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Fetch the raw markup. Transport errors and non-2xx statuses fail.
    async fn fetch(&self) -> Result<String>;

    /// Page address, used for logging and link resolution.
    fn url(&self) -> &str;
}

/// HTTP source backed by `reqwest`.
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Create a source with a browser-like User-Agent and the configured timeout.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl TrendSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        log::debug!("GET {}", self.url);
        let body = fetch_text(&self.client, &self.url).await?;
        log::debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body)
    }

    fn url(&self) -> &str {
        &self.url
    }
}
