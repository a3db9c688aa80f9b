use crate::core::FeedSource;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::debug;

/// Downloads the daily reference-rate feed published by the European Central Bank.
pub struct EcbFeedProvider {
    url: String,
}

impl EcbFeedProvider {
    pub fn new(url: &str) -> Self {
        EcbFeedProvider {
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl FeedSource for EcbFeedProvider {
    async fn fetch_feed(&self) -> Result<String> {
        debug!("Requesting exchange rate feed from {}", self.url);

        let client = reqwest::Client::builder()
            .user_agent("ratedelta/0.1")
            .build()?;
        let response = client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Failed to download feed from {}: {}", self.url, status);
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read feed from {}", self.url))?;
        debug!("Received {} bytes of feed data", text.len());

        Ok(text)
    }
}
