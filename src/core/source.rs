//! Feed download abstraction

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Returns the raw feed document.
    async fn fetch_feed(&self) -> Result<String>;
}
