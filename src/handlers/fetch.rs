use crate::core::feed::parse_xml_exchange_rates;
use crate::core::record::build_records;
use crate::core::{BatchWriter, FeedSource, HandlerResponse, RateTable};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub const SUCCESS_MESSAGE: &str = "Exchange rates obtained and stored successfully.";

/// Ingestion handler: downloads the feed and stores one record per currency.
pub struct RateFetcher {
    source: Arc<dyn FeedSource>,
    table: Arc<dyn RateTable>,
}

impl RateFetcher {
    pub fn new(source: Arc<dyn FeedSource>, table: Arc<dyn RateTable>) -> Self {
        Self { source, table }
    }

    /// Runs one ingestion for the current UTC date. The event is not inspected.
    pub async fn handle(&self, _event: &Value) -> Result<HandlerResponse> {
        // One date for the whole run, even if it straddles midnight
        let today = Utc::now().date_naive();
        self.ingest(today).await?;
        Ok(HandlerResponse::ok(serde_json::to_string(SUCCESS_MESSAGE)?))
    }

    /// Fetches, parses and stores the feed under `timestamp`. Returns the number of
    /// records written.
    pub async fn ingest(&self, timestamp: NaiveDate) -> Result<usize> {
        let xml = self.source.fetch_feed().await?;
        let rates = parse_xml_exchange_rates(&xml)?;
        let records = build_records(&rates, timestamp)?;

        let mut writer = BatchWriter::new(self.table.as_ref());
        for record in records {
            writer.put_item(record).await?;
        }
        let written = writer.finish().await?;

        info!("Stored {} exchange rates for {}", written, timestamp);
        Ok(written)
    }
}
