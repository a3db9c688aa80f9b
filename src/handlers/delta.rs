use crate::core::rates::compute_delta;
use crate::core::{
    DeltaReport, HandlerResponse, KeyCondition, MissingPrevious, RateMapping, RateTable,
};
use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Reads every stored rate for `date` through the timestamp index.
pub async fn get_rates_by_date(
    table: &dyn RateTable,
    index: &str,
    date: NaiveDate,
) -> Result<RateMapping> {
    let items = table
        .query(index, KeyCondition::TimestampEq(date))
        .await
        .with_context(|| format!("Failed to query rates for {date}"))?;

    let mut rates = RateMapping::new();
    for item in items {
        let rate: f64 = item.rate.to_string().parse().with_context(|| {
            format!("Rate {} for {} does not fit a float", item.rate, item.currency)
        })?;
        rates.insert(item.currency, rate);
    }
    debug!("Loaded {} rates for {}", rates.len(), date);
    Ok(rates)
}

/// Query handler: reports today's rates and their change since yesterday.
pub struct DeltaCalculator {
    table: Arc<dyn RateTable>,
    index: String,
    missing_previous: MissingPrevious,
}

impl DeltaCalculator {
    pub fn new(table: Arc<dyn RateTable>, index: &str, missing_previous: MissingPrevious) -> Self {
        Self {
            table,
            index: index.to_string(),
            missing_previous,
        }
    }

    /// Computes the report for the current UTC date. The event is not inspected.
    pub async fn handle(&self, _event: &Value) -> Result<HandlerResponse> {
        let report = self.calculate(Utc::now().date_naive()).await?;
        Ok(HandlerResponse::ok(serde_json::to_string(&report)?))
    }

    pub async fn calculate(&self, today: NaiveDate) -> Result<DeltaReport> {
        let yesterday = today
            .checked_sub_days(Days::new(1))
            .with_context(|| format!("Can't get previous date for {today}"))?;

        let present_rates = get_rates_by_date(self.table.as_ref(), &self.index, today).await?;
        let previous_rates = get_rates_by_date(self.table.as_ref(), &self.index, yesterday).await?;
        let delta = compute_delta(&present_rates, &previous_rates, self.missing_previous);

        info!(
            "Computed delta for {} currencies between {} and {}",
            delta.len(),
            yesterday,
            today
        );
        Ok(DeltaReport {
            present_rates,
            delta,
        })
    }
}
