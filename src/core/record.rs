use crate::core::rates::RateMapping;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One stored rate. At most one record exists per `(currency, timestamp)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateRecord {
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Rate")]
    pub rate: Decimal,
    #[serde(rename = "Timestamp")]
    pub timestamp: NaiveDate,
}

impl ExchangeRateRecord {
    /// Builds a record from a parsed float rate.
    ///
    /// The rate goes through its shortest decimal string so `1.0934` is stored as
    /// exactly `1.0934`, not the nearest binary value.
    pub fn from_rate(currency: &str, rate: f64, timestamp: NaiveDate) -> Result<Self> {
        let rate = Decimal::from_str(&rate.to_string())
            .with_context(|| format!("Rate {rate} for {currency} is not a valid decimal"))?;
        Ok(Self {
            currency: currency.to_string(),
            rate,
            timestamp,
        })
    }
}

/// Builds one record per currency, all sharing `timestamp`.
pub fn build_records(rates: &RateMapping, timestamp: NaiveDate) -> Result<Vec<ExchangeRateRecord>> {
    rates
        .iter()
        .map(|(currency, rate)| ExchangeRateRecord::from_rate(currency, rate, timestamp))
        .collect()
}
