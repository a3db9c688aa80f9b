//! Parsing of the ECB `eurofxref-daily.xml` reference-rate feed.
//!
//! The feed nests rates two levels deep under the envelope:
//! `Cube > Cube[time] > Cube[currency, rate]`. EUR is the implicit base and never
//! appears in the feed, so it is not added here either.

use crate::core::rates::RateMapping;
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Cube")]
    cube: OuterCube,
}

#[derive(Debug, Deserialize)]
struct OuterCube {
    #[serde(rename = "Cube", default)]
    days: Vec<DayCube>,
}

#[derive(Debug, Deserialize)]
struct DayCube {
    #[serde(rename = "@time")]
    time: Option<String>,
    #[serde(rename = "Cube", default)]
    rates: Vec<RateCube>,
}

#[derive(Debug, Deserialize)]
struct RateCube {
    #[serde(rename = "@currency")]
    currency: String,
    #[serde(rename = "@rate")]
    rate: String,
}

/// Extracts currency rates from a daily feed document.
///
/// Every `Cube[time]` directly under the outer `Cube` is walked; the daily feed
/// only ever carries one.
pub fn parse_xml_exchange_rates(xml: &str) -> Result<RateMapping> {
    let envelope: Envelope =
        quick_xml::de::from_str(xml).context("Failed to parse exchange rate feed")?;

    let mut rates = RateMapping::new();
    for day in envelope.cube.days {
        debug!(
            "Reading {} rates for {}",
            day.rates.len(),
            day.time.as_deref().unwrap_or("unknown date")
        );
        for cube in day.rates {
            let rate: f64 = cube.rate.trim().parse().with_context(|| {
                format!("Invalid rate '{}' for currency {}", cube.rate, cube.currency)
            })?;
            rates.insert(cube.currency, rate);
        }
    }

    Ok(rates)
}

#[cfg(test)]
pub(crate) const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gesmes:Envelope xmlns:gesmes="http://www.gesmes.org/xml/2002-08-01" xmlns="http://www.ecb.int/vocabulary/2002-08-01/eurofxref">
    <gesmes:subject>Reference rates</gesmes:subject>
    <gesmes:Sender>
        <gesmes:name>European Central Bank</gesmes:name>
    </gesmes:Sender>
    <Cube>
        <Cube time="2024-07-17">
            <Cube currency="USD" rate="1.0934"/>
            <Cube currency="JPY" rate="171.21"/>
            <Cube currency="BGN" rate="1.9558"/>
            <!-- More currencies here -->
        </Cube>
    </Cube>
</gesmes:Envelope>"#;
