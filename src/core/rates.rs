//! Rate mappings and day-over-day delta arithmetic

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

/// Currency code to rate, in insertion order.
///
/// Keys are unique: inserting an existing currency replaces its rate in place, so
/// the original position is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateMapping {
    entries: Vec<(String, f64)>,
}

impl RateMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, currency: impl Into<String>, rate: f64) {
        let currency = currency.into();
        match self.entries.iter_mut().find(|(c, _)| *c == currency) {
            Some(entry) => entry.1 = rate,
            None => self.entries.push((currency, rate)),
        }
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| c == currency)
            .map(|(_, rate)| *rate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(c, rate)| (c.as_str(), *rate))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RateMapping {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut mapping = RateMapping::new();
        for (currency, rate) in iter {
            mapping.insert(currency, rate);
        }
        mapping
    }
}

impl Serialize for RateMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (currency, rate) in &self.entries {
            map.serialize_entry(currency, rate)?;
        }
        map.end()
    }
}

/// What to do with a currency quoted today but absent from yesterday's data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPrevious {
    /// Treat yesterday's rate as 0, so the delta equals today's rate.
    #[default]
    Zero,
    /// Leave the currency out of the delta.
    Omit,
}

/// Today's rates together with their change since yesterday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaReport {
    pub present_rates: RateMapping,
    pub delta: RateMapping,
}

/// Computes `present - previous` for every currency in `present`.
///
/// Currencies only found in `previous` never appear in the result.
pub fn compute_delta(
    present: &RateMapping,
    previous: &RateMapping,
    missing: MissingPrevious,
) -> RateMapping {
    let mut delta = RateMapping::new();
    for (currency, rate) in present.iter() {
        match (previous.get(currency), missing) {
            (Some(prev), _) => delta.insert(currency, rate - prev),
            (None, MissingPrevious::Zero) => {
                debug!("No previous rate for {}, using 0", currency);
                delta.insert(currency, rate);
            }
            (None, MissingPrevious::Omit) => {
                warn!("No previous rate for {}, leaving it out of delta", currency);
            }
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_insert_keeps_order_and_overwrites() {
        let mut rates = RateMapping::new();
        rates.insert("USD", 1.0);
        rates.insert("JPY", 171.21);
        rates.insert("USD", 1.0934);

        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get("USD"), Some(1.0934));
        let order: Vec<&str> = rates.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec!["USD", "JPY"]);
    }

    #[test]
    fn test_delta_arithmetic() {
        let present: RateMapping = [("USD", 1.6), ("BGN", 1.9)].into_iter().collect();
        let previous: RateMapping = [("USD", 2.6), ("BGN", 3.045)].into_iter().collect();

        let delta = compute_delta(&present, &previous, MissingPrevious::Zero);

        assert_eq!(delta.len(), 2);
        assert!(approx_eq(delta.get("USD").unwrap(), -1.0));
        assert!(approx_eq(delta.get("BGN").unwrap(), -1.145));
    }

    #[test]
    fn test_delta_missing_previous_falls_back_to_zero() {
        let present: RateMapping = [("JPY", 171.21)].into_iter().collect();
        let previous = RateMapping::new();

        let delta = compute_delta(&present, &previous, MissingPrevious::Zero);

        assert_eq!(delta, present);
    }

    #[test]
    fn test_delta_missing_previous_omitted() {
        let present: RateMapping = [("JPY", 171.21), ("USD", 1.2)].into_iter().collect();
        let previous: RateMapping = [("USD", 1.0)].into_iter().collect();

        let delta = compute_delta(&present, &previous, MissingPrevious::Omit);

        assert_eq!(delta.len(), 1);
        assert!(delta.get("JPY").is_none());
        assert!(approx_eq(delta.get("USD").unwrap(), 0.2));
    }

    #[test]
    fn test_delta_ignores_currencies_only_in_previous() {
        let present: RateMapping = [("USD", 1.1)].into_iter().collect();
        let previous: RateMapping = [("USD", 1.0), ("GBP", 0.85)].into_iter().collect();

        let delta = compute_delta(&present, &previous, MissingPrevious::Zero);

        assert_eq!(delta.len(), 1);
        assert!(delta.get("GBP").is_none());
    }

    #[test]
    fn test_report_serializes_in_insertion_order() {
        let report = DeltaReport {
            present_rates: [("USD", 1.5), ("BGN", 2.0)].into_iter().collect(),
            delta: [("USD", 0.5), ("BGN", -0.25)].into_iter().collect(),
        };

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"present_rates":{"USD":1.5,"BGN":2.0},"delta":{"USD":0.5,"BGN":-0.25}}"#
        );
    }

    #[test]
    fn test_missing_previous_deserialization() {
        let zero: MissingPrevious = serde_yaml::from_str("zero").unwrap();
        let omit: MissingPrevious = serde_yaml::from_str("omit").unwrap();
        assert_eq!(zero, MissingPrevious::Zero);
        assert_eq!(omit, MissingPrevious::Omit);
        assert_eq!(MissingPrevious::default(), MissingPrevious::Zero);
    }
}
