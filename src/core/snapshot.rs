//! Rate payloads as returned by the provider.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use std::fmt;

/// Currency codes mapped to rate text, in the order the provider sent them.
///
/// Rates are kept as text so the unit-rate string shows exactly what the
/// provider returned. JSON numbers keep their JSON spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTable {
    entries: Vec<(String, String)>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rate, replacing an existing entry in place.
    pub fn insert(&mut self, code: impl Into<String>, rate: impl Into<String>) {
        let code = code.into();
        let rate = rate.into();
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some(entry) => entry.1 = rate,
            None => self.entries.push((code, rate)),
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, rate)| rate.as_str())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, rate)| (code.as_str(), rate.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Into<String>, R: Into<String>> FromIterator<(C, R)> for RateTable {
    fn from_iter<T: IntoIterator<Item = (C, R)>>(iter: T) -> Self {
        let mut table = RateTable::new();
        for (code, rate) in iter {
            table.insert(code, rate);
        }
        table
    }
}

/// A `null` rate is kept as the text `null`, which no conversion accepts.
#[derive(Deserialize)]
#[serde(untagged)]
enum RateValue {
    Number(serde_json::Number),
    Text(String),
    Null,
}

impl From<RateValue> for String {
    fn from(value: RateValue) -> Self {
        match value {
            RateValue::Number(n) => n.to_string(),
            RateValue::Text(s) => s,
            RateValue::Null => "null".to_string(),
        }
    }
}

struct RateTableVisitor;

impl<'de> Visitor<'de> for RateTableVisitor {
    type Value = RateTable;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping currency codes to rates")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut table = RateTable::new();
        while let Some((code, rate)) = map.next_entry::<String, RateValue>()? {
            table.insert(code, rate);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RateTableVisitor)
    }
}

/// One answer from the `latest/{code}` endpoint.
///
/// Only `result` drives control flow. The other fields are read leniently:
/// a `conversion_rates` that is not an object counts as absent, and an
/// unusable timestamp is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RateSnapshot {
    #[serde(default)]
    pub result: String,
    #[serde(rename = "base-code", alias = "base_code", default)]
    pub base_code: String,
    #[serde(default, deserialize_with = "rates_or_none")]
    pub conversion_rates: Option<RateTable>,
    #[serde(
        rename = "time_last_update_unix",
        default,
        deserialize_with = "unix_timestamp"
    )]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(rename = "error-type", default)]
    pub error_type: Option<String>,
}

impl RateSnapshot {
    pub fn is_error(&self) -> bool {
        self.result == "error"
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.conversion_rates.as_ref()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn valid(self) -> Option<T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Other(_) => None,
        }
    }
}

fn rates_or_none<'de, D>(deserializer: D) -> Result<Option<RateTable>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Lenient::<RateTable>::deserialize(deserializer)?.valid())
}

fn unix_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = Lenient::<i64>::deserialize(deserializer)?.valid();
    Ok(secs.and_then(|secs| Utc.timestamp_opt(secs, 0).single()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table_keeps_provider_order() {
        let json = r#"{"USD": 1, "BRL": "5.00", "EUR": 0.9, "AED": 3.6725}"#;
        let table: RateTable = serde_json::from_str(json).unwrap();
        let codes: Vec<&str> = table.codes().collect();
        assert_eq!(codes, vec!["USD", "BRL", "EUR", "AED"]);
        assert_eq!(table.get("USD"), Some("1"));
        assert_eq!(table.get("BRL"), Some("5.00"));
        assert_eq!(table.get("EUR"), Some("0.9"));
        assert_eq!(table.get("JPY"), None);
    }

    #[test]
    fn test_rate_table_rejects_non_object() {
        let result: Result<RateTable, _> = serde_json::from_str(r#"["USD"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table: RateTable = [("USD", "1"), ("BRL", "5.00")].into_iter().collect();
        table.insert("USD", "1.0");
        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().next(), Some(("USD", "1.0")));
    }

    #[test]
    fn test_snapshot_deserialization() {
        let json = r#"{
            "result": "success",
            "base-code": "USD",
            "time_last_update_unix": 1585267200,
            "conversion_rates": {"USD": 1, "BRL": 5.0}
        }"#;
        let snapshot: RateSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.result, "success");
        assert_eq!(snapshot.base_code, "USD");
        assert!(!snapshot.is_error());
        assert_eq!(snapshot.rates().map(RateTable::len), Some(2));
        assert_eq!(
            snapshot.last_updated.map(|t| t.timestamp()),
            Some(1585267200)
        );
    }

    #[test]
    fn test_error_snapshot_deserialization() {
        let json = r#"{"result": "error", "error-type": "invalid-key"}"#;
        let snapshot: RateSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.is_error());
        assert_eq!(snapshot.error_type.as_deref(), Some("invalid-key"));
        assert!(snapshot.conversion_rates.is_none());
    }

    #[test]
    fn test_non_object_rates_count_as_absent() {
        for rates in ["false", "0", "\"\"", "null", "[1]", "{\"USD\": true}"] {
            let json = format!(r#"{{"result": "success", "conversion_rates": {rates}}}"#);
            let snapshot: RateSnapshot = serde_json::from_str(&json).unwrap();
            assert!(snapshot.conversion_rates.is_none(), "{rates}");
            assert_eq!(snapshot.result, "success");
        }
    }

    #[test]
    fn test_null_rate_is_kept_as_text() {
        let table: RateTable = serde_json::from_str(r#"{"USD": 1, "XDR": null}"#).unwrap();
        assert_eq!(table.codes().collect::<Vec<_>>(), vec!["USD", "XDR"]);
        assert_eq!(table.get("XDR"), Some("null"));
    }

    #[test]
    fn test_unusable_timestamp_is_dropped() {
        for stamp in ["1.5", "\"yesterday\"", "null", "9223372036854775807"] {
            let json = format!(
                r#"{{"result": "success", "time_last_update_unix": {stamp}, "conversion_rates": {{"USD": 1}}}}"#
            );
            let snapshot: RateSnapshot = serde_json::from_str(&json).unwrap();
            assert!(snapshot.last_updated.is_none(), "{stamp}");
            assert_eq!(snapshot.rates().map(RateTable::len), Some(1));
        }
    }
}
