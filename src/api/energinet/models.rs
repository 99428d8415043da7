use std::collections::BTreeMap;
use serde::Deserialize;

/// Top-level response from a dataset endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub total: Option<u64>,
    pub records: Vec<BalanceRecord>,
}

/// One record: a single hour in a single price area (DK1 or DK2).
///
/// Every series the API reports lands in `series` keyed by its column name,
/// so new series added upstream pass through without code changes. A `null`
/// value deserializes to `None` and is counted as zero when pivoting.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRecord {
    #[serde(rename = "HourUTC")]
    pub hour_utc: Option<String>,
    #[serde(rename = "HourDK")]
    pub hour_dk: String,
    #[serde(rename = "PriceArea")]
    pub price_area: Option<String>,
    #[serde(flatten)]
    pub series: BTreeMap<String, Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_with_flattened_series() {
        let json = r#"{
            "HourUTC": "2024-01-01T11:00:00",
            "HourDK": "2024-01-01T12:00:00",
            "PriceArea": "DK1",
            "SolarPower": 120.5,
            "OnshoreWindPower": null,
            "SomeFutureSeries": 7.0
        }"#;
        let record: BalanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.hour_dk, "2024-01-01T12:00:00");
        assert_eq!(record.hour_utc.as_deref(), Some("2024-01-01T11:00:00"));
        assert_eq!(record.price_area.as_deref(), Some("DK1"));
        assert_eq!(record.series.get("SolarPower"), Some(&Some(120.5)));
        assert_eq!(record.series.get("OnshoreWindPower"), Some(&None));
        assert_eq!(record.series.get("SomeFutureSeries"), Some(&Some(7.0)));
        assert!(!record.series.contains_key("HourDK"));
    }
}
