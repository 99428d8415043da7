//! The hourly power table and the column catalog

use std::collections::{BTreeMap, HashMap};
use chrono::{NaiveDate, NaiveDateTime};
use plotters::style::RGBColor;

use crate::utils::errors::PowerError;

pub const SOLAR_POWER: &str = "SolarPower";
pub const ONSHORE_WIND: &str = "OnshoreWindPower";
pub const OFFSHORE_WIND: &str = "OffshoreWindPower";
pub const FOSSIL_GAS: &str = "FossilGas";
pub const FOSSIL_HARD_COAL: &str = "FossilHardCoal";
pub const BIOMASS: &str = "Biomass";
pub const FOSSIL_OIL: &str = "FossilOil";
pub const WASTE: &str = "Waste";
pub const TOTAL_LOAD: &str = "TotalLoad";

/// Generation columns that can be stacked in a chart
pub const GENERATION_COLUMNS: [&str; 8] = [
    SOLAR_POWER,
    ONSHORE_WIND,
    OFFSHORE_WIND,
    FOSSIL_GAS,
    FOSSIL_HARD_COAL,
    BIOMASS,
    FOSSIL_OIL,
    WASTE,
];

/// Cross-border exchange series. Carried in the table but not yet plottable.
pub const EXCHANGE_COLUMNS: [&str; 4] = [
    "ExchangeGreatBritain",
    "ExchangeNordicCountries",
    "ExchangeContinent",
    "ExchangeGreatBelt",
];

/// Danish legend name for a generation column
pub fn danish_label(column: &str) -> Option<&'static str> {
    match column {
        SOLAR_POWER => Some("Sol"),
        ONSHORE_WIND => Some("Landvind"),
        OFFSHORE_WIND => Some("Havvind"),
        FOSSIL_GAS => Some("Gas"),
        FOSSIL_HARD_COAL => Some("Kul"),
        BIOMASS => Some("Biomasse"),
        FOSSIL_OIL => Some("Olie"),
        WASTE => Some("Affald"),
        _ => None,
    }
}

/// Fixed chart color per technology; grey for anything unrecognized
pub fn series_color(column: &str) -> RGBColor {
    match column {
        SOLAR_POWER => RGBColor(0xFD, 0xB8, 0x13),
        ONSHORE_WIND => RGBColor(0x00, 0xA0, 0xDC),
        OFFSHORE_WIND => RGBColor(0x2E, 0x8B, 0x57),
        FOSSIL_GAS => RGBColor(0xFF, 0x7F, 0x50),
        FOSSIL_HARD_COAL => RGBColor(0x80, 0x80, 0x80),
        BIOMASS => RGBColor(0x90, 0xEE, 0x90),
        FOSSIL_OIL => RGBColor(0x8B, 0x45, 0x13),
        WASTE => RGBColor(0x8B, 0x00, 0x00),
        _ => RGBColor(0xCC, 0xCC, 0xCC),
    }
}

/// Hourly power time series: one row per hour, one named column per series.
///
/// Timestamps are `HourDK` from the API (naive Danish local time), strictly
/// increasing and deduplicated. Values are MW; hours with no reported value
/// for a series hold 0.0. The table has no public mutators — scaling and
/// date filtering hand back a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerTable {
    timestamps: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl PowerTable {
    /// Build a table, checking the row-count and ordering invariants
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, PowerError> {
        if !timestamps.windows(2).all(|w| w[0] < w[1]) {
            return Err(PowerError::Malformed(
                "timestamps must be strictly increasing".to_string(),
            ));
        }
        for (name, values) in &columns {
            if values.len() != timestamps.len() {
                return Err(PowerError::Malformed(format!(
                    "column '{}' has {} values for {} timestamps",
                    name,
                    values.len(),
                    timestamps.len()
                )));
            }
        }
        Ok(PowerTable { timestamps, columns })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Values of a column, or `None` if the table has no such column
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Copy of the table restricted to the inclusive calendar-date window.
    /// `None` on either side leaves that side open.
    pub fn restricted(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PowerTable {
        let keep: Vec<usize> = self
            .timestamps
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                start.map_or(true, |s| t.date() >= s) && end.map_or(true, |e| t.date() <= e)
            })
            .map(|(i, _)| i)
            .collect();

        let timestamps = keep.iter().map(|&i| self.timestamps[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                (name.clone(), keep.iter().map(|&i| values[i]).collect())
            })
            .collect();

        PowerTable { timestamps, columns }
    }

    /// Copy of the table with the given columns multiplied by their factor.
    /// Columns without a factor keep their values; factors for columns the
    /// table does not have are ignored.
    pub fn scaled(&self, scale_factors: &HashMap<String, f64>) -> PowerTable {
        let mut columns = self.columns.clone();
        for (name, factor) in scale_factors {
            if let Some(values) = columns.get_mut(name) {
                for v in values.iter_mut() {
                    *v *= factor;
                }
            }
        }
        PowerTable {
            timestamps: self.timestamps.clone(),
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn hourly_timestamps(start: NaiveDate, hours: usize) -> Vec<NaiveDateTime> {
        let first = start.and_time(NaiveTime::MIN);
        (0..hours)
            .map(|h| first + chrono::Duration::hours(h as i64))
            .collect()
    }

    fn sample_table() -> PowerTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let timestamps = hourly_timestamps(start, 48);
        let mut columns = BTreeMap::new();
        columns.insert(
            SOLAR_POWER.to_string(),
            (0..48).map(|i| i as f64).collect::<Vec<_>>(),
        );
        columns.insert(TOTAL_LOAD.to_string(), vec![100.0; 48]);
        PowerTable::new(timestamps, columns).unwrap()
    }

    #[test]
    fn test_rejects_unsorted_timestamps() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut timestamps = hourly_timestamps(start, 3);
        timestamps.swap(0, 2);
        let result = PowerTable::new(timestamps, BTreeMap::new());
        assert!(matches!(result, Err(PowerError::Malformed(_))));
    }

    #[test]
    fn test_rejects_duplicate_timestamps() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut timestamps = hourly_timestamps(start, 3);
        timestamps[1] = timestamps[0];
        let result = PowerTable::new(timestamps, BTreeMap::new());
        assert!(matches!(result, Err(PowerError::Malformed(_))));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let timestamps = hourly_timestamps(start, 3);
        let mut columns = BTreeMap::new();
        columns.insert(SOLAR_POWER.to_string(), vec![1.0, 2.0]);
        let result = PowerTable::new(timestamps, columns);
        assert!(matches!(result, Err(PowerError::Malformed(_))));
    }

    #[test]
    fn test_restricted_full_extent_is_identity() {
        let table = sample_table();
        let filtered = table.restricted(
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
        );
        assert_eq!(filtered, table);
    }

    #[test]
    fn test_restricted_inclusive_window() {
        let table = sample_table();
        let day_two = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let filtered = table.restricted(Some(day_two), Some(day_two));
        assert_eq!(filtered.len(), 24);
        assert!(filtered.timestamps().iter().all(|t| t.date() == day_two));
        // Values travel with their rows
        assert_eq!(filtered.column(SOLAR_POWER).unwrap()[0], 24.0);
    }

    #[test]
    fn test_restricted_out_of_range_is_empty() {
        let table = sample_table();
        let filtered = table.restricted(
            Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_scaled_does_not_touch_original() {
        let table = sample_table();
        let mut factors = HashMap::new();
        factors.insert(SOLAR_POWER.to_string(), 2.0);
        let scaled = table.scaled(&factors);

        assert_eq!(scaled.column(SOLAR_POWER).unwrap()[10], 20.0);
        assert_eq!(table.column(SOLAR_POWER).unwrap()[10], 10.0);
        // Unscaled columns are copied as-is
        assert_eq!(scaled.column(TOTAL_LOAD).unwrap(), table.column(TOTAL_LOAD).unwrap());
    }

    #[test]
    fn test_scaled_ignores_unknown_column() {
        let table = sample_table();
        let mut factors = HashMap::new();
        factors.insert("NotAColumn".to_string(), 3.0);
        let scaled = table.scaled(&factors);
        assert_eq!(scaled, table);
    }

    #[test]
    fn test_danish_labels() {
        assert_eq!(danish_label(SOLAR_POWER), Some("Sol"));
        assert_eq!(danish_label(ONSHORE_WIND), Some("Landvind"));
        assert_eq!(danish_label("ExchangeGreatBelt"), None);
    }
}
