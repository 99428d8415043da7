use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::api::energinet::{BalanceRecord, EnerginetClient};
use crate::models::PowerTable;
use crate::utils::errors::PowerError;

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(value: &str) -> Result<NaiveDate, PowerError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        PowerError::InvalidRange(format!("'{}' is not a valid YYYY-MM-DD date: {}", value, e))
    })
}

/// Parse and validate an inclusive date range
pub fn parse_date_range(
    start_date: &str,
    end_date: &str,
) -> Result<(NaiveDate, NaiveDate), PowerError> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if end < start {
        return Err(PowerError::InvalidRange(format!(
            "end date '{}' precedes start date '{}'",
            end_date, start_date
        )));
    }
    Ok((start, end))
}

/// Fetch hourly balance data for `[start_date, end_date]` and pivot it into
/// a [`PowerTable`].
///
/// One network round trip; dates must be `YYYY-MM-DD` with end not before
/// start. Hours are keyed by `HourDK`, the DK1/DK2 price areas are summed
/// per series, and missing or `null` values count as zero.
pub async fn load_power_data(
    client: &EnerginetClient,
    start_date: &str,
    end_date: &str,
) -> Result<PowerTable, PowerError> {
    let (start, end) = parse_date_range(start_date, end_date)?;
    let response = client.fetch_balance(start, end).await?;
    info!("pivoting {} balance records", response.records.len());
    pivot_records(&response.records)
}

/// Pivot record-oriented rows into one column per series, joined on hour.
///
/// Every series name seen anywhere in the input becomes a column covering
/// the whole table, so unrecognized series from the API pass through.
pub fn pivot_records(records: &[BalanceRecord]) -> Result<PowerTable, PowerError> {
    let mut hours: BTreeMap<NaiveDateTime, BTreeMap<String, f64>> = BTreeMap::new();
    let mut names: BTreeSet<String> = BTreeSet::new();

    for record in records {
        let hour = parse_hour(&record.hour_dk)?;
        let row = hours.entry(hour).or_default();
        for (name, value) in &record.series {
            *row.entry(name.clone()).or_insert(0.0) += value.unwrap_or(0.0);
            names.insert(name.clone());
        }
    }

    let timestamps: Vec<NaiveDateTime> = hours.keys().copied().collect();
    let columns: BTreeMap<String, Vec<f64>> = names
        .into_iter()
        .map(|name| {
            let values = hours
                .values()
                .map(|row| row.get(&name).copied().unwrap_or(0.0))
                .collect();
            (name, values)
        })
        .collect();

    PowerTable::new(timestamps, columns)
}

fn parse_hour(raw: &str) -> Result<NaiveDateTime, PowerError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| PowerError::Malformed(format!("unexpected hour timestamp '{}': {}", raw, e)))
}
