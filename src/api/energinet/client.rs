use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use tracing::{debug, info};

use super::models::BalanceResponse;
use crate::utils::errors::PowerError;

/// Client for Energinet's public Energi Data Service API
pub struct EnerginetClient {
    http_client: HttpClient,
    base_url: String,
    timeout: Duration,
}

impl EnerginetClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.energidataservice.dk";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client against the public API with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Build the dataset URL for an inclusive date range.
    ///
    /// The API treats its `end` parameter as exclusive, so the requested end
    /// date is pushed one day forward to include all 24 hours of `end`.
    pub fn balance_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        let end_exclusive = end + chrono::Duration::days(1);
        format!(
            "{}/dataset/ElectricityBalanceNonv?start={}&end={}&sort=HourDK",
            self.base_url,
            start.format("%Y-%m-%d"),
            end_exclusive.format("%Y-%m-%d"),
        )
    }

    /// GET the hourly electricity balance records for `[start, end]`.
    ///
    /// One outbound request, no retries; transport errors and non-success
    /// statuses propagate to the caller.
    pub async fn fetch_balance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BalanceResponse, PowerError> {
        let url = self.balance_url(start, end);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PowerError::Api { status, body });
        }

        let parsed = response.json::<BalanceResponse>().await?;
        info!(
            "fetched {} records from Energi Data Service",
            parsed.records.len()
        );
        Ok(parsed)
    }
}

impl Default for EnerginetClient {
    fn default() -> Self {
        Self::new()
    }
}
