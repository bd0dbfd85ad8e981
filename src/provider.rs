//! The seam between the conversion engine and the remote rate-lookup API.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::RateError;

/// Per-request deadline; expiry aborts the underlying call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Rates keyed by date, each date carrying a code -> rate map.
pub type RateSeries = BTreeMap<NaiveDate, BTreeMap<String, f64>>;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the supported currency codes mapped to display names.
    async fn fetch_currencies(&self) -> Result<BTreeMap<String, String>, RateError>;

    /// Converts `amount` from one currency to another, returning the
    /// converted amount.
    async fn fetch_latest(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateError>;

    /// Fetches daily rates for the pair over an inclusive date range.
    async fn fetch_timeseries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        from: &str,
        to: &str,
    ) -> Result<RateSeries, RateError>;
}
