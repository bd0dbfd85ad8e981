use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::RateError;
use crate::provider::{RateProvider, RateSeries};

// FrankfurterProvider implementation for RateProvider
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .user_agent("ratewise/0.1")
            .build()?;
        Ok(FrankfurterProvider {
            base_url: base_url.to_string(),
            client,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RateError> {
        debug!("Requesting rate data from {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| RateError::Unknown(e.to_string()))
    }
}

fn classify_status(status: StatusCode) -> RateError {
    match status.as_u16() {
        429 => RateError::RateLimited,
        500 => RateError::Server,
        _ => RateError::Network(format!("HTTP status {status}")),
    }
}

#[derive(Debug, Deserialize)]
struct CurrenciesResponse(BTreeMap<String, String>);

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    rates: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    async fn fetch_currencies(&self) -> Result<BTreeMap<String, String>, RateError> {
        let url = format!("{}/currencies", self.base_url);
        let data: CurrenciesResponse = self.get_json(&url).await?;
        Ok(data.0)
    }

    async fn fetch_latest(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateError> {
        let url = format!(
            "{}/latest?amount={}&from={}&to={}",
            self.base_url, amount, from, to
        );
        let data: LatestResponse = self.get_json(&url).await?;

        data.rates.get(to).copied().ok_or_else(|| {
            RateError::Unknown(format!("response is missing a rate for {to}"))
        })
    }

    async fn fetch_timeseries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        from: &str,
        to: &str,
    ) -> Result<RateSeries, RateError> {
        let url = format!(
            "{}/{}..{}?from={}&to={}",
            self.base_url, start, end, from, to
        );
        let data: SeriesResponse = self.get_json(&url).await?;
        Ok(data.rates)
    }
}
