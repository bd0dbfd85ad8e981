//! Short historical trend summary for a currency pair.

use chrono::{Days, NaiveDate, Utc};
use tokio::time::timeout;
use tracing::debug;

use crate::error::RateError;
use crate::provider::{RateProvider, REQUEST_TIMEOUT};
use crate::validate::ValidationIssue;

const WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

/// Summary statistics over the sampled window.
#[derive(Debug, Clone)]
pub struct RateInsight {
    pub from: String,
    pub to: String,
    pub samples: Vec<(NaiveDate, f64)>,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub latest: f64,
    pub trend: Trend,
}

fn classify_trend(samples: &[(NaiveDate, f64)]) -> Trend {
    let first = samples.first().map(|(_, rate)| *rate);
    let last = samples.last().map(|(_, rate)| *rate);
    match (first, last) {
        (Some(first), Some(last)) if last > first => Trend::Up,
        (Some(first), Some(last)) if last < first => Trend::Down,
        _ => Trend::Stable,
    }
}

fn summarize_samples(from: &str, to: &str, samples: Vec<(NaiveDate, f64)>) -> RateInsight {
    let rates = samples.iter().map(|(_, rate)| *rate);
    let min = rates.clone().fold(f64::INFINITY, f64::min);
    let max = rates.clone().fold(f64::NEG_INFINITY, f64::max);
    let average = rates.clone().sum::<f64>() / samples.len() as f64;
    let latest = samples.last().map(|(_, rate)| *rate).unwrap_or_default();

    RateInsight {
        from: from.to_string(),
        to: to.to_string(),
        trend: classify_trend(&samples),
        samples,
        min,
        max,
        average,
        latest,
    }
}

/// Summarizes the pair's rates over the last 7 days (date-only, inclusive).
/// Dates missing the target code are dropped; an empty sample is `NoData`.
pub async fn summarize(
    provider: &dyn RateProvider,
    from: &str,
    to: &str,
) -> Result<RateInsight, RateError> {
    let mut issues = Vec::new();
    if from.is_empty() {
        issues.push(ValidationIssue::MissingFrom);
    }
    if to.is_empty() {
        issues.push(ValidationIssue::MissingTo);
    }
    if !from.is_empty() && from == to {
        issues.push(ValidationIssue::SameCurrency);
    }
    if !issues.is_empty() {
        return Err(RateError::Validation(issues));
    }

    let end = Utc::now().date_naive();
    let start = end
        .checked_sub_days(Days::new(WINDOW_DAYS))
        .unwrap_or(end);

    let series = timeout(REQUEST_TIMEOUT, provider.fetch_timeseries(start, end, from, to))
        .await
        .map_err(|_| RateError::Timeout)??;

    // BTreeMap keys keep the samples date-ordered.
    let samples: Vec<(NaiveDate, f64)> = series
        .into_iter()
        .filter_map(|(date, rates)| rates.get(to).map(|rate| (date, *rate)))
        .collect();

    if samples.is_empty() {
        return Err(RateError::NoData);
    }

    debug!("Summarized {} samples for {}/{}", samples.len(), from, to);
    Ok(summarize_samples(from, to, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RateSeries;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct SeriesProvider {
        rates: Vec<f64>,
        skip_target_on: Vec<usize>,
    }

    impl SeriesProvider {
        fn with_rates(rates: &[f64]) -> Self {
            SeriesProvider {
                rates: rates.to_vec(),
                skip_target_on: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl RateProvider for SeriesProvider {
        async fn fetch_currencies(&self) -> Result<BTreeMap<String, String>, RateError> {
            unimplemented!()
        }

        async fn fetch_latest(&self, _: f64, _: &str, _: &str) -> Result<f64, RateError> {
            unimplemented!()
        }

        async fn fetch_timeseries(
            &self,
            start: NaiveDate,
            _: NaiveDate,
            _: &str,
            to: &str,
        ) -> Result<RateSeries, RateError> {
            let mut series = BTreeMap::new();
            for (i, rate) in self.rates.iter().enumerate() {
                let date = start.checked_add_days(Days::new(i as u64)).unwrap();
                let mut day = BTreeMap::new();
                if !self.skip_target_on.contains(&i) {
                    day.insert(to.to_string(), *rate);
                }
                series.insert(date, day);
            }
            Ok(series)
        }
    }

    #[tokio::test]
    async fn test_rising_rates_trend_up() {
        let provider = SeriesProvider::with_rates(&[1.10, 1.12, 1.15]);
        let insight = summarize(&provider, "USD", "EUR").await.unwrap();

        assert_eq!(insight.trend, Trend::Up);
        assert_eq!(insight.min, 1.10);
        assert_eq!(insight.max, 1.15);
        assert_eq!(insight.latest, 1.15);
        assert!((insight.average - (1.10 + 1.12 + 1.15) / 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_single_sample_is_stable() {
        let provider = SeriesProvider::with_rates(&[1.10]);
        let insight = summarize(&provider, "USD", "EUR").await.unwrap();
        assert_eq!(insight.trend, Trend::Stable);
        assert_eq!(insight.latest, 1.10);
    }

    #[tokio::test]
    async fn test_falling_rates_trend_down() {
        let provider = SeriesProvider::with_rates(&[1.20, 1.10]);
        let insight = summarize(&provider, "USD", "EUR").await.unwrap();
        assert_eq!(insight.trend, Trend::Down);
    }

    #[tokio::test]
    async fn test_flat_rates_trend_stable() {
        let provider = SeriesProvider::with_rates(&[1.20, 1.35, 1.20]);
        let insight = summarize(&provider, "USD", "EUR").await.unwrap();
        assert_eq!(insight.trend, Trend::Stable);
    }

    #[tokio::test]
    async fn test_dates_missing_target_code_are_dropped() {
        let provider = SeriesProvider {
            rates: vec![1.10, 1.15, 1.20],
            skip_target_on: vec![2],
        };
        let insight = summarize(&provider, "USD", "EUR").await.unwrap();

        assert_eq!(insight.samples.len(), 2);
        assert_eq!(insight.latest, 1.15);
    }

    #[tokio::test]
    async fn test_empty_series_is_no_data() {
        let provider = SeriesProvider::with_rates(&[]);
        let result = summarize(&provider, "USD", "EUR").await;
        assert!(matches!(result, Err(RateError::NoData)));
    }

    #[tokio::test]
    async fn test_same_pair_fails_before_any_fetch() {
        let provider = SeriesProvider::with_rates(&[1.0]);
        let result = summarize(&provider, "USD", "USD").await;

        match result {
            Err(RateError::Validation(issues)) => {
                assert!(issues.contains(&ValidationIssue::SameCurrency));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
