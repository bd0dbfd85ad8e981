//! Error kinds surfaced to the user, classified for display.

use thiserror::Error;

use crate::validate::ValidationIssue;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("The request timed out. Please try again.")]
    Timeout,

    #[error("Could not reach the exchange rate service: {0}")]
    Network(String),

    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,

    #[error("The exchange rate service is having trouble. Please try later.")]
    Server,

    #[error("Received an unexpected response from the exchange rate service: {0}")]
    Unknown(String),

    #[error("Invalid conversion request")]
    Validation(Vec<ValidationIssue>),

    #[error("No rate data is available for this currency pair.")]
    NoData,
}

/// Marker for a failure that the presentation port has already rendered;
/// callers exit non-zero without reporting it a second time.
#[derive(Debug, Error)]
#[error("exiting after a reported error")]
pub struct PresentedError;

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RateError::Timeout
        } else {
            RateError::Network(err.to_string())
        }
    }
}
