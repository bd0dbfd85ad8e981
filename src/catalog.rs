//! The supported-currency catalog and its retrying loader.

use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::provider::{RateProvider, REQUEST_TIMEOUT};

const CATALOG_ATTEMPTS: u32 = 3;
const BACKOFF_UNIT: Duration = Duration::from_millis(1000);

/// Well-known currencies used when the remote catalog is unreachable.
const FALLBACK_CURRENCIES: [(&str, &str); 20] = [
    ("AUD", "Australian Dollar"),
    ("BRL", "Brazilian Real"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Renminbi Yuan"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("HKD", "Hong Kong Dollar"),
    ("INR", "Indian Rupee"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("MXN", "Mexican Peso"),
    ("NOK", "Norwegian Krone"),
    ("NZD", "New Zealand Dollar"),
    ("PLN", "Polish Zloty"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("TRY", "Turkish Lira"),
    ("USD", "United States Dollar"),
    ("ZAR", "South African Rand"),
];

/// Code -> display name mapping. Loaded once; replaced wholesale, never
/// mutated in place.
#[derive(Debug, Clone, Default)]
pub struct CurrencyCatalog {
    entries: BTreeMap<String, String>,
    degraded: bool,
}

impl CurrencyCatalog {
    pub fn from_remote(entries: BTreeMap<String, String>) -> Self {
        CurrencyCatalog {
            entries,
            degraded: false,
        }
    }

    pub fn fallback() -> Self {
        let entries = FALLBACK_CURRENCIES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        CurrencyCatalog {
            entries,
            degraded: true,
        }
    }

    /// True when the catalog came from the embedded fallback table.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Loads the currency catalog, never failing outward: up to 3 attempts with
/// a 10s deadline each and linear backoff between them, then the embedded
/// fallback table.
pub async fn load_currencies(provider: &dyn RateProvider) -> CurrencyCatalog {
    for attempt in 1..=CATALOG_ATTEMPTS {
        match timeout(REQUEST_TIMEOUT, provider.fetch_currencies()).await {
            Ok(Ok(entries)) => {
                debug!("Loaded {} currencies on attempt {}", entries.len(), attempt);
                return CurrencyCatalog::from_remote(entries);
            }
            Ok(Err(err)) => {
                warn!("Currency catalog attempt {} failed: {}", attempt, err);
            }
            Err(_) => {
                warn!("Currency catalog attempt {} timed out", attempt);
            }
        }

        if attempt < CATALOG_ATTEMPTS {
            sleep(BACKOFF_UNIT * attempt).await;
        }
    }

    warn!("Currency catalog unreachable, using embedded fallback table");
    CurrencyCatalog::fallback()
}
