//! The conversion controller: owns the catalog, the in-flight flag and the
//! debounce timer, and talks to the outside world through the presentation
//! port.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::catalog::{self, CurrencyCatalog};
use crate::error::RateError;
use crate::insight::{self, RateInsight};
use crate::provider::{RateProvider, REQUEST_TIMEOUT};
use crate::ui::Presenter;
use crate::validate::{self, ConversionRequest, FormFields};

/// Quiet period after the last field edit before auto-convert fires.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// How long a surfaced error message stays up before it is cleared.
pub const ERROR_DISPLAY_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub converted_amount: f64,
    /// Exact ratio converted/original; rounding happens only at display time.
    pub rate: f64,
    pub from: String,
    pub to: String,
    pub original_amount: f64,
}

struct Inner {
    provider: Arc<dyn RateProvider>,
    presenter: Arc<dyn Presenter>,
    catalog: Mutex<CurrencyCatalog>,
    fields: Mutex<FormFields>,
    in_flight: AtomicBool,
    debounce: Mutex<Option<JoinHandle<()>>>,
    error_epoch: AtomicU64,
}

/// Clears the in-flight flag and the loading indicator on every exit path,
/// including cancellation mid-await.
struct ConvertGuard<'a> {
    inner: &'a Inner,
}

impl Drop for ConvertGuard<'_> {
    fn drop(&mut self) {
        self.inner.in_flight.store(false, Ordering::SeqCst);
        self.inner.presenter.set_loading(false);
    }
}

#[derive(Clone)]
pub struct ConversionController {
    inner: Arc<Inner>,
}

impl ConversionController {
    pub fn new(provider: Arc<dyn RateProvider>, presenter: Arc<dyn Presenter>) -> Self {
        ConversionController {
            inner: Arc::new(Inner {
                provider,
                presenter,
                catalog: Mutex::new(CurrencyCatalog::default()),
                fields: Mutex::new(FormFields::default()),
                in_flight: AtomicBool::new(false),
                debounce: Mutex::new(None),
                error_epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Loads the currency catalog before the controller is considered
    /// ready. Never fails; degraded mode is surfaced as a soft warning.
    pub async fn init(&self) {
        let catalog = catalog::load_currencies(self.inner.provider.as_ref()).await;
        if catalog.is_degraded() {
            self.inner.presenter.warn_degraded();
        }
        *self.inner.catalog.lock().unwrap() = catalog;
    }

    pub fn catalog(&self) -> CurrencyCatalog {
        self.inner.catalog.lock().unwrap().clone()
    }

    pub fn set_fields(&self, fields: FormFields) {
        *self.inner.fields.lock().unwrap() = fields;
    }

    fn snapshot(&self) -> (FormFields, CurrencyCatalog) {
        let fields = self.inner.fields.lock().unwrap().clone();
        let catalog = self.inner.catalog.lock().unwrap().clone();
        (fields, catalog)
    }

    /// Form-submit path: validates the current fields, surfacing every
    /// violation, then converts.
    pub async fn submit(&self) -> Option<Result<ConversionResult, RateError>> {
        let (fields, catalog) = self.snapshot();
        match validate::validate(&fields, &catalog) {
            Ok(request) => self.convert(request).await,
            Err(issues) => {
                let error = RateError::Validation(issues);
                self.show_error(&error);
                Some(Err(error))
            }
        }
    }

    /// Swaps the currency pair and converts if the fields are submittable.
    /// Not a form submit: nothing is surfaced when they are not.
    pub async fn swap(&self) -> Option<Result<ConversionResult, RateError>> {
        {
            let mut guard = self.inner.fields.lock().unwrap();
            let fields = &mut *guard;
            std::mem::swap(&mut fields.from, &mut fields.to);
        }
        let (fields, catalog) = self.snapshot();
        match validate::validate(&fields, &catalog) {
            Ok(request) => self.convert(request).await,
            Err(_) => None,
        }
    }

    /// Executes one conversion with a 10s deadline. At most one conversion
    /// is in flight at a time; a call arriving while one is unresolved is
    /// dropped silently and returns `None`. Never retried.
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Option<Result<ConversionResult, RateError>> {
        // Set synchronously, before the first await point.
        if self.inner.in_flight.swap(true, Ordering::SeqCst) {
            debug!("Conversion already in flight; dropping request");
            return None;
        }
        let _guard = ConvertGuard { inner: &self.inner };
        self.inner.presenter.set_loading(true);

        let call = self
            .inner
            .provider
            .fetch_latest(request.amount, &request.from, &request.to);
        let outcome = match timeout(REQUEST_TIMEOUT, call).await {
            Ok(Ok(converted)) => Ok(ConversionResult {
                converted_amount: converted,
                rate: converted / request.amount,
                from: request.from,
                to: request.to,
                original_amount: request.amount,
            }),
            Ok(Err(error)) => Err(error),
            Err(_) => Err(RateError::Timeout),
        };

        match &outcome {
            Ok(result) => {
                // A fresh result replaces any lingering error message.
                self.inner.error_epoch.fetch_add(1, Ordering::SeqCst);
                self.inner.presenter.clear_error();
                self.inner.presenter.render_result(result);
            }
            Err(error) => self.show_error(error),
        }
        Some(outcome)
    }

    /// Trailing-edge debounce: each edit cancels the pending attempt and
    /// schedules a new one 500ms out. Last call wins.
    pub fn on_field_change(&self, fields: FormFields) {
        *self.inner.fields.lock().unwrap() = fields;

        let controller = self.clone();
        let task = tokio::spawn(async move {
            sleep(DEBOUNCE_DELAY).await;
            controller.fire_auto_convert().await;
        });

        // Replace and cancel together; the handle has a single owner.
        let mut slot = self.inner.debounce.lock().unwrap();
        if let Some(previous) = slot.replace(task) {
            previous.abort();
        }
    }

    async fn fire_auto_convert(&self) {
        let (fields, catalog) = self.snapshot();
        match validate::validate(&fields, &catalog) {
            Ok(request) => {
                self.convert(request).await;
            }
            // Not submittable: do nothing, no error shown.
            Err(_) => debug!("Auto-convert skipped; fields not submittable"),
        }
    }

    /// Summarizes the current pair's 7-day trend. Runs independently of any
    /// conversion in flight; the two populate disjoint output regions.
    pub async fn insight(&self) -> Result<RateInsight, RateError> {
        let fields = self.inner.fields.lock().unwrap().clone();
        let result = insight::summarize(
            self.inner.provider.as_ref(),
            fields.from.trim(),
            fields.to.trim(),
        )
        .await;

        match &result {
            Ok(insight) => self.inner.presenter.render_insight(insight),
            Err(error) => self.show_error(error),
        }
        result
    }

    /// Renders an error and schedules it to clear after 5s, unless a newer
    /// message has taken its place by then.
    fn show_error(&self, error: &RateError) {
        let epoch = self.inner.error_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.presenter.render_error(error);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            sleep(ERROR_DISPLAY_TTL).await;
            if inner.error_epoch.load(Ordering::SeqCst) == epoch {
                inner.presenter.clear_error();
            }
        });
    }
}
