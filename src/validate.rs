//! Conversion request validation.

use thiserror::Error;

use crate::catalog::CurrencyCatalog;

/// Raw form inputs, before any validation.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl FormFields {
    pub fn new(amount: &str, from: &str, to: &str) -> Self {
        FormFields {
            amount: amount.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// A conversion request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    #[error("Please select a source currency.")]
    MissingFrom,

    #[error("Please select a target currency.")]
    MissingTo,

    #[error("Please enter an amount.")]
    MissingAmount,

    #[error("Amount must be a number greater than zero.")]
    AmountNotPositive,

    #[error("Source and target currencies must differ.")]
    SameCurrency,

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Checks every rule independently and reports all violations, not just the
/// first. Currency codes are only checked against the catalog when one has
/// been loaded.
pub fn validate(
    fields: &FormFields,
    catalog: &CurrencyCatalog,
) -> Result<ConversionRequest, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let from = fields.from.trim();
    let to = fields.to.trim();
    let amount_text = fields.amount.trim();

    if from.is_empty() {
        issues.push(ValidationIssue::MissingFrom);
    } else if !catalog.is_empty() && !catalog.contains(from) {
        issues.push(ValidationIssue::UnknownCurrency(from.to_string()));
    }

    if to.is_empty() {
        issues.push(ValidationIssue::MissingTo);
    } else if !catalog.is_empty() && !catalog.contains(to) {
        issues.push(ValidationIssue::UnknownCurrency(to.to_string()));
    }

    let mut amount = None;
    if amount_text.is_empty() {
        issues.push(ValidationIssue::MissingAmount);
    } else {
        match amount_text.parse::<f64>() {
            Ok(value) if value > 0.0 && value.is_finite() => amount = Some(value),
            _ => issues.push(ValidationIssue::AmountNotPositive),
        }
    }

    if !from.is_empty() && from == to {
        issues.push(ValidationIssue::SameCurrency);
    }

    match (issues.is_empty(), amount) {
        (true, Some(amount)) => Ok(ConversionRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        }),
        _ => Err(issues),
    }
}

/// Silent boolean form used by auto-convert: same rules, no error surfacing.
pub fn is_submittable(fields: &FormFields, catalog: &CurrencyCatalog) -> bool {
    validate(fields, catalog).is_ok()
}
