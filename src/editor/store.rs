//! Validated state for the gas price editor
//!
//! Every setter stores the value it is given, even when it is out of range,
//! and recomputes the paired error flag before returning. Callers decide
//! whether a flagged field blocks submission.

use super::histogram::GasPriceHistogram;
use super::value::NumericInput;
use crate::error::{FieldError, ValidationError};
use crate::metrics;
use crate::tx::TransactionRecord;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::Serialize;
use tracing::debug;

/// Upper sanity bound applied to gas estimates when none is configured
pub const DEFAULT_MAX_GAS_ESTIMATION: u64 = 50_000_000;

/// Bounds supplied by the surrounding application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorLimits {
    /// Estimates at or above this value are treated as failed estimations
    pub max_gas_estimation: BigInt,
}

impl Default for EditorLimits {
    fn default() -> Self {
        Self {
            max_gas_estimation: BigInt::from(DEFAULT_MAX_GAS_ESTIMATION),
        }
    }
}

/// Construction parameters for a store
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub gas_limit: BigInt,
    /// Gas of the transaction being edited, if it has one
    pub gas: Option<NumericInput>,
    /// Gas price of the transaction being edited, if it has one
    pub gas_price: Option<NumericInput>,
    pub limits: EditorLimits,
}

impl StoreOptions {
    pub fn new(gas_limit: impl Into<BigInt>) -> Self {
        Self {
            gas_limit: gas_limit.into(),
            gas: None,
            gas_price: None,
            limits: EditorLimits::default(),
        }
    }

    pub fn with_gas(mut self, gas: impl Into<NumericInput>) -> Self {
        self.gas = Some(gas.into());
        self
    }

    pub fn with_gas_price(mut self, gas_price: impl Into<NumericInput>) -> Self {
        self.gas_price = Some(gas_price.into());
        self
    }

    pub fn with_limits(mut self, limits: EditorLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Editable gas, price and value fields of one pending transaction
#[derive(Debug, Clone)]
pub struct GasPriceEditorStore {
    gas: Option<NumericInput>,
    gas_limit: BigInt,
    price: Option<NumericInput>,
    price_default: Option<NumericInput>,
    /// Bumped on every `set_price`, lets late writers detect user edits
    price_revision: u64,
    wei_value: Option<NumericInput>,
    estimated: Option<NumericInput>,
    histogram: GasPriceHistogram,
    is_editing: bool,
    error_gas: Option<FieldError>,
    error_price: Option<FieldError>,
    error_total: Option<FieldError>,
    error_estimated: Option<FieldError>,
    limits: EditorLimits,
}

impl GasPriceEditorStore {
    /// Create a store. Gas and gas price carried by the options are applied
    /// through the regular setters so they are validated.
    pub fn new(options: StoreOptions) -> Self {
        let mut store = Self {
            gas: None,
            gas_limit: options.gas_limit,
            price: None,
            price_default: None,
            price_revision: 0,
            wei_value: None,
            estimated: None,
            histogram: GasPriceHistogram::default(),
            is_editing: false,
            error_gas: None,
            error_price: None,
            error_total: None,
            error_estimated: None,
            limits: options.limits,
        };

        if let Some(gas) = options.gas {
            store.set_gas(gas);
        }
        if let Some(gas_price) = options.gas_price {
            store.set_price(gas_price);
        }

        store
    }

    pub fn set_editing(&mut self, is_editing: bool) {
        self.is_editing = is_editing;
    }

    pub fn set_gas(&mut self, value: impl Into<NumericInput>) {
        let value = value.into();
        let error = validate_gas(value.value(), &self.gas_limit);
        debug!("gas set to {} (error: {:?})", value.raw(), error);
        self.error_gas = flag("gas", error);
        self.gas = Some(value);
    }

    pub fn set_price(&mut self, value: impl Into<NumericInput>) {
        let value = value.into();
        let error = validate_price(value.value());
        debug!("gas price set to {} (error: {:?})", value.raw(), error);
        self.error_price = flag("price", error);
        self.price = Some(value);
        self.price_revision += 1;
    }

    /// Record the network gas price; does not touch the edited price
    pub fn set_price_default(&mut self, value: impl Into<NumericInput>) {
        self.price_default = Some(value.into());
    }

    /// Value in wei, stored without validation
    pub fn set_eth_value(&mut self, value: impl Into<NumericInput>) {
        self.wei_value = Some(value.into());
    }

    /// Replace the block gas limit. Existing gas and estimate errors are left
    /// as they are; re-set those fields to validate against the new limit.
    pub fn set_gas_limit(&mut self, gas_limit: impl Into<BigInt>) {
        self.gas_limit = gas_limit.into();
    }

    pub fn set_histogram(&mut self, histogram: GasPriceHistogram) {
        self.histogram = histogram;
    }

    pub fn set_estimated(&mut self, value: impl Into<NumericInput>) {
        let value = value.into();
        let error = validate_estimated(value.value(), &self.gas_limit, &self.limits);
        debug!("gas estimate set to {} (error: {:?})", value.raw(), error);
        self.error_estimated = flag("estimated", error);
        self.estimated = Some(value);
    }

    /// Set or clear the estimation error with a caller supplied message
    pub fn set_estimated_error(&mut self, error: Option<FieldError>) {
        self.error_estimated = error;
    }

    /// Flag the estimate with the generic estimation failure
    pub fn set_default_estimated_error(&mut self) {
        self.error_estimated = Some(ValidationError::GasEstimationException.into());
    }

    /// Set or clear the total error, e.g. after a balance check done elsewhere
    pub fn set_error_total(&mut self, error: Option<FieldError>) {
        self.error_total = error;
    }

    /// `wei_value + gas * price`; missing or unparsable operands count as zero
    pub fn total_value(&self) -> BigInt {
        operand(&self.wei_value) + operand(&self.gas) * operand(&self.price)
    }

    /// Copy of `transaction` carrying the edited gas and gas price.
    ///
    /// Both values must be present and valid; otherwise the transaction is
    /// returned untouched, never with only one of the two replaced.
    pub fn override_transaction(&self, transaction: &TransactionRecord) -> TransactionRecord {
        match (self.valid_gas(), self.valid_price()) {
            (Some(gas), Some(price)) => TransactionRecord {
                gas: Some(gas.clone()),
                gas_price: Some(price.clone()),
                ..transaction.clone()
            },
            _ => {
                debug!("Keeping original gas and gas price, editor values are not valid");
                transaction.clone()
            }
        }
    }

    /// True when no field carries an error
    pub fn is_valid(&self) -> bool {
        self.error_gas.is_none()
            && self.error_price.is_none()
            && self.error_total.is_none()
            && self.error_estimated.is_none()
    }

    /// Histogram bucket the current price falls into
    pub fn selected_bucket(&self) -> Option<usize> {
        self.valid_price()
            .and_then(|price| self.histogram.bucket_index(price))
    }

    fn valid_gas(&self) -> Option<&BigInt> {
        if self.error_gas.is_some() {
            return None;
        }
        self.gas.as_ref().and_then(NumericInput::value)
    }

    fn valid_price(&self) -> Option<&BigInt> {
        if self.error_price.is_some() {
            return None;
        }
        self.price.as_ref().and_then(NumericInput::value)
    }

    pub fn gas(&self) -> Option<&str> {
        self.gas.as_ref().map(NumericInput::raw)
    }

    pub fn gas_limit(&self) -> &BigInt {
        &self.gas_limit
    }

    pub fn price(&self) -> Option<&str> {
        self.price.as_ref().map(NumericInput::raw)
    }

    pub fn price_default(&self) -> Option<&str> {
        self.price_default.as_ref().map(NumericInput::raw)
    }

    pub fn price_revision(&self) -> u64 {
        self.price_revision
    }

    pub fn wei_value(&self) -> Option<&str> {
        self.wei_value.as_ref().map(NumericInput::raw)
    }

    pub fn estimated(&self) -> Option<&str> {
        self.estimated.as_ref().map(NumericInput::raw)
    }

    pub fn histogram(&self) -> &GasPriceHistogram {
        &self.histogram
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn error_gas(&self) -> Option<&FieldError> {
        self.error_gas.as_ref()
    }

    pub fn error_price(&self) -> Option<&FieldError> {
        self.error_price.as_ref()
    }

    pub fn error_total(&self) -> Option<&FieldError> {
        self.error_total.as_ref()
    }

    pub fn error_estimated(&self) -> Option<&FieldError> {
        self.error_estimated.as_ref()
    }

    pub fn limits(&self) -> &EditorLimits {
        &self.limits
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            gas: self.gas().map(str::to_string),
            gas_limit: self.gas_limit.to_string(),
            price: self.price().map(str::to_string),
            price_default: self.price_default().map(str::to_string),
            wei_value: self.wei_value().map(str::to_string),
            estimated: self.estimated().map(str::to_string),
            histogram: self.histogram.clone(),
            is_editing: self.is_editing,
            error_gas: self.error_gas.as_ref().map(FieldError::message),
            error_price: self.error_price.as_ref().map(FieldError::message),
            error_total: self.error_total.as_ref().map(FieldError::message),
            error_estimated: self.error_estimated.as_ref().map(FieldError::message),
            total_value: self.total_value().to_string(),
            is_valid: self.is_valid(),
        }
    }
}

/// Point-in-time copy of the editor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub gas: Option<String>,
    pub gas_limit: String,
    pub price: Option<String>,
    pub price_default: Option<String>,
    pub wei_value: Option<String>,
    pub estimated: Option<String>,
    pub histogram: GasPriceHistogram,
    pub is_editing: bool,
    pub error_gas: Option<String>,
    pub error_price: Option<String>,
    pub error_total: Option<String>,
    pub error_estimated: Option<String>,
    pub total_value: String,
    pub is_valid: bool,
}

fn operand(field: &Option<NumericInput>) -> BigInt {
    field
        .as_ref()
        .and_then(NumericInput::value)
        .cloned()
        .unwrap_or_else(BigInt::zero)
}

fn flag(field: &str, error: Option<ValidationError>) -> Option<FieldError> {
    error.map(|e| {
        metrics::record_validation_error(field, e);
        FieldError::Validation(e)
    })
}

fn validate_non_negative(value: Option<&BigInt>) -> Option<ValidationError> {
    match value {
        Some(v) if !v.is_negative() => None,
        _ => Some(ValidationError::NegativeValue),
    }
}

fn validate_gas(value: Option<&BigInt>, gas_limit: &BigInt) -> Option<ValidationError> {
    validate_non_negative(value).or_else(|| match value {
        Some(v) if v >= gas_limit => Some(ValidationError::ExceedsBlockLimit),
        _ => None,
    })
}

fn validate_price(value: Option<&BigInt>) -> Option<ValidationError> {
    validate_non_negative(value)
}

fn validate_estimated(
    value: Option<&BigInt>,
    gas_limit: &BigInt,
    limits: &EditorLimits,
) -> Option<ValidationError> {
    match value {
        Some(v) if v >= &limits.max_gas_estimation => {
            Some(ValidationError::GasEstimationException)
        }
        Some(v) if v >= gas_limit => Some(ValidationError::ExceedsBlockLimit),
        _ => None,
    }
}
