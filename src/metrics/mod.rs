//! Prometheus metrics for monitoring
//!
//! Exposes metrics for:
//! - Reference data fetches (gas price, histogram)
//! - Field validation failures
//! - Transaction submissions

use crate::error::{EditorError, EditorResult, ValidationError};

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

lazy_static! {
    pub static ref REFERENCE_FETCHES: CounterVec = register_counter_vec!(
        "gas_editor_reference_fetch_total",
        "Reference data fetches by kind and outcome",
        &["kind", "outcome"]
    ).unwrap();

    pub static ref REFERENCE_FETCH_LATENCY: HistogramVec = register_histogram_vec!(
        "gas_editor_reference_fetch_seconds",
        "Reference data fetch latency",
        &["kind"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    pub static ref VALIDATION_ERRORS: CounterVec = register_counter_vec!(
        "gas_editor_validation_errors_total",
        "Field validation failures by field and kind",
        &["field", "kind"]
    ).unwrap();

    pub static ref TX_SUBMITTED: CounterVec = register_counter_vec!(
        "gas_editor_transactions_submitted_total",
        "Transactions submitted by outcome",
        &["outcome"]
    ).unwrap();
}

/// Encode all registered metrics in the Prometheus text format
pub fn render() -> EditorResult<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| EditorError::Internal(format!("metrics encoding failed: {}", e)))?;
    String::from_utf8(buffer).map_err(|e| EditorError::Internal(e.to_string()))
}

// Helper functions to record metrics

pub fn record_fetch(kind: &str, success: bool, latency_secs: f64) {
    let outcome = if success { "success" } else { "failure" };
    REFERENCE_FETCHES.with_label_values(&[kind, outcome]).inc();
    REFERENCE_FETCH_LATENCY
        .with_label_values(&[kind])
        .observe(latency_secs);
}

pub fn record_validation_error(field: &str, error: ValidationError) {
    VALIDATION_ERRORS
        .with_label_values(&[field, error.kind()])
        .inc();
}

pub fn record_tx_submitted(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    TX_SUBMITTED.with_label_values(&[outcome]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_metrics() {
        record_validation_error("gas", ValidationError::ExceedsBlockLimit);
        record_fetch("gas_price", true, 0.01);

        let text = render().unwrap();
        assert!(text.contains("gas_editor_validation_errors_total"));
        assert!(text.contains("exceeds_block_limit"));
        assert!(text.contains("gas_editor_reference_fetch_total"));
    }
}
