//! Transaction records and the local transactions view
//!
//! Handles:
//! - Records exchanged with the node and the editor
//! - Text formatting of hashes, gas and gas prices
//! - Local transaction status descriptions
//! - Resubmission with new gas settings

mod format;
mod record;
mod resubmit;
mod status;

pub use format::{
    format_gas, format_gas_price, format_integer, minutes_since_first_seen, short_hash,
    PropagationStats,
};
pub use record::TransactionRecord;
pub use resubmit::ResubmitDraft;
pub use status::{LocalTransaction, LocalTxStatus, StatusDetails};
