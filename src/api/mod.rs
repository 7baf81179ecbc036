//! Node collaborator used by the editor
//!
//! The editor only consumes reference data; submission is exposed here for
//! the resubmit flow in [`crate::tx`].

mod provider;

pub use provider::RpcGasPriceApi;

use crate::editor::GasPriceHistogram;
use crate::error::EditorResult;
use crate::tx::TransactionRecord;

use async_trait::async_trait;
use ethers::types::{H256, U256};

/// Remote endpoints the editor depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GasPriceApi: Send + Sync {
    /// Current network gas price in wei
    async fn fetch_current_gas_price(&self) -> EditorResult<U256>;

    /// Distribution of recently observed gas prices
    async fn fetch_gas_price_histogram(&self) -> EditorResult<GasPriceHistogram>;

    /// Submit a transaction, returning its pending hash
    async fn submit_transaction(&self, record: &TransactionRecord) -> EditorResult<H256>;
}
