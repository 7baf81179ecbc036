//! Status of transactions submitted through the local node

use super::format::{short_hash, PropagationStats};
use super::record::TransactionRecord;

use ethers::types::H256;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalTxStatus {
    Pending,
    Future,
    Mined,
    Dropped,
    Invalid,
    Rejected,
    Replaced,
    #[serde(other)]
    Unknown,
}

impl FromStr for LocalTxStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pending" => LocalTxStatus::Pending,
            "future" => LocalTxStatus::Future,
            "mined" => LocalTxStatus::Mined,
            "dropped" => LocalTxStatus::Dropped,
            "invalid" => LocalTxStatus::Invalid,
            "rejected" => LocalTxStatus::Rejected,
            "replaced" => LocalTxStatus::Replaced,
            _ => LocalTxStatus::Unknown,
        })
    }
}

/// Extra information the node attaches to some statuses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDetails {
    /// Rejection reason
    #[serde(default)]
    pub error: Option<String>,
    /// Hash of the replacing transaction
    #[serde(default)]
    pub hash: Option<H256>,
}

impl LocalTxStatus {
    pub fn describe(&self, details: &StatusDetails) -> String {
        match self {
            LocalTxStatus::Pending => "In queue: Pending".to_string(),
            LocalTxStatus::Future => "In queue: Future".to_string(),
            LocalTxStatus::Mined => "Mined".to_string(),
            LocalTxStatus::Dropped => "Dropped because of queue limit".to_string(),
            LocalTxStatus::Invalid => "Transaction is invalid".to_string(),
            LocalTxStatus::Rejected => format!(
                "Rejected: {}",
                details.error.as_deref().unwrap_or("unknown reason")
            ),
            LocalTxStatus::Replaced => match details.hash {
                Some(hash) => format!("Replaced by {}", short_hash(&format!("{:#x}", hash))),
                None => "Replaced".to_string(),
            },
            LocalTxStatus::Unknown => "unknown".to_string(),
        }
    }

    /// Propagation is only meaningful while the transaction sits in the queue
    pub fn shows_propagation(&self) -> bool {
        matches!(self, LocalTxStatus::Pending)
    }
}

/// One entry of the node's local transaction list, keyed by transaction hash
/// in the node's response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTransaction {
    pub status: LocalTxStatus,
    #[serde(default)]
    pub transaction: Option<TransactionRecord>,
    #[serde(flatten)]
    pub details: StatusDetails,
    #[serde(default)]
    pub stats: PropagationStats,
}

impl LocalTransaction {
    pub fn status_line(&self) -> String {
        let status = self.status.describe(&self.details);
        if self.status.shows_propagation() {
            format!("{}, {}", status, self.stats.summary())
        } else {
            status
        }
    }

    /// Only entries that still carry their transaction can be resubmitted
    pub fn can_resubmit(&self) -> bool {
        self.transaction.is_some()
    }
}
