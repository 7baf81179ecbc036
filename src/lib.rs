//! Gas price editor state for Ethereum wallets
//!
//! The core is [`editor::GasPriceEditorStore`], a validated store for the gas,
//! gas price and value of a pending transaction. [`editor::EditorSession`]
//! feeds it reference data from the node through [`api::GasPriceApi`].

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod metrics;
pub mod tx;

pub use api::{GasPriceApi, RpcGasPriceApi};
pub use editor::{EditorSession, GasPriceEditorStore, GasPriceHistogram, StoreOptions};
pub use error::{EditorError, EditorResult, FieldError, ValidationError};
pub use tx::TransactionRecord;
