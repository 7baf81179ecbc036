//! Gas price editor state
//!
//! [`GasPriceEditorStore`] holds and validates the editable fields of a
//! pending transaction. [`EditorSession`] owns a store for the duration of an
//! edit and feeds it reference data from the node.

mod histogram;
mod session;
mod store;
pub mod value;

pub use histogram::GasPriceHistogram;
pub use session::{EditorSession, FetchKind, FetchOutcome, FetchReport, SessionOptions};
pub use store::{
    EditorLimits, EditorSnapshot, GasPriceEditorStore, StoreOptions, DEFAULT_MAX_GAS_ESTIMATION,
};
pub use value::NumericInput;
