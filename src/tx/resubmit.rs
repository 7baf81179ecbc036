//! Resubmitting a local transaction with a different gas or gas price

use super::record::TransactionRecord;
use crate::api::GasPriceApi;
use crate::editor::value::parse_integer;
use crate::editor::GasPriceEditorStore;
use crate::error::{EditorError, EditorResult};

use ethers::types::H256;
use num_bigint::BigInt;
use tracing::{info, warn};

/// Editable copy of a transaction's gas settings.
///
/// Gas and gas price are kept as the text the user edits, seeded with the
/// original values in `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResubmitDraft {
    original: TransactionRecord,
    gas_price: String,
    gas: String,
}

impl ResubmitDraft {
    pub fn new(original: TransactionRecord) -> Self {
        let gas_price = to_hex(original.gas_price.as_ref());
        let gas = to_hex(original.gas.as_ref());
        Self {
            original,
            gas_price,
            gas,
        }
    }

    /// Seed from the gas price editor. Falls back to the original values
    /// when the editor holds an invalid gas or price.
    pub fn from_editor(original: TransactionRecord, editor: &GasPriceEditorStore) -> Self {
        Self::new(editor.override_transaction(&original))
    }

    pub fn gas_price(&self) -> &str {
        &self.gas_price
    }

    pub fn gas(&self) -> &str {
        &self.gas
    }

    pub fn set_gas_price(&mut self, gas_price: impl Into<String>) {
        self.gas_price = gas_price.into();
    }

    pub fn set_gas(&mut self, gas: impl Into<String>) {
        self.gas = gas.into();
    }

    /// The transaction to send: the original's sender, recipient, nonce,
    /// value and data with the drafted gas settings
    pub fn to_record(&self) -> EditorResult<TransactionRecord> {
        Ok(TransactionRecord {
            hash: None,
            from: self.original.from,
            to: self.original.to,
            nonce: self.original.nonce.clone(),
            value: self.original.value.clone(),
            data: self.original.data.clone(),
            gas: Some(parse_non_negative(&self.gas)?),
            gas_price: Some(parse_non_negative(&self.gas_price)?),
        })
    }

    pub async fn submit(&self, api: &dyn GasPriceApi) -> EditorResult<H256> {
        let record = self.to_record()?;
        match api.submit_transaction(&record).await {
            Ok(hash) => {
                info!("Resubmitted transaction as {:#x}", hash);
                Ok(hash)
            }
            Err(e) => {
                warn!("Resubmission failed: {}", e);
                Err(e)
            }
        }
    }
}

fn to_hex(value: Option<&BigInt>) -> String {
    value.map(|v| format!("{:#x}", v)).unwrap_or_default()
}

fn parse_non_negative(input: &str) -> EditorResult<BigInt> {
    let value = parse_integer(input)?;
    if value < BigInt::from(0u8) {
        return Err(EditorError::InvalidNumber(input.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockGasPriceApi;
    use crate::editor::StoreOptions;

    use ethers::types::Address;
    use mockall::predicate::function;
    use tokio_test::{assert_err, assert_ok};

    fn original() -> TransactionRecord {
        TransactionRecord {
            hash: Some(H256::repeat_byte(0x01)),
            from: Some(Address::repeat_byte(0x11)),
            to: Some(Address::repeat_byte(0x22)),
            nonce: Some(BigInt::from(7)),
            value: Some(BigInt::from(1_000u64)),
            data: None,
            gas: Some(BigInt::from(21_000)),
            gas_price: Some(BigInt::from(20_000_000_000u64)),
        }
    }

    #[test]
    fn test_seeds_hex_values() {
        let draft = ResubmitDraft::new(original());
        assert_eq!(draft.gas(), "0x5208");
        assert_eq!(draft.gas_price(), "0x4a817c800");
    }

    #[test]
    fn test_to_record_keeps_identity_fields() {
        let mut draft = ResubmitDraft::new(original());
        draft.set_gas_price("30000000000");

        let record = draft.to_record().unwrap();
        assert_eq!(record.hash, None);
        assert_eq!(record.nonce, Some(BigInt::from(7)));
        assert_eq!(record.to, Some(Address::repeat_byte(0x22)));
        assert_eq!(record.gas, Some(BigInt::from(21_000)));
        assert_eq!(record.gas_price, Some(BigInt::from(30_000_000_000u64)));
    }

    #[test]
    fn test_to_record_rejects_bad_input() {
        let mut draft = ResubmitDraft::new(original());
        draft.set_gas("-1");
        assert!(draft.to_record().is_err());

        draft.set_gas("");
        assert!(draft.to_record().is_err());
    }

    #[test]
    fn test_from_editor() {
        let mut editor = GasPriceEditorStore::new(StoreOptions::new(100_000u64));
        editor.set_gas("50000");
        editor.set_price("1000000000");

        let draft = ResubmitDraft::from_editor(original(), &editor);
        assert_eq!(draft.gas(), "0xc350");
        assert_eq!(draft.gas_price(), "0x3b9aca00");

        editor.set_price("-1");
        let draft = ResubmitDraft::from_editor(original(), &editor);
        assert_eq!(draft.gas(), "0x5208");
    }

    #[tokio::test]
    async fn test_submit() {
        let mut api = MockGasPriceApi::new();
        api.expect_submit_transaction()
            .with(function(|r: &TransactionRecord| {
                r.gas_price == Some(BigInt::from(30_000_000_000u64))
            }))
            .times(1)
            .returning(|_| Ok(H256::repeat_byte(0x09)));

        let mut draft = ResubmitDraft::new(original());
        draft.set_gas_price("0x6fc23ac00");

        let hash = assert_ok!(draft.submit(&api).await);
        assert_eq!(hash, H256::repeat_byte(0x09));
    }

    #[tokio::test]
    async fn test_submit_propagates_failure() {
        let mut api = MockGasPriceApi::new();
        api.expect_submit_transaction()
            .returning(|_| Err(EditorError::Submission("nonce too low".to_string())));

        let draft = ResubmitDraft::new(original());
        assert!(matches!(
            draft.submit(&api).await,
            Err(EditorError::Submission(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_submitted() {
        let mut api = MockGasPriceApi::new();
        api.expect_submit_transaction().never();

        let mut draft = ResubmitDraft::new(original());
        draft.set_gas("lots");
        assert_err!(draft.submit(&api).await);
    }
}
