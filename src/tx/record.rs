//! Transaction records as exchanged with the node and the editor

use crate::editor::value::{bigint_to_u256, parse_integer};
use crate::error::EditorResult;

use ethers::types::{Address, Bytes, TransactionRequest, H256};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// A transaction-like record. Numeric fields are arbitrary precision and
/// travel as decimal strings (hex strings are accepted on input).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<H256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, with = "opt_bigint", skip_serializing_if = "Option::is_none")]
    pub nonce: Option<BigInt>,
    #[serde(default, with = "opt_bigint", skip_serializing_if = "Option::is_none")]
    pub value: Option<BigInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(default, with = "opt_bigint", skip_serializing_if = "Option::is_none")]
    pub gas: Option<BigInt>,
    #[serde(default, with = "opt_bigint", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<BigInt>,
}

impl TransactionRecord {
    /// Build the request sent through `eth_sendTransaction`
    pub fn to_request(&self) -> EditorResult<TransactionRequest> {
        let mut request = TransactionRequest::new();
        if let Some(from) = self.from {
            request = request.from(from);
        }
        if let Some(to) = self.to {
            request = request.to(to);
        }
        if let Some(ref nonce) = self.nonce {
            request = request.nonce(bigint_to_u256(nonce)?);
        }
        if let Some(ref value) = self.value {
            request = request.value(bigint_to_u256(value)?);
        }
        if let Some(ref data) = self.data {
            request = request.data(data.clone());
        }
        if let Some(ref gas) = self.gas {
            request = request.gas(bigint_to_u256(gas)?);
        }
        if let Some(ref gas_price) = self.gas_price {
            request = request.gas_price(bigint_to_u256(gas_price)?);
        }
        Ok(request)
    }
}

pub(crate) mod opt_bigint {
    use super::*;
    use serde::de::Error;
    use serde::{Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S>(value: &Option<BigInt>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigInt>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Number(n)) => Ok(Some(BigInt::from(n))),
            Some(Repr::Text(s)) => parse_integer(&s).map(Some).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U256;

    #[test]
    fn test_deserialize_mixed_numeric_forms() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"gas": "0x5208", "gasPrice": "20000000000", "nonce": 7}"#)
                .unwrap();
        assert_eq!(record.gas, Some(BigInt::from(21_000)));
        assert_eq!(record.gas_price, Some(BigInt::from(20_000_000_000u64)));
        assert_eq!(record.nonce, Some(BigInt::from(7)));
        assert!(record.value.is_none());
    }

    #[test]
    fn test_rejects_unparsable_numbers() {
        let result: Result<TransactionRecord, _> = serde_json::from_str(r#"{"gas": "lots"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_request() {
        let record = TransactionRecord {
            to: Some(Address::repeat_byte(0x11)),
            gas: Some(BigInt::from(21_000)),
            gas_price: Some(BigInt::from(1_000_000_000u64)),
            ..Default::default()
        };
        let request = record.to_request().unwrap();
        assert_eq!(request.gas, Some(U256::from(21_000u64)));
        assert_eq!(request.gas_price, Some(U256::from(1_000_000_000u64)));
    }

    #[test]
    fn test_to_request_rejects_negative_gas() {
        let record = TransactionRecord {
            gas: Some(BigInt::from(-1)),
            ..Default::default()
        };
        assert!(record.to_request().is_err());
    }
}
