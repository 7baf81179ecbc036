//! Numeric input handling for editor fields
//!
//! Values arrive as user-typed strings or as numbers from the node. They are
//! kept verbatim for display and parsed into arbitrary precision integers for
//! validation and arithmetic.

use crate::error::{EditorError, EditorResult};

use ethers::types::U256;
use num_bigint::{BigInt, Sign};

/// A raw field value together with its integer interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericInput {
    raw: String,
    parsed: Option<BigInt>,
}

impl NumericInput {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_integer(&raw).ok();
        Self { raw, parsed }
    }

    /// The value as provided
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Integer value, `None` if the input does not parse
    pub fn value(&self) -> Option<&BigInt> {
        self.parsed.as_ref()
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NumericInput {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for NumericInput {
    fn from(s: &String) -> Self {
        Self::new(s.as_str())
    }
}

impl From<BigInt> for NumericInput {
    fn from(v: BigInt) -> Self {
        Self {
            raw: v.to_string(),
            parsed: Some(v),
        }
    }
}

impl From<&BigInt> for NumericInput {
    fn from(v: &BigInt) -> Self {
        v.clone().into()
    }
}

impl From<U256> for NumericInput {
    fn from(v: U256) -> Self {
        u256_to_bigint(v).into()
    }
}

macro_rules! numeric_input_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for NumericInput {
                fn from(v: $t) -> Self {
                    BigInt::from(v).into()
                }
            }
        )*
    };
}

numeric_input_from_primitive!(i32, i64, u32, u64, u128);

/// Parse a decimal or `0x`-prefixed hexadecimal integer, optionally signed
pub fn parse_integer(input: &str) -> EditorResult<BigInt> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (digits, radix) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (unsigned, 10),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(EditorError::InvalidNumber(input.to_string()));
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| EditorError::InvalidNumber(input.to_string()))?;

    Ok(if negative { -magnitude } else { magnitude })
}

pub fn u256_to_bigint(value: U256) -> BigInt {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    BigInt::from_bytes_be(Sign::Plus, &bytes)
}

/// Convert to the 256-bit wire type, rejecting negative or oversized values
pub fn bigint_to_u256(value: &BigInt) -> EditorResult<U256> {
    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus || bytes.len() > 32 {
        return Err(EditorError::InvalidNumber(value.to_string()));
    }
    Ok(U256::from_big_endian(&bytes))
}
