//! Text formatting for local transaction listings

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Average block time used to turn block distances into minutes
const BLOCK_TIME_SECS: u64 = 14;

/// `0x123..cde`; hashes too short to shorten are returned as is
pub fn short_hash(hash: &str) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= 8 {
        return hash.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}..{}", head, tail)
}

/// Gas price in shannon (10^9 wei), e.g. `20.00 shannon`
pub fn format_gas_price(wei: &BigInt) -> String {
    format!(
        "{} shannon",
        format_scaled(wei, &BigInt::from(1_000_000_000u64), 2)
    )
}

/// Gas in millions, e.g. `0.021 MGas`
pub fn format_gas(gas: &BigInt) -> String {
    format!("{} MGas", format_scaled(gas, &BigInt::from(1_000_000u64), 3))
}

/// Whole number with thousands separators, e.g. `20,000,000,000`
pub fn format_integer(value: &BigInt) -> String {
    format_scaled(value, &BigInt::from(1u8), 0)
}

/// Minutes since the transaction was first seen, `never` if it was not
pub fn minutes_since_first_seen(current_block: u64, first_seen: u64) -> String {
    if first_seen == 0 {
        return "never".to_string();
    }
    let blocks = BigInt::from(current_block) - BigInt::from(first_seen);
    let minutes = format_scaled(&(blocks * BLOCK_TIME_SECS), &BigInt::from(60u8), 1);
    format!("{} minutes ago", minutes)
}

/// Where a transaction has been propagated, as reported by the node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationStats {
    /// Block number the transaction was first seen at, 0 if never
    #[serde(default)]
    pub first_seen: u64,
    /// Peer id -> number of times propagated to that peer
    #[serde(default)]
    pub propagated_to: HashMap<String, u64>,
}

impl PropagationStats {
    pub fn peer_count(&self) -> usize {
        self.propagated_to.len()
    }

    pub fn propagation_count(&self) -> u64 {
        self.propagated_to.values().sum()
    }

    /// `5 (2 peers)`
    pub fn summary(&self) -> String {
        format!("{} ({} peers)", self.propagation_count(), self.peer_count())
    }
}

/// `numerator / denominator` rounded half up to `decimals` places, with
/// thousands separators in the integer part
fn format_scaled(numerator: &BigInt, denominator: &BigInt, decimals: u32) -> String {
    let scale = BigInt::from(10u8).pow(decimals);
    let scaled = numerator.abs() * &scale;
    let mut units = &scaled / denominator;
    if (&scaled % denominator) * 2u8 >= *denominator {
        units += 1u8;
    }

    let integer = group_thousands(&(&units / &scale).to_string());
    let sign = if numerator.is_negative() && !units.is_zero() {
        "-"
    } else {
        ""
    };

    if decimals == 0 {
        return format!("{}{}", sign, integer);
    }

    let fraction = (&units % &scale).to_string();
    format!(
        "{}{}.{:0>width$}",
        sign,
        integer,
        fraction,
        width = decimals as usize
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
