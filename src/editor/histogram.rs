//! Gas price distribution reported by the node

use num_bigint::BigInt;
use serde::{Serialize, Serializer};

/// Bucketed frequency of recently observed gas prices.
///
/// `bucket_bounds` holds `counts.len() + 1` ordered bounds when the node
/// reports a well-formed histogram; the shape is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPriceHistogram {
    #[serde(serialize_with = "serialize_decimals")]
    pub bucket_bounds: Vec<BigInt>,
    pub counts: Vec<u64>,
}

impl GasPriceHistogram {
    pub fn new(bucket_bounds: Vec<BigInt>, counts: Vec<u64>) -> Self {
        Self {
            bucket_bounds,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of observations across all buckets
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Index of the bucket whose `[lower, upper)` range contains `price`.
    /// A price equal to the last bound falls into the last bucket.
    pub fn bucket_index(&self, price: &BigInt) -> Option<usize> {
        let buckets = self.counts.len().min(self.bucket_bounds.len().saturating_sub(1));
        (0..buckets).find(|&i| {
            let lower = &self.bucket_bounds[i];
            let upper = &self.bucket_bounds[i + 1];
            price >= lower && (price < upper || (i + 1 == buckets && price == upper))
        })
    }
}

fn serialize_decimals<S>(values: &[BigInt], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(values.iter().map(|v| v.to_string()))
}
