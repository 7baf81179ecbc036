//! JSON-RPC implementation of [`GasPriceApi`] with multi-URL failover

use super::GasPriceApi;
use crate::config::RpcConfig;
use crate::editor::value::u256_to_bigint;
use crate::editor::GasPriceHistogram;
use crate::error::{EditorError, EditorResult};
use crate::metrics;
use crate::tx::TransactionRecord;

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{BlockNumber, H256, U256};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Histogram as returned by `parity_gasPriceHistogram`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireHistogram {
    bucket_bounds: Vec<U256>,
    counts: Vec<u64>,
}

impl From<WireHistogram> for GasPriceHistogram {
    fn from(wire: WireHistogram) -> Self {
        GasPriceHistogram::new(
            wire.bucket_bounds.into_iter().map(u256_to_bigint).collect(),
            wire.counts,
        )
    }
}

/// Multi-provider wrapper with automatic failover
pub struct RpcGasPriceApi {
    /// HTTP providers (multiple for failover)
    http_providers: Vec<Provider<Http>>,
    /// Current active provider index
    current_provider: AtomicUsize,
    /// Per-request timeout
    request_timeout: Duration,
}

impl RpcGasPriceApi {
    /// Create providers for every configured URL
    pub fn new(config: &RpcConfig) -> EditorResult<Self> {
        let mut http_providers = Vec::new();

        for url in &config.urls {
            match Provider::<Http>::try_from(url.as_str()) {
                Ok(provider) => {
                    http_providers.push(provider);
                    debug!("Added HTTP provider: {}", url);
                }
                Err(e) => {
                    warn!("Failed to create provider for {}: {}", url, e);
                }
            }
        }

        if http_providers.is_empty() {
            return Err(EditorError::Config("No valid RPC providers".to_string()));
        }

        info!("RPC client ready with {} provider(s)", http_providers.len());

        Ok(Self {
            http_providers,
            current_provider: AtomicUsize::new(0),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    /// Get the active HTTP provider
    pub fn http(&self) -> &Provider<Http> {
        let idx = self.current_provider.load(Ordering::Relaxed);
        &self.http_providers[idx % self.http_providers.len()]
    }

    /// Switch to next available provider
    pub fn failover(&self) {
        let current = self.current_provider.load(Ordering::Relaxed);
        let next = (current + 1) % self.http_providers.len();
        self.current_provider.store(next, Ordering::Relaxed);
        warn!("RPC failover to provider {}", next);
    }

    /// Gas limit of the latest block, used to bound edited gas values
    pub async fn latest_block_gas_limit(&self) -> EditorResult<U256> {
        for _ in 0..self.http_providers.len() {
            match timeout(self.request_timeout, self.http().get_block(BlockNumber::Latest)).await {
                Ok(Ok(Some(block))) => return Ok(block.gas_limit),
                Ok(Ok(None)) => {
                    return Err(rpc_error("eth_getBlockByNumber", "No latest block"));
                }
                Ok(Err(e)) => {
                    warn!("Failed to get latest block: {}", e);
                    self.failover();
                }
                Err(_) => {
                    warn!("Timed out getting latest block");
                    self.failover();
                }
            }
        }

        Err(rpc_error("eth_getBlockByNumber", "All providers failed"))
    }
}

#[async_trait]
impl GasPriceApi for RpcGasPriceApi {
    async fn fetch_current_gas_price(&self) -> EditorResult<U256> {
        for _ in 0..self.http_providers.len() {
            match timeout(self.request_timeout, self.http().get_gas_price()).await {
                Ok(Ok(price)) => {
                    debug!("Network gas price: {}", price);
                    return Ok(price);
                }
                Ok(Err(e)) => {
                    warn!("Failed to get gas price: {}", e);
                    self.failover();
                }
                Err(_) => {
                    warn!("Timed out getting gas price");
                    self.failover();
                }
            }
        }

        Err(rpc_error("eth_gasPrice", "All providers failed"))
    }

    async fn fetch_gas_price_histogram(&self) -> EditorResult<GasPriceHistogram> {
        for _ in 0..self.http_providers.len() {
            let request = self
                .http()
                .request::<_, WireHistogram>("parity_gasPriceHistogram", ());
            match timeout(self.request_timeout, request).await {
                Ok(Ok(histogram)) => return Ok(histogram.into()),
                Ok(Err(e)) => {
                    warn!("Failed to get gas price histogram: {}", e);
                    self.failover();
                }
                Err(_) => {
                    warn!("Timed out getting gas price histogram");
                    self.failover();
                }
            }
        }

        Err(rpc_error("parity_gasPriceHistogram", "All providers failed"))
    }

    async fn submit_transaction(&self, record: &TransactionRecord) -> EditorResult<H256> {
        let request = record.to_request()?;

        // Not retried on other providers: a timed out submission may still
        // have reached the node.
        let result = match timeout(
            self.request_timeout,
            self.http().send_transaction(request, None),
        )
        .await
        {
            Ok(Ok(pending)) => Ok(pending.tx_hash()),
            Ok(Err(e)) => Err(EditorError::Submission(e.to_string())),
            Err(_) => Err(EditorError::Timeout {
                operation: "eth_sendTransaction".to_string(),
            }),
        };

        metrics::record_tx_submitted(result.is_ok());
        if let Ok(hash) = &result {
            info!("Submitted transaction {:?}", hash);
        }
        result
    }
}

fn rpc_error(method: &str, message: &str) -> EditorError {
    EditorError::Rpc {
        method: method.to_string(),
        message: message.to_string(),
    }
}
