//! Editing session: a store plus its construction-time reference fetches
//!
//! Opening a session returns immediately. The current gas price and the gas
//! price histogram are fetched in the background and applied through the
//! store's setters when they resolve. Fetch tasks only hold a weak reference
//! to the store, so results arriving after the session is dropped are
//! discarded.

use super::store::{GasPriceEditorStore, StoreOptions};
use crate::api::GasPriceApi;
use crate::metrics;

use futures::future::join_all;
use std::sync::{Arc, Weak};
use std::time::Instant;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Session behaviour not covered by the store itself
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Keep a price the user set after the session opened instead of
    /// replacing it with a late network price
    pub preserve_user_price: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    GasPrice,
    Histogram,
}

impl FetchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchKind::GasPrice => "gas_price",
            FetchKind::Histogram => "histogram",
        }
    }
}

/// What happened to one reference fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No API was given, nothing was fetched
    Skipped,
    Applied,
    /// Resolved after the session was dropped
    Discarded,
    Failed(String),
}

/// Outcome of both construction-time fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub gas_price: FetchOutcome,
    pub histogram: FetchOutcome,
}

impl FetchReport {
    pub fn all_applied(&self) -> bool {
        self.gas_price == FetchOutcome::Applied && self.histogram == FetchOutcome::Applied
    }
}

type SharedStore = Arc<RwLock<GasPriceEditorStore>>;

/// One transaction-edit session
pub struct EditorSession {
    id: Uuid,
    store: SharedStore,
    fetches: Vec<(FetchKind, JoinHandle<FetchOutcome>)>,
    report: Option<FetchReport>,
}

impl EditorSession {
    /// Create the store and start the reference fetches.
    ///
    /// With `api == None`, or outside a tokio runtime, nothing is fetched.
    pub fn open(
        api: Option<Arc<dyn GasPriceApi>>,
        store_options: StoreOptions,
        options: SessionOptions,
    ) -> Self {
        let id = Uuid::new_v4();
        let store = GasPriceEditorStore::new(store_options);
        // Price edits after this point count as user edits
        let baseline = store.price_revision();
        let store = Arc::new(RwLock::new(store));
        let mut fetches = Vec::new();

        match (api, tokio::runtime::Handle::try_current()) {
            (Some(api), Ok(runtime)) => {
                fetches.push((
                    FetchKind::GasPrice,
                    runtime.spawn(fetch_gas_price(
                        api.clone(),
                        Arc::downgrade(&store),
                        id,
                        baseline,
                        options,
                    )),
                ));
                fetches.push((
                    FetchKind::Histogram,
                    runtime.spawn(fetch_histogram(api, Arc::downgrade(&store), id)),
                ));
            }
            (Some(_), Err(_)) => {
                warn!("Session {} opened outside a tokio runtime, skipping reference fetches", id);
            }
            (None, _) => {
                debug!("Session {} opened without API", id);
            }
        }

        info!("Opened gas price editor session {}", id);

        Self {
            id,
            store,
            fetches,
            report: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, GasPriceEditorStore> {
        self.store.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, GasPriceEditorStore> {
        self.store.write().await
    }

    /// Wait for outstanding reference fetches and report how they ended.
    /// Later calls return the same report.
    pub async fn settle(&mut self) -> FetchReport {
        if let Some(report) = &self.report {
            return report.clone();
        }

        let mut report = FetchReport {
            gas_price: FetchOutcome::Skipped,
            histogram: FetchOutcome::Skipped,
        };

        let (kinds, handles): (Vec<_>, Vec<_>) = self.fetches.drain(..).unzip();
        let results = join_all(handles).await;

        for (kind, result) in kinds.into_iter().zip(results) {
            let outcome = result
                .unwrap_or_else(|e| FetchOutcome::Failed(format!("fetch task failed: {}", e)));
            match kind {
                FetchKind::GasPrice => report.gas_price = outcome,
                FetchKind::Histogram => report.histogram = outcome,
            }
        }

        self.report = Some(report.clone());
        report
    }
}

async fn fetch_gas_price(
    api: Arc<dyn GasPriceApi>,
    store: Weak<RwLock<GasPriceEditorStore>>,
    session_id: Uuid,
    baseline_revision: u64,
    options: SessionOptions,
) -> FetchOutcome {
    let started = Instant::now();
    let result = api.fetch_current_gas_price().await;
    metrics::record_fetch(
        FetchKind::GasPrice.as_str(),
        result.is_ok(),
        started.elapsed().as_secs_f64(),
    );

    let price = match result {
        Ok(price) => price,
        Err(e) => {
            warn!("Session {}: gas price fetch failed: {}", session_id, e);
            return FetchOutcome::Failed(e.to_string());
        }
    };

    let Some(store) = store.upgrade() else {
        debug!("Session {} closed before gas price arrived", session_id);
        return FetchOutcome::Discarded;
    };

    let mut store = store.write().await;
    store.set_price_default(price);

    let user_edited = store.price_revision() != baseline_revision;
    if user_edited && options.preserve_user_price {
        debug!("Session {}: keeping user price over network price {}", session_id, price);
    } else {
        if user_edited {
            warn!(
                "Session {}: network price {} replaces user price {:?}",
                session_id,
                price,
                store.price()
            );
        }
        store.set_price(price);
    }

    FetchOutcome::Applied
}

async fn fetch_histogram(
    api: Arc<dyn GasPriceApi>,
    store: Weak<RwLock<GasPriceEditorStore>>,
    session_id: Uuid,
) -> FetchOutcome {
    let started = Instant::now();
    let result = api.fetch_gas_price_histogram().await;
    metrics::record_fetch(
        FetchKind::Histogram.as_str(),
        result.is_ok(),
        started.elapsed().as_secs_f64(),
    );

    let histogram = match result {
        Ok(histogram) => histogram,
        Err(e) => {
            warn!("Session {}: histogram fetch failed: {}", session_id, e);
            return FetchOutcome::Failed(e.to_string());
        }
    };

    match store.upgrade() {
        Some(store) => {
            store.write().await.set_histogram(histogram);
            FetchOutcome::Applied
        }
        None => {
            debug!("Session {} closed before histogram arrived", session_id);
            FetchOutcome::Discarded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockGasPriceApi;
    use crate::editor::GasPriceHistogram;
    use crate::error::EditorError;

    use ethers::types::U256;
    use num_bigint::BigInt;

    const GAS_LIMIT: u64 = 100_000;

    fn histogram() -> GasPriceHistogram {
        GasPriceHistogram::new(vec![BigInt::from(1), BigInt::from(2)], vec![3, 4])
    }

    fn mock_api() -> MockGasPriceApi {
        let mut api = MockGasPriceApi::new();
        api.expect_fetch_current_gas_price()
            .times(1)
            .returning(|| Ok(U256::from(123_456u64)));
        api.expect_fetch_gas_price_histogram()
            .times(1)
            .returning(|| Ok(histogram()));
        api
    }

    #[tokio::test]
    async fn test_open_applies_reference_data() {
        let api: Arc<dyn GasPriceApi> = Arc::new(mock_api());
        let mut session =
            EditorSession::open(Some(api), StoreOptions::new(GAS_LIMIT), SessionOptions::default());

        let report = session.settle().await;
        assert!(report.all_applied());

        let store = session.read().await;
        assert_eq!(store.gas_limit(), &BigInt::from(GAS_LIMIT));
        assert_eq!(store.price(), Some("123456"));
        assert_eq!(store.price_default(), Some("123456"));
        assert!(store.error_price().is_none());
        assert_eq!(store.histogram(), &histogram());
    }

    #[tokio::test]
    async fn test_settle_twice_returns_same_report() {
        let api: Arc<dyn GasPriceApi> = Arc::new(mock_api());
        let mut session =
            EditorSession::open(Some(api), StoreOptions::new(GAS_LIMIT), SessionOptions::default());

        let first = session.settle().await;
        assert!(first.all_applied());
        assert_eq!(session.settle().await, first);
    }

    #[tokio::test]
    async fn test_open_without_api() {
        let mut session =
            EditorSession::open(None, StoreOptions::new(GAS_LIMIT), SessionOptions::default());

        let report = session.settle().await;
        assert_eq!(report.gas_price, FetchOutcome::Skipped);
        assert_eq!(report.histogram, FetchOutcome::Skipped);

        let store = session.read().await;
        assert!(store.price().is_none());
        assert!(store.histogram().is_empty());
    }

    #[test]
    fn test_open_outside_runtime_skips_fetches() {
        let api: Arc<dyn GasPriceApi> = Arc::new(MockGasPriceApi::new());
        let session =
            EditorSession::open(Some(api), StoreOptions::new(GAS_LIMIT), SessionOptions::default());
        assert!(session.fetches.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_reported_and_leaves_defaults() {
        let mut api = MockGasPriceApi::new();
        api.expect_fetch_current_gas_price().returning(|| {
            Err(EditorError::Rpc {
                method: "eth_gasPrice".to_string(),
                message: "connection refused".to_string(),
            })
        });
        api.expect_fetch_gas_price_histogram()
            .returning(|| Ok(histogram()));

        let api: Arc<dyn GasPriceApi> = Arc::new(api);
        let mut session =
            EditorSession::open(Some(api), StoreOptions::new(GAS_LIMIT), SessionOptions::default());

        let report = session.settle().await;
        assert!(matches!(report.gas_price, FetchOutcome::Failed(_)));
        assert_eq!(report.histogram, FetchOutcome::Applied);

        let store = session.read().await;
        assert!(store.price().is_none());
        assert!(store.price_default().is_none());
    }

    #[tokio::test]
    async fn test_late_price_replaces_user_price_by_default() {
        let api: Arc<dyn GasPriceApi> = Arc::new(mock_api());
        let mut session =
            EditorSession::open(Some(api), StoreOptions::new(GAS_LIMIT), SessionOptions::default());

        session.write().await.set_price("1");
        session.settle().await;

        assert_eq!(session.read().await.price(), Some("123456"));
    }

    #[tokio::test]
    async fn test_late_price_keeps_user_price_when_preserving() {
        let api: Arc<dyn GasPriceApi> = Arc::new(mock_api());
        let options = SessionOptions {
            preserve_user_price: true,
        };
        let mut session = EditorSession::open(Some(api), StoreOptions::new(GAS_LIMIT), options);

        session.write().await.set_price("1");
        session.settle().await;

        let store = session.read().await;
        assert_eq!(store.price(), Some("1"));
        assert_eq!(store.price_default(), Some("123456"));
    }

    #[tokio::test]
    async fn test_results_after_drop_are_discarded() {
        let api: Arc<dyn GasPriceApi> = Arc::new(mock_api());
        let mut session =
            EditorSession::open(Some(api), StoreOptions::new(GAS_LIMIT), SessionOptions::default());

        let fetches = std::mem::take(&mut session.fetches);
        let weak = Arc::downgrade(&session.store);
        drop(session);
        assert!(weak.upgrade().is_none());

        for (_, handle) in fetches {
            assert_eq!(handle.await.unwrap(), FetchOutcome::Discarded);
        }
    }
}
