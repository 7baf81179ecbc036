//! Gas price editor - prints the editor state for a new transaction
//!
//! Connects to the configured node, opens an editor session bounded by the
//! latest block's gas limit and prints the resulting snapshot as JSON.
//! Optional arguments: `[gas] [gas_price] [value_wei]`.

use anyhow::{Context, Result};
use gas_price_editor::config::Settings;
use gas_price_editor::editor::value::u256_to_bigint;
use gas_price_editor::editor::{EditorSession, StoreOptions};
use gas_price_editor::{metrics, GasPriceApi, RpcGasPriceApi};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    info!("Starting gas price editor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let settings = Settings::load()?;
    info!("Loaded configuration with {} RPC URL(s)", settings.rpc.urls.len());

    let api = Arc::new(RpcGasPriceApi::new(&settings.rpc)?);
    let gas_limit = api
        .latest_block_gas_limit()
        .await
        .context("Failed to read the latest block gas limit")?;
    info!("Latest block gas limit: {}", gas_limit);

    let options = StoreOptions::new(u256_to_bigint(gas_limit))
        .with_gas(settings.editor.default_gas)
        .with_limits(settings.editor.limits());

    let api: Arc<dyn GasPriceApi> = api;
    let mut session = EditorSession::open(Some(api), options, settings.editor.session_options());

    let report = session.settle().await;
    if !report.all_applied() {
        warn!("Reference data incomplete: {:?}", report);
    }

    {
        let mut store = session.write().await;
        if store.price().is_none() {
            store.set_price(settings.editor.default_gas_price);
        }

        let mut args = std::env::args().skip(1);
        if let Some(gas) = args.next() {
            store.set_gas(gas);
        }
        if let Some(price) = args.next() {
            store.set_price(price);
        }
        if let Some(value) = args.next() {
            store.set_eth_value(value);
        }
    }

    let snapshot = session.read().await.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if settings.metrics.enabled {
        print!("{}", metrics::render()?);
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gas_price_editor=debug,hyper=warn"));

    // stdout carries the snapshot, logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("GAS_EDITOR_LOG_JSON").is_ok() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
