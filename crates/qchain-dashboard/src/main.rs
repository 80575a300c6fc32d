//! QuantumChain Dashboard binary entry point.

use std::path::PathBuf;
use std::sync::Arc;

use qchain_ai::{GeminiClient, StaticGenerator, TextGenerator};
use qchain_core::{QchainConfig, UserDirectory};
use qchain_ledger::{ContractLedger, ExplorerClient, Ledger};

use qchain_dashboard::{AppState, TracingConfig, create_router, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration file is optional; environment overrides always apply
    let config_path = std::env::var("QCHAIN_CONFIG").ok().map(PathBuf::from);
    let config = QchainConfig::load(config_path.as_deref())
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    init_tracing(&TracingConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    let bind_addr = config.bind_address()?;

    let ledger = ContractLedger::connect(&config.network, &config.ledger)?;
    if ledger.submitter().is_none() {
        tracing::warn!("No service account key configured; job logging is disabled");
    }
    let rpc = ledger.rpc().clone();
    tracing::info!(
        rpc = %config.network.rpc_url,
        contract = %config.network.contract_address,
        mode = %ledger.query_mode(),
        "Connected ledger"
    );

    let generator: Arc<dyn TextGenerator> = match GeminiClient::from_settings(&config.ai) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!(error = %e, "AI features disabled");
            Arc::new(StaticGenerator::unavailable())
        }
    };

    let users = match &config.server.users_file {
        Some(path) => UserDirectory::open(path)?,
        None => UserDirectory::with_defaults(),
    };

    let explorer = ExplorerClient::new(config.network.stats_url())?;

    let state = Arc::new(
        AppState::new(config, Arc::new(ledger), generator)
            .with_users(users)
            .with_rpc(rpc)
            .with_explorer(explorer),
    );

    let app = create_router(state);

    tracing::info!("Starting QuantumChain Dashboard at http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
