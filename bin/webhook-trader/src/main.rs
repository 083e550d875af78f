use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::{Config, OrderService};
use engine::{BinanceClient, SpotOrderService};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "webhook-trader stopped");
        std::process::exit(1);
    }
}

async fn run() -> common::Result<()> {
    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env()?;
    info!(base_url = %cfg.binance_base_url, port = cfg.webhook_port, "webhook-trader starting");

    // ── Exchange client + order service ───────────────────────────────────────
    let client = BinanceClient::with_base_url(cfg.credential.clone(), &cfg.binance_base_url)?;
    let orders: Arc<dyn OrderService> = Arc::new(SpotOrderService::new(client));

    // ── Webhook API ───────────────────────────────────────────────────────────
    let state = api::AppState {
        orders,
        webhook_token: cfg.webhook_token.clone(),
    };

    api::serve(state, cfg.webhook_port, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received. Exiting.");
    })
    .await
}
