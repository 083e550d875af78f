mod auth;
mod error;
pub mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use common::OrderService;

pub use error::ApiError;

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderService>,
    /// Expected `?token=` on webhook routes. `None` leaves them open.
    pub webhook_token: Option<String>,
}

/// The full webhook application: routes, CORS and gzip compression.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::webhook_router(state.clone()))
        .merge(routes::health_router())
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// Build and run the webhook server until `shutdown` resolves.
pub async fn serve<F>(state: AppState, port: u16, shutdown: F) -> common::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, auth = state.webhook_token.is_some(), "Webhook API listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
