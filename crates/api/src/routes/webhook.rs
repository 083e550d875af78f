use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::{auth::require_token, ApiError, AppState};

pub fn webhook_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/webhook/trade/order-market", get(order_market))
        .route("/webhook/trade/order-market-sl", get(order_market_sl))
        .route("/webhook/trade/sell-market", get(sell_market))
        .route_layer(middleware::from_fn_with_state(state, require_token))
}

// ─── Market buy ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OrderMarketQuery {
    symbol: String,
    /// Quote currency to spend.
    #[serde(with = "rust_decimal::serde::str")]
    quantity: Decimal,
}

async fn order_market(
    State(state): State<AppState>,
    Query(q): Query<OrderMarketQuery>,
) -> Result<String, ApiError> {
    info!(symbol = %q.symbol, quantity = %q.quantity, "Webhook: order-market");
    Ok(state.orders.place_market_buy(&q.symbol, q.quantity).await?)
}

// ─── Market buy with stop-loss ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderMarketSlQuery {
    symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    quantity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    /// Fraction below `price`, e.g. 0.05.
    #[serde(with = "rust_decimal::serde::str")]
    sl_percent: Decimal,
}

async fn order_market_sl(
    State(state): State<AppState>,
    Query(q): Query<OrderMarketSlQuery>,
) -> Result<StatusCode, ApiError> {
    info!(
        symbol = %q.symbol,
        quantity = %q.quantity,
        price = %q.price,
        sl_percent = %q.sl_percent,
        "Webhook: order-market-sl"
    );
    state
        .orders
        .place_buy_with_stop_loss(&q.symbol, q.quantity, q.price, q.sl_percent)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

// ─── Sell all ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SellMarketQuery {
    symbol: String,
}

async fn sell_market(
    State(state): State<AppState>,
    Query(q): Query<SellMarketQuery>,
) -> Result<String, ApiError> {
    info!(symbol = %q.symbol, "Webhook: sell-market");
    Ok(state.orders.sell_all(&q.symbol).await?)
}
