use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info};

use common::{base_asset, validate_symbol, OrderRequest, OrderService, Result, NO_QUANTITY};

use crate::binance::BinanceClient;
use crate::step_size::{normalize_quantity, step_size_of};

/// Places webhook-triggered spot orders on Binance.
///
/// Every call is a single attempt: no retries, no tracking of the order after
/// the exchange answers. Identical calls are independent orders.
pub struct SpotOrderService {
    client: BinanceClient,
}

impl SpotOrderService {
    pub fn new(client: BinanceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderService for SpotOrderService {
    async fn place_market_buy(&self, symbol: &str, quote_quantity: Decimal) -> Result<String> {
        info!(symbol, %quote_quantity, "Market buy");
        let order = OrderRequest::market_buy(symbol, quote_quantity)?;
        self.client.place_order(&order).await
    }

    async fn place_buy_with_stop_loss(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        sl_percent: Decimal,
    ) -> Result<()> {
        let order = OrderRequest::stop_loss_buy(symbol, quantity, price, sl_percent)?;
        info!(
            symbol,
            %quantity,
            %price,
            stop_price = ?order.stop_price,
            "Stop-loss-limit buy"
        );

        // Fire and forget: the caller only cares that the order went out.
        let body = self.client.place_order(&order).await?;
        debug!(symbol, body = %body, "Stop-loss order response");
        Ok(())
    }

    async fn sell_all(&self, symbol: &str) -> Result<String> {
        validate_symbol(symbol)?;
        let asset = base_asset(symbol);
        let balance = self.client.available_balance(asset).await?;

        if balance <= Decimal::ZERO {
            info!(symbol, asset, %balance, "Nothing to sell");
            return Ok(NO_QUANTITY.to_string());
        }

        let step = step_size_of(symbol)?;
        let quantity = normalize_quantity(balance, step);

        // Dust below one step cannot be sold.
        if quantity.is_zero() {
            info!(symbol, %balance, %step, "Balance below step size, nothing to sell");
            return Ok(NO_QUANTITY.to_string());
        }

        info!(symbol, %balance, %quantity, "Market sell of full balance");
        let order = OrderRequest::market_sell(symbol, quantity)?;
        self.client.place_order(&order).await
    }
}
