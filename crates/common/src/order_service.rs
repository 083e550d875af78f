use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::Result;

/// Result of `sell_all` when there is nothing to sell.
pub const NO_QUANTITY: &str = "quantity 0";

/// The order operations exposed to the webhook layer.
///
/// `SpotOrderService` in `crates/engine` implements this against Binance.
/// Exchange-specific types never cross this boundary: callers pass plain
/// symbols and amounts and get the exchange's raw response back.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Market buy spending `quote_quantity` of the quote currency.
    /// Returns the raw response body, empty if the exchange sent none.
    async fn place_market_buy(&self, symbol: &str, quote_quantity: Decimal) -> Result<String>;

    /// Place a stop-loss-limit buy with its trigger `sl_percent` below `price`.
    /// The response is not returned.
    async fn place_buy_with_stop_loss(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        sl_percent: Decimal,
    ) -> Result<()>;

    /// Market sell of the whole free balance of the symbol's base asset.
    /// Returns [`NO_QUANTITY`] without placing an order when the balance is not positive.
    async fn sell_all(&self, symbol: &str) -> Result<String>;
}
