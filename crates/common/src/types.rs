use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tolerance in milliseconds for clock drift between us and the exchange.
pub const RECV_WINDOW_MS: u64 = 60_000;

/// Quote currency shared by every supported trading pair.
pub const QUOTE_ASSET: &str = "USDT";

/// Base asset of a trading pair: `"ETHUSDT"` → `"ETH"`.
///
/// Symbols without the quote suffix are returned unchanged.
pub fn base_asset(symbol: &str) -> &str {
    symbol.strip_suffix(QUOTE_ASSET).unwrap_or(symbol)
}

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    StopLossLimit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::StopLossLimit => write!(f, "STOP_LOSS_LIMIT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled.
    Gtc,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::Gtc => write!(f, "GTC"),
        }
    }
}

/// How an order is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderQuantity {
    /// Units of the base asset (`quantity`).
    Base(Decimal),
    /// Amount of quote currency to spend (`quoteOrderQty`), market buys only.
    Quote(Decimal),
}

/// A single order intent, before timestamping and signing.
///
/// Use the constructors; each one fixes the side, type and parameter set the
/// exchange expects for that flow, and rejects a symbol that could alter the
/// signed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: OrderQuantity,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    /// Not sent with stop-loss-limit orders.
    pub recv_window: Option<u64>,
}

impl OrderRequest {
    /// Market buy sized in quote currency ("spend 50 USDT on BTC").
    pub fn market_buy(symbol: impl Into<String>, quote_quantity: Decimal) -> Result<Self> {
        Ok(Self {
            symbol: validated_symbol(symbol.into())?,
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: OrderQuantity::Quote(quote_quantity),
            price: None,
            stop_price: None,
            time_in_force: None,
            recv_window: Some(RECV_WINDOW_MS),
        })
    }

    /// Stop-loss-limit buy with its trigger `sl_percent` below `price`.
    /// `sl_percent` is a fraction: 0.05 means 5%.
    pub fn stop_loss_buy(
        symbol: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
        sl_percent: Decimal,
    ) -> Result<Self> {
        Ok(Self {
            symbol: validated_symbol(symbol.into())?,
            side: OrderSide::Buy,
            order_type: OrderType::StopLossLimit,
            quantity: OrderQuantity::Base(quantity),
            price: Some(price),
            stop_price: Some(stop_price(price, sl_percent)?),
            time_in_force: Some(TimeInForce::Gtc),
            recv_window: None,
        })
    }

    /// Market sell of `quantity` base units.
    pub fn market_sell(symbol: impl Into<String>, quantity: Decimal) -> Result<Self> {
        Ok(Self {
            symbol: validated_symbol(symbol.into())?,
            side: OrderSide::Sell,
            order_type: OrderType::Market,
            quantity: OrderQuantity::Base(quantity),
            price: None,
            stop_price: None,
            time_in_force: None,
            recv_window: Some(RECV_WINDOW_MS),
        })
    }
}

/// Symbols are sent unencoded inside the signed query, so only upper-case
/// ASCII letters and digits are accepted.
pub fn validate_symbol(symbol: &str) -> Result<()> {
    let well_formed = !symbol.is_empty()
        && symbol
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

    if well_formed {
        Ok(())
    } else {
        Err(Error::InvalidOrder(format!("malformed symbol '{symbol}'")))
    }
}

fn validated_symbol(symbol: String) -> Result<String> {
    validate_symbol(&symbol)?;
    Ok(symbol)
}

/// `price - price * sl_percent`, or an error if it does not fit a `Decimal`.
pub fn stop_price(price: Decimal, sl_percent: Decimal) -> Result<Decimal> {
    price
        .checked_mul(sl_percent)
        .and_then(|offset| price.checked_sub(offset))
        .ok_or_else(|| {
            Error::InvalidOrder(format!(
                "stop price overflows for price {price} and slPercent {sl_percent}"
            ))
        })
}

/// One asset entry of an account snapshot. Amounts arrive as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Balance {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub free: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub locked: Decimal,
}
