//! Canonical query strings for signed Binance requests.
//!
//! Binance verifies the signature against the query string exactly as sent,
//! so parameter order is part of the contract. Each request kind has a fixed
//! layout below. Values are not percent-encoded: symbols are restricted to
//! `[A-Z0-9]` when an `OrderRequest` is built, the rest are enum names,
//! integers and decimals.

use std::fmt;

use rust_decimal::Decimal;

use common::{OrderQuantity, OrderRequest, OrderType, RECV_WINDOW_MS};

use super::signing::sign;

/// Ordered `key=value` pairs joined with `&`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(&'static str, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    pub fn push_decimal(self, key: &'static str, value: Decimal) -> Self {
        self.push(key, format_decimal(value))
    }

    pub fn push_opt(self, key: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    pub fn push_opt_decimal(self, key: &'static str, value: Option<Decimal>) -> Self {
        match value {
            Some(v) => self.push_decimal(key, v),
            None => self,
        }
    }

    /// Sign the query as it stands. Nothing can be appended afterwards, so the
    /// signature can never end up inside the payload it covers.
    pub fn sign(self, secret: &str) -> SignedQuery {
        let payload = self.to_string();
        let signature = sign(secret, &payload);
        SignedQuery { payload, signature }
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// A query string together with the signature computed over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    payload: String,
    signature: String,
}

impl SignedQuery {
    /// The exact string that was signed.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// What goes on the wire: the payload followed by `&signature=...`.
    pub fn to_url_query(&self) -> String {
        format!("{}&signature={}", self.payload, self.signature)
    }
}

/// Plain notation with trailing zeros dropped: `95.00` → `95`, `1.234560` → `1.23456`.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Unsigned query for `POST /api/v3/order`.
///
/// Layouts:
/// - quote-sized market: `symbol, side, type, quoteOrderQty, recvWindow, timestamp`
/// - base-sized market: `symbol, side, type, timestamp, quantity, recvWindow`
/// - stop-loss-limit: `symbol, quantity, price, stopPrice, side, type, timeInForce, timestamp`
pub fn order_query(req: &OrderRequest, timestamp: i64) -> QueryString {
    match (req.order_type, req.quantity) {
        (OrderType::Market, OrderQuantity::Quote(quote_qty)) => QueryString::new()
            .push("symbol", &req.symbol)
            .push("side", req.side)
            .push("type", req.order_type)
            .push_decimal("quoteOrderQty", quote_qty)
            .push_opt("recvWindow", req.recv_window)
            .push("timestamp", timestamp),

        (OrderType::Market, OrderQuantity::Base(qty)) => QueryString::new()
            .push("symbol", &req.symbol)
            .push("side", req.side)
            .push("type", req.order_type)
            .push("timestamp", timestamp)
            .push_decimal("quantity", qty)
            .push_opt("recvWindow", req.recv_window),

        (OrderType::StopLossLimit, quantity) => {
            let query = QueryString::new().push("symbol", &req.symbol);
            let query = match quantity {
                OrderQuantity::Base(qty) => query.push_decimal("quantity", qty),
                OrderQuantity::Quote(qty) => query.push_decimal("quoteOrderQty", qty),
            };
            query
                .push_opt_decimal("price", req.price)
                .push_opt_decimal("stopPrice", req.stop_price)
                .push("side", req.side)
                .push("type", req.order_type)
                .push_opt("timeInForce", req.time_in_force)
                .push_opt("recvWindow", req.recv_window)
                .push("timestamp", timestamp)
        }
    }
}

/// Unsigned query for `GET /api/v3/account`.
pub fn account_query(timestamp: i64) -> QueryString {
    QueryString::new()
        .push("timestamp", timestamp)
        .push("recvWindow", RECV_WINDOW_MS)
}
