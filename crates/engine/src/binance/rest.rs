use chrono::Utc;
use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use common::config::DEFAULT_BASE_URL;
use common::{Balance, Credential, Error, OrderRequest, Result};

use super::query::{account_query, order_query, SignedQuery};

const ORDER_PATH: &str = "/api/v3/order";
const ACCOUNT_PATH: &str = "/api/v3/account";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// REST API client for Binance spot. Used for order placement and account queries.
///
/// Holds one `reqwest::Client`, so connections are reused across calls.
/// Safe to share between tasks; nothing in it is mutable.
pub struct BinanceClient {
    credential: Credential,
    base_url: String,
    http: Client,
}

impl BinanceClient {
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_base_url(credential, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. the spot testnet.
    pub fn with_base_url(credential: Credential, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            credential,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn timestamp_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Send a signed request and return status and body. Only transport
    /// failures are errors here; status handling is up to the caller.
    async fn send_signed(
        &self,
        method: Method,
        path: &str,
        query: &SignedQuery,
    ) -> Result<(StatusCode, String)> {
        let url = format!("{}{path}?{}", self.base_url, query.to_url_query());

        let resp = self
            .http
            .request(method, &url)
            .header(API_KEY_HEADER, self.credential.api_key())
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        Ok((status, body))
    }

    /// Place an order and return the exchange's raw response body.
    ///
    /// A rejection (non-2xx) is not an error: the body carries the exchange's
    /// error payload and is handed back unchanged.
    pub async fn place_order(&self, order: &OrderRequest) -> Result<String> {
        let query = order_query(order, Self::timestamp_ms()).sign(self.credential.secret_key());

        debug!(
            symbol = %order.symbol,
            side = %order.side,
            order_type = %order.order_type,
            "Submitting order to Binance"
        );
        let (status, body) = self.send_signed(Method::POST, ORDER_PATH, &query).await?;

        if status.is_success() {
            info!(symbol = %order.symbol, side = %order.side, %status, "Order accepted");
        } else {
            warn!(symbol = %order.symbol, side = %order.side, %status, body = %body, "Order rejected by exchange");
        }
        Ok(body)
    }

    /// Free balance of `asset`, zero if the account holds none.
    ///
    /// A non-2xx answer from the account endpoint also yields zero, with a
    /// warning. Transport errors and malformed payloads are returned as errors.
    pub async fn available_balance(&self, asset: &str) -> Result<Decimal> {
        let query = account_query(Self::timestamp_ms()).sign(self.credential.secret_key());
        let (status, body) = self.send_signed(Method::GET, ACCOUNT_PATH, &query).await?;

        if !status.is_success() {
            warn!(%status, asset, "Error getting account info, treating balance as zero");
            return Ok(Decimal::ZERO);
        }

        let account: AccountResponse = serde_json::from_str(&body)?;
        let free = free_balance(&account.balances, asset);
        debug!(asset, %free, "Available balance");
        Ok(free)
    }
}

fn free_balance(balances: &[Balance], asset: &str) -> Decimal {
    balances
        .iter()
        .find(|b| b.asset == asset)
        .map(|b| b.free)
        .unwrap_or(Decimal::ZERO)
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AccountResponse {
    balances: Vec<Balance>,
}
