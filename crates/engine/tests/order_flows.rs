use mockito::{Matcher, Mock, Server, ServerGuard};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{Credential, Error, OrderService, NO_QUANTITY};
use engine::{BinanceClient, SpotOrderService};

const API_KEY: &str = "test-api-key";
const SECRET: &str = "test-secret";

fn service_for(server: &ServerGuard) -> SpotOrderService {
    let cred = Credential::new(API_KEY, SECRET).unwrap();
    let client = BinanceClient::with_base_url(cred, server.url()).unwrap();
    SpotOrderService::new(client)
}

async fn mock_account(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/api/v3/account")
        .match_query(Matcher::Regex(
            r"^timestamp=\d+&recvWindow=60000&signature=[0-9a-f]{64}$".into(),
        ))
        .match_header("X-MBX-APIKEY", API_KEY)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_any_order(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/api/v3/order")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(0)
        .create_async()
        .await
}

fn account_with(asset: &str, free: &str) -> String {
    format!(
        r#"{{"canTrade":true,"balances":[
            {{"asset":"USDT","free":"250.00000000","locked":"0.00000000"}},
            {{"asset":"{asset}","free":"{free}","locked":"0.00000000"}}
        ]}}"#
    )
}

#[tokio::test]
async fn sell_all_truncates_xrp_to_whole_units() {
    let mut server = Server::new_async().await;
    let account = mock_account(&mut server, 200, &account_with("XRP", "100.70000000")).await;
    let order = server
        .mock("POST", "/api/v3/order")
        .match_query(Matcher::Regex(
            r"^symbol=XRPUSDT&side=SELL&type=MARKET&timestamp=\d+&quantity=100&recvWindow=60000&signature=[0-9a-f]{64}$"
                .into(),
        ))
        .match_header("X-MBX-APIKEY", API_KEY)
        .with_status(200)
        .with_body(r#"{"symbol":"XRPUSDT","status":"FILLED"}"#)
        .create_async()
        .await;

    let body = service_for(&server).sell_all("XRPUSDT").await.unwrap();

    assert_eq!(body, r#"{"symbol":"XRPUSDT","status":"FILLED"}"#);
    account.assert_async().await;
    order.assert_async().await;
}

#[tokio::test]
async fn sell_all_truncates_btc_to_step() {
    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server, 200, &account_with("BTC", "1.23456700")).await;
    let order = server
        .mock("POST", "/api/v3/order")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCUSDT".into()),
            Matcher::UrlEncoded("quantity".into(), "1.23456".into()),
        ]))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    service_for(&server).sell_all("BTCUSDT").await.unwrap();
    order.assert_async().await;
}

#[tokio::test]
async fn sell_all_with_zero_balance_places_no_order() {
    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server, 200, &account_with("ETH", "0.00000000")).await;
    let order = mock_any_order(&mut server).await;

    let body = service_for(&server).sell_all("ETHUSDT").await.unwrap();

    assert_eq!(body, NO_QUANTITY);
    order.assert_async().await;
}

#[tokio::test]
async fn sell_all_with_missing_asset_places_no_order() {
    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server, 200, &account_with("BTC", "3.00000000")).await;
    let order = mock_any_order(&mut server).await;

    let body = service_for(&server).sell_all("SOLUSDT").await.unwrap();

    assert_eq!(body, NO_QUANTITY);
    order.assert_async().await;
}

#[tokio::test]
async fn sell_all_dust_below_step_places_no_order() {
    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server, 200, &account_with("DOGE", "0.75000000")).await;
    let order = mock_any_order(&mut server).await;

    let body = service_for(&server).sell_all("DOGEUSDT").await.unwrap();

    assert_eq!(body, NO_QUANTITY);
    order.assert_async().await;
}

#[tokio::test]
async fn account_rejection_is_treated_as_no_balance() {
    let mut server = Server::new_async().await;
    let _account = mock_account(
        &mut server,
        401,
        r#"{"code":-2015,"msg":"Invalid API-key, IP, or permissions for action."}"#,
    )
    .await;
    let order = mock_any_order(&mut server).await;

    let body = service_for(&server).sell_all("BTCUSDT").await.unwrap();

    assert_eq!(body, NO_QUANTITY);
    order.assert_async().await;
}

#[tokio::test]
async fn sell_all_unsupported_symbol_fails_before_ordering() {
    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server, 200, &account_with("PEPE", "5000.00000000")).await;
    let order = mock_any_order(&mut server).await;

    let err = service_for(&server).sell_all("PEPEUSDT").await.unwrap_err();

    assert!(matches!(err, Error::UnsupportedSymbol(s) if s == "PEPEUSDT"));
    order.assert_async().await;
}

#[tokio::test]
async fn malformed_account_payload_is_an_error() {
    let mut server = Server::new_async().await;
    let _account = mock_account(&mut server, 200, "not json").await;

    let err = service_for(&server).sell_all("BTCUSDT").await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn market_buy_sends_quote_quantity_and_returns_raw_body() {
    let mut server = Server::new_async().await;
    let order = server
        .mock("POST", "/api/v3/order")
        .match_query(Matcher::Regex(
            r"^symbol=BTCUSDT&side=BUY&type=MARKET&quoteOrderQty=50&recvWindow=60000&timestamp=\d+&signature=[0-9a-f]{64}$"
                .into(),
        ))
        .match_header("X-MBX-APIKEY", API_KEY)
        .with_status(200)
        .with_body(r#"{"symbol":"BTCUSDT","orderId":28,"status":"FILLED"}"#)
        .create_async()
        .await;

    let body = service_for(&server)
        .place_market_buy("BTCUSDT", dec!(50))
        .await
        .unwrap();

    assert_eq!(body, r#"{"symbol":"BTCUSDT","orderId":28,"status":"FILLED"}"#);
    order.assert_async().await;
}

#[tokio::test]
async fn market_buy_rejection_body_is_passed_through() {
    let mut server = Server::new_async().await;
    let rejection = r#"{"code":-2010,"msg":"Account has insufficient balance for requested action."}"#;
    let _order = server
        .mock("POST", "/api/v3/order")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(rejection)
        .create_async()
        .await;

    let body = service_for(&server)
        .place_market_buy("ETHUSDT", dec!(10))
        .await
        .unwrap();

    assert_eq!(body, rejection);
}

#[tokio::test]
async fn market_buy_with_empty_response_returns_empty_string() {
    let mut server = Server::new_async().await;
    let _order = server
        .mock("POST", "/api/v3/order")
        .match_query(Matcher::Any)
        .with_status(200)
        .create_async()
        .await;

    let body = service_for(&server)
        .place_market_buy("ETHUSDT", dec!(10))
        .await
        .unwrap();

    assert!(body.is_empty());
}

#[tokio::test]
async fn stop_loss_buy_sends_computed_trigger_price() {
    let mut server = Server::new_async().await;
    let order = server
        .mock("POST", "/api/v3/order")
        .match_query(Matcher::Regex(
            r"^symbol=SOLUSDT&quantity=2&price=100&stopPrice=95&side=BUY&type=STOP_LOSS_LIMIT&timeInForce=GTC&timestamp=\d+&signature=[0-9a-f]{64}$"
                .into(),
        ))
        .match_header("X-MBX-APIKEY", API_KEY)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    service_for(&server)
        .place_buy_with_stop_loss("SOLUSDT", dec!(2), dec!(100), dec!(0.05))
        .await
        .unwrap();

    order.assert_async().await;
}

#[tokio::test]
async fn stop_loss_rejection_is_not_surfaced() {
    let mut server = Server::new_async().await;
    let _order = server
        .mock("POST", "/api/v3/order")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"code":-1013,"msg":"Filter failure: PRICE_FILTER"}"#)
        .create_async()
        .await;

    let result = service_for(&server)
        .place_buy_with_stop_loss("SOLUSDT", dec!(2), dec!(100), dec!(0.05))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn stop_loss_with_overflowing_trigger_price_sends_nothing() {
    let mut server = Server::new_async().await;
    let order = mock_any_order(&mut server).await;

    let err = service_for(&server)
        .place_buy_with_stop_loss("SOLUSDT", dec!(2), Decimal::MAX, dec!(2))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidOrder(_)));
    order.assert_async().await;
}

#[tokio::test]
async fn symbol_carrying_extra_parameters_is_never_sent() {
    let mut server = Server::new_async().await;
    let account = server
        .mock("GET", "/api/v3/account")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let order = mock_any_order(&mut server).await;
    let service = service_for(&server);

    let err = service
        .place_market_buy("BTCUSDT&quantity=999", dec!(50))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOrder(_)));

    let err = service
        .place_buy_with_stop_loss("SOLUSDT&side=SELL", dec!(2), dec!(100), dec!(0.05))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOrder(_)));

    let err = service.sell_all("BTCUSDT&type=LIMIT").await.unwrap_err();
    assert!(matches!(err, Error::InvalidOrder(_)));

    account.assert_async().await;
    order.assert_async().await;
}

#[tokio::test]
async fn unreachable_exchange_is_a_network_error() {
    let cred = Credential::new(API_KEY, SECRET).unwrap();
    let client = BinanceClient::with_base_url(cred, "http://127.0.0.1:1").unwrap();
    let service = SpotOrderService::new(client);

    let err = service.place_market_buy("BTCUSDT", dec!(50)).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));

    let err = service.sell_all("BTCUSDT").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
