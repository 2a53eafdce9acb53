//! Gateway Route Tests
//!
//! Drives the router in-process with `oneshot` against a bootstrapped
//! exchange that has seen one buy.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use contracts::{ExchangeConfig, TokenConfig};
use gateway::deploy::{bootstrap, DeployConfig};
use gateway::rate_limit::RateLimitConfig;
use gateway::router::create_router;
use gateway::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use types::ids::Address;
use types::numeric::Amount;

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_list_tokens() {
    let (app, token) = setup(RateLimitConfig::default());
    let (status, body) = get(app, "/tokens").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([token.to_string()]));
}

#[tokio::test]
async fn test_token_metadata() {
    let (app, token) = setup(RateLimitConfig::default());
    let (status, body) = get(app, &format!("/tokens/{}", token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "TestTokenDex");
    assert_eq!(body["symbol"], "TTD");
    assert_eq!(body["decimals"], 2);
    assert_eq!(body["totalSupply"], "500000000000000");
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let (app, _) = setup(RateLimitConfig::default());
    let unknown = Address::repeat_byte(0x99);
    let (status, body) = get(app, &format!("/tokens/{}", unknown)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_token_is_bad_request() {
    let (app, _) = setup(RateLimitConfig::default());
    let (status, body) = get(app, "/dex/rates/not-an-address").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
}

// ═══════════════════════════════════════════════════════════════════
// Exchange State
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_rates() {
    let (app, token) = setup(RateLimitConfig::default());
    let (status, body) = get(app, &format!("/dex/rates/{}", token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["buyRate"], "10000");
    assert_eq!(body["sellRate"], "5000");
}

#[tokio::test]
async fn test_trades_counted() {
    let (app, token) = setup(RateLimitConfig::default());
    let (status, body) = get(app, &format!("/dex/trades/{}", token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["buys"], "1");
    assert_eq!(body["sales"], "0");
}

#[tokio::test]
async fn test_max_exchange_eth_is_custody_after_fee() {
    let (app, _) = setup(RateLimitConfig::default());
    let (status, body) = get_text(app, "/dex/max_exchange/eth").await;

    // 1e14 paid, half forwarded to the owner
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "50000000000000");
}

#[tokio::test]
async fn test_max_exchange_token_is_inventory_after_buy() {
    let (app, token) = setup(RateLimitConfig::default());
    let (status, body) = get_text(app, &format!("/dex/max_exchange/{}", token)).await;

    // 1e14 / 10000 = 1e10 units sold out of 5e14
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "499990000000000");
}

#[tokio::test]
async fn test_unregistered_token_reports_zeros() {
    let (app, _) = setup(RateLimitConfig::default());
    let unknown = Address::repeat_byte(0x99);

    let (status, trades) = get(app.clone(), &format!("/dex/trades/{}", unknown)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trades, serde_json::json!({ "buys": "0", "sales": "0" }));

    let (status, custody) = get_text(app, &format!("/dex/max_exchange/{}", unknown)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(custody, "0");
}

#[tokio::test]
async fn test_rates_of_unregistered_token_are_readable() {
    let (app, _) = setup(RateLimitConfig::default());
    let (status, body) = get(app, &format!("/dex/rates/{}", unlisted())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["buyRate"], "7");
    assert_eq!(body["sellRate"], "3");
}

// ═══════════════════════════════════════════════════════════════════
// Throttling
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let (app, _) = setup(RateLimitConfig {
        capacity: 1,
        refill_per_sec: 0.0,
    });

    let (first, _) = get(app.clone(), "/tokens").await;
    let (second, body) = get(app, "/tokens").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "RATE_LIMIT_EXCEEDED");
}

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn setup(limits: RateLimitConfig) -> (Router, Address) {
    let deployer = Address::repeat_byte(0xde);
    let config = DeployConfig {
        deployer,
        exchange: ExchangeConfig::default(),
        token: TokenConfig::new("TestTokenDex", "TTD", 2, Amount::from(500_000_000_000_000u64)),
        rates: Some((Amount::from(10_000u64), Amount::from(5_000u64))),
    };
    let mut deployment = bootstrap(&config).unwrap();

    let buyer = Address::repeat_byte(0xbb);
    let paid = Amount::from(100_000_000_000_000u64);
    deployment.exchange.fund_account(buyer, paid).unwrap();
    deployment
        .exchange
        .buy_tokens(buyer, deployment.token, paid)
        .unwrap();
    deployment
        .exchange
        .setup_rates(deployer, unlisted(), Amount::from(7u64), Amount::from(3u64))
        .unwrap();

    let state = AppState::new(deployment.exchange, limits);
    (create_router(state), deployment.token)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn unlisted() -> Address {
    Address::repeat_byte(0x42)
}
