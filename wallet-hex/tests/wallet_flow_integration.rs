//! Integration tests for the HTTP adapter.
//!
//! These drive the full router (auth middleware, rate limiting, handlers)
//! against an in-memory SQLite repository and a scripted rate provider.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tower::ServiceExt;

use wallet_hex::{WalletService, inbound::HttpServer};
use wallet_repo::SqliteRepo;
use wallet_types::ports::rates::{RateError, RateProvider};
use wallet_types::{Currency, RateTable};

/// Fixed-table rate provider standing in for the cache manager.
struct FixedRates(RateTable);

#[async_trait::async_trait]
impl RateProvider for FixedRates {
    async fn get_rates(&self) -> Result<RateTable, RateError> {
        Ok(self.0.clone())
    }
}

fn rates() -> RateTable {
    let mut map = HashMap::new();
    map.insert(Currency::EUR, "4.30".parse().unwrap());
    map.insert(Currency::USD, "3.95".parse().unwrap());
    RateTable::new(map, NaiveDate::from_ymd_opt(2025, 2, 24).unwrap())
}

async fn test_app() -> Router {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = WalletService::new(repo, FixedRates(rates()));
    HttpServer::new(service).router()
}

async fn test_app_with_rate_limit(requests_per_minute: u32) -> Router {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = WalletService::new(repo, FixedRates(rates()));
    HttpServer::with_rate_limit(service, requests_per_minute).router()
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router) {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/registration",
            serde_json::json!({
                "first_name": "Jan",
                "last_name": "Kowalski",
                "email": "jan@example.com",
                "username": "jank",
                "password": "secret123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/login",
            serde_json::json!({"username": "jank", "password": "secret123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["token_type"], "bearer");
    json["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_full_wallet_flow() {
    let app = test_app().await;
    register(&app).await;
    let token = login(&app).await;

    // add 100 EUR
    let response = app
        .clone()
        .oneshot(authed_request(Method::POST, "/wallet/add/EUR/100", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["wallet_report"][0]["currency"], "EUR");
    assert_eq!(json["wallet_report"][0]["value_pln"], 430.0);
    assert_eq!(json["total_in_pln"], 430.0);
    assert_eq!(json["effective_date"], "2025-02-24");

    // full report
    let response = app
        .clone()
        .oneshot(authed_request(Method::GET, "/wallet", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["wallet_report"][0]["value_pln"], 430.0);
    assert_eq!(json["total_pln"], 430.0);

    // profile carries the same total
    let response = app
        .clone()
        .oneshot(authed_request(Method::GET, "/me", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["balance_in_PLN"], 430.0);

    // drain the wallet completely
    let response = app
        .clone()
        .oneshot(authed_request(Method::POST, "/wallet/sub/EUR/100", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // the row is gone: the report now says the wallet is empty
    let response = app
        .clone()
        .oneshot(authed_request(Method::GET, "/wallet", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["message"].as_str().is_some());
    assert_eq!(json["total_in_pln"], 0.0);
}

#[tokio::test]
async fn test_protected_endpoints_require_token() {
    let app = test_app().await;

    for uri in ["/me", "/wallet"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{uri} should require a token"
        );
    }
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(authed_request(Method::GET, "/wallet", "wtk_forged"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unsupported_currency_is_bad_request() {
    let app = test_app().await;
    register(&app).await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_request(Method::POST, "/wallet/add/PLN/10", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not supported"));
}

#[tokio::test]
async fn test_insufficient_funds_is_bad_request() {
    let app = test_app().await;
    register(&app).await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_request(Method::POST, "/wallet/sub/EUR/5", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Insufficient funds"));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = test_app().await;
    register(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/registration",
            serde_json::json!({
                "first_name": "Jan",
                "last_name": "Kowalski",
                "email": "jan@example.com",
                "username": "jank",
                "password": "secret123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_exchange_rates_payload() {
    let app = test_app().await;
    register(&app).await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_request(Method::GET, "/exchange_rates", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Available exchange rate list");
    assert_eq!(json["exchange_rates"]["EUR"], 4.3);
    assert_eq!(json["effective_date"], "2025-02-24");
}

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    let app = test_app_with_rate_limit(3).await;
    register(&app).await;
    // Login uses the "anonymous" quota; the token gets its own.
    let token = login(&app).await;

    for i in 1..=3 {
        let response = app
            .clone()
            .oneshot(authed_request(Method::GET, "/currencies", &token))
            .await
            .unwrap();
        assert_ne!(
            response.status(),
            StatusCode::TOO_MANY_REQUESTS,
            "Request {} should not be rate limited",
            i
        );
    }

    let response = app
        .clone()
        .oneshot(authed_request(Method::GET, "/currencies", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Rate limit exceeded"));
    assert_eq!(json["retry_after_seconds"], 60);
}

#[tokio::test]
async fn test_health_bypasses_rate_limiting() {
    let app = test_app_with_rate_limit(1).await;

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
