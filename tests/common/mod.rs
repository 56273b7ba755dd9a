//! Shared helpers for router-level tests.

#![allow(dead_code)]

use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use payments_ledger::{repository::InMemoryLedger, routes::create_router, state::AppState};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

pub fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

/// Router over a fresh in-memory ledger, plus a handle on that ledger.
pub fn test_app() -> (Router, InMemoryLedger) {
    let ledger = InMemoryLedger::new();
    let app = create_router(AppState::new(ledger.clone()));
    (app, ledger)
}

/// Router whose database was never configured.
pub fn unconfigured_app() -> Router {
    create_router(AppState::<InMemoryLedger>::unconfigured())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, body: Value) -> TestResponse {
    post_raw(app, body.to_string()).await
}

pub async fn post_raw(app: &Router, body: impl Into<Body>) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

/// Read a JSON number as a decimal for exact comparisons.
pub fn as_dec(value: &Value) -> Decimal {
    Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::from_scientific(&value.to_string()))
        .unwrap()
}
