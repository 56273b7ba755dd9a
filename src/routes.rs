//! Router construction.
//!
//! Wires the ledger entry point and the health check to their handlers and
//! wraps everything in the CORS and tracing layers.

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{health, ledger},
    repository::LedgerRepository,
    state::AppState,
};

/// How long browsers may cache a preflight answer.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Build the application router.
///
/// | Path | Methods |
/// |---|---|
/// | `/` | GET, POST (everything else: 405) |
/// | `/health` | GET |
///
/// OPTIONS requests never reach a handler: the CORS layer answers them with
/// 200 and an empty body.
pub fn create_router<R: LedgerRepository>(state: AppState<R>) -> Router {
    Router::new()
        .route(
            "/",
            get(ledger::get_ledger::<R>)
                .post(ledger::post_ledger::<R>)
                .fallback(ledger::method_not_allowed::<R>),
        )
        .route("/health", get(health::health_check::<R>))
        .fallback(ledger::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// Open CORS policy for the browser frontend.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-user-id")])
        .max_age(PREFLIGHT_MAX_AGE)
}
