//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (query string, body)
//! 2. Delegates to the ledger service
//! 3. Returns HTTP response (JSON, status code)

/// Liveness and database connectivity
pub mod health;
/// Ledger entry point
pub mod ledger;
