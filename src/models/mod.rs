//! Data models representing database entities and API payloads.

/// Entry-point request and response payloads
pub mod ledger;
/// Ledger entry model
pub mod transaction;
/// Ledger holder model
pub mod user;
