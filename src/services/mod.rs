//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They validate requests and drive the repository.

pub mod ledger_service;
