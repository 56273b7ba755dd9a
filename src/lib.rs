//! Payments ledger service.
//!
//! A small HTTP API over a PostgreSQL ledger: read a user's balance and
//! history, deposit, and withdraw with a flat 10% fee retained by the platform.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Money**: `rust_decimal` decimals, rendered as JSON numbers
//! - **Format**: JSON requests/responses, CORS open to all origins

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
