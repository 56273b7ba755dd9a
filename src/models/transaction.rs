//! Transaction data models and API response types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a ledger entry
//! - `TransactionKind`: The two kinds of balance-affecting operations
//! - `TransactionResponse`: History entry returned to clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::user::UserId;

/// Status recorded on every transaction written by this service.
pub const STATUS_COMPLETED: &str = "completed";

/// Kind of ledger entry, stored in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }

    /// Human-readable description stored alongside the entry.
    pub fn description(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Account top-up",
            TransactionKind::Withdrawal => "Withdrawal to card",
        }
    }
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Rows are append-only: nothing in this
/// service updates or deletes them. The `type` column is selected as
/// `transaction_type`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,

    pub user_id: UserId,

    /// "deposit" or "withdrawal"
    pub transaction_type: String,

    /// Always positive
    pub amount: Decimal,

    /// Zero for deposits, 10% of `amount` for withdrawals.
    ///
    /// Nullable in pre-existing schemas; a missing fee reads as zero.
    pub fee: Option<Decimal>,

    pub status: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// History entry returned by `GET`.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "type": "withdrawal",
///   "amount": 500.0,
///   "fee": 50.0,
///   "status": "completed",
///   "description": "Withdrawal to card",
///   "date": "2025-12-21T16:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    pub status: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id.to_string(),
            transaction_type: transaction.transaction_type,
            amount: transaction.amount,
            fee: transaction.fee.unwrap_or(Decimal::ZERO),
            status: transaction.status,
            description: transaction.description,
            date: transaction.created_at,
        }
    }
}
