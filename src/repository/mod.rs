//! Storage seam for the ledger.
//!
//! Handlers and services talk to storage through `LedgerRepository`, so the
//! whole request flow can run against PostgreSQL in production and against an
//! in-process store in tests.

use std::future::Future;

use rust_decimal::Decimal;

use crate::error::AppError;
use crate::models::transaction::Transaction;
use crate::models::user::{User, UserId};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryLedger;
pub use postgres::PgLedgerRepository;

/// Persistence operations needed by the ledger.
///
/// `deposit` and `withdraw` are the only writers of balances and of the
/// transaction log. Each applies its balance change, its ledger entry and (for
/// withdrawals) the admin fee increment as one unit.
pub trait LedgerRepository: Clone + Send + Sync + 'static {
    /// Verify the store is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), AppError>> + Send;

    fn find_user(&self, user_id: UserId)
    -> impl Future<Output = Result<Option<User>, AppError>> + Send;

    /// Load a user, inserting `user_<id>` with `seed_balance` if absent.
    fn find_or_create_user(
        &self,
        user_id: UserId,
        seed_balance: Decimal,
    ) -> impl Future<Output = Result<User, AppError>> + Send;

    /// Most recent transactions for a user, newest first.
    fn recent_transactions(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Transaction>, AppError>> + Send;

    /// Accumulated withdrawal fees; zero when the singleton row is missing.
    fn admin_fee_total(&self) -> impl Future<Output = Result<Decimal, AppError>> + Send;

    /// Credit `amount` and record a zero-fee deposit.
    ///
    /// # Errors
    ///
    /// - `UserNotFound`: no such user
    fn deposit(
        &self,
        user_id: UserId,
        amount: Decimal,
    ) -> impl Future<Output = Result<Transaction, AppError>> + Send;

    /// Debit the full `amount`, record the withdrawal with its `fee`, and add
    /// `fee` to the admin total.
    ///
    /// # Errors
    ///
    /// - `UserNotFound`: no such user
    /// - `InsufficientFunds`: `amount` exceeds the balance at the time of the write
    fn withdraw(
        &self,
        user_id: UserId,
        amount: Decimal,
        fee: Decimal,
    ) -> impl Future<Output = Result<Transaction, AppError>> + Send;
}
