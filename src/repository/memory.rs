//! In-process ledger storage.
//!
//! Keeps the three tables in memory behind one async mutex. Every operation
//! takes the lock once, so deposits and withdrawals are applied as a unit just
//! like the PostgreSQL transactions do.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        transaction::{STATUS_COMPLETED, Transaction, TransactionKind},
        user::{User, UserId},
    },
    repository::LedgerRepository,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// Append-only, in insertion order
    transactions: Vec<Transaction>,
    /// `None` models a missing `admin_fees` row
    admin_fees: Option<Decimal>,
}

impl Tables {
    fn append(
        &mut self,
        user_id: UserId,
        kind: TransactionKind,
        amount: Decimal,
        fee: Decimal,
    ) -> Transaction {
        let transaction = Transaction {
            id: Uuid::new_v4(),
            user_id,
            transaction_type: kind.as_str().to_string(),
            amount,
            fee: Some(fee),
            status: STATUS_COMPLETED.to_string(),
            description: Some(kind.description().to_string()),
            created_at: Utc::now(),
        };
        self.transactions.push(transaction.clone());
        transaction
    }
}

/// Ledger storage held entirely in memory. Clones share the same tables.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    tables: Arc<Mutex<Tables>>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Empty ledger with the admin fee row present at zero.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables {
                admin_fees: Some(Decimal::ZERO),
                ..Tables::default()
            })),
        }
    }

    /// Empty ledger without an admin fee row.
    pub fn without_admin_fees() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
        }
    }

    /// Insert or replace a user with the given balance.
    pub async fn insert_user(&self, user_id: UserId, balance: Decimal) -> User {
        let now = Utc::now();
        let user = User {
            id: user_id,
            username: User::default_username(user_id),
            balance,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .await
            .users
            .insert(user_id, user.clone());
        user
    }

    /// Number of ledger entries across all users.
    pub async fn transaction_count(&self) -> usize {
        self.tables.lock().await.transactions.len()
    }
}

impl LedgerRepository for InMemoryLedger {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().await.users.get(&user_id).cloned())
    }

    async fn find_or_create_user(
        &self,
        user_id: UserId,
        seed_balance: Decimal,
    ) -> Result<User, AppError> {
        let mut tables = self.tables.lock().await;
        let user = tables.users.entry(user_id).or_insert_with(|| {
            let now = Utc::now();
            tracing::info!(user_id, balance = %seed_balance, "created user");
            User {
                id: user_id,
                username: User::default_username(user_id),
                balance: seed_balance,
                created_at: now,
                updated_at: now,
            }
        });
        Ok(user.clone())
    }

    async fn recent_transactions(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Transaction>, AppError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let tables = self.tables.lock().await;

        // Insertion order is chronological, so walking backwards is newest first
        Ok(tables
            .transactions
            .iter()
            .rev()
            .filter(|transaction| transaction.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn admin_fee_total(&self) -> Result<Decimal, AppError> {
        Ok(self
            .tables
            .lock()
            .await
            .admin_fees
            .unwrap_or(Decimal::ZERO))
    }

    async fn deposit(&self, user_id: UserId, amount: Decimal) -> Result<Transaction, AppError> {
        let mut tables = self.tables.lock().await;

        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(AppError::UserNotFound)?;
        user.balance = user
            .balance
            .checked_add(amount)
            .ok_or(AppError::InvalidAmount)?;
        user.updated_at = Utc::now();

        Ok(tables.append(user_id, TransactionKind::Deposit, amount, Decimal::ZERO))
    }

    async fn withdraw(
        &self,
        user_id: UserId,
        amount: Decimal,
        fee: Decimal,
    ) -> Result<Transaction, AppError> {
        let mut tables = self.tables.lock().await;

        // Checked before any mutation
        let admin_total = match tables.admin_fees {
            Some(total) => Some(total.checked_add(fee).ok_or(AppError::InvalidAmount)?),
            None => None,
        };

        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(AppError::UserNotFound)?;
        if amount > user.balance {
            return Err(AppError::InsufficientFunds);
        }
        user.balance -= amount;
        user.updated_at = Utc::now();

        let transaction = tables.append(user_id, TransactionKind::Withdrawal, amount, fee);
        tables.admin_fees = admin_total;

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn find_or_create_seeds_once() {
        let ledger = InMemoryLedger::new();

        let created = ledger.find_or_create_user(5, dec("10000.00")).await.unwrap();
        let again = ledger.find_or_create_user(5, dec("1")).await.unwrap();

        assert_eq!(created.balance, dec("10000.00"));
        assert_eq!(created.username, "user_5");
        assert_eq!(again, created);
    }

    #[tokio::test]
    async fn recent_transactions_are_newest_first_and_per_user() {
        let ledger = InMemoryLedger::new();
        ledger.insert_user(1, dec("100")).await;
        ledger.insert_user(2, dec("100")).await;

        ledger.deposit(1, dec("1")).await.unwrap();
        ledger.deposit(2, dec("2")).await.unwrap();
        ledger.deposit(1, dec("3")).await.unwrap();

        let history = ledger.recent_transactions(1, 50).await.unwrap();
        let amounts: Vec<Decimal> = history.iter().map(|t| t.amount).collect();

        assert_eq!(amounts, vec![dec("3"), dec("1")]);
    }

    #[tokio::test]
    async fn withdraw_rejects_overdraft_without_side_effects() {
        let ledger = InMemoryLedger::new();
        ledger.insert_user(1, dec("50")).await;

        let result = ledger.withdraw(1, dec("60"), dec("6")).await;

        assert!(matches!(result, Err(AppError::InsufficientFunds)));
        assert_eq!(ledger.find_user(1).await.unwrap().unwrap().balance, dec("50"));
        assert_eq!(ledger.admin_fee_total().await.unwrap(), Decimal::ZERO);
        assert_eq!(ledger.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn withdraw_without_admin_row_still_debits() {
        let ledger = InMemoryLedger::without_admin_fees();
        ledger.insert_user(1, dec("50")).await;

        ledger.withdraw(1, dec("20"), dec("2")).await.unwrap();

        assert_eq!(ledger.find_user(1).await.unwrap().unwrap().balance, dec("30"));
        assert_eq!(ledger.admin_fee_total().await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn deposit_overflow_is_rejected_without_side_effects() {
        let ledger = InMemoryLedger::new();
        ledger.insert_user(1, dec("1")).await;

        let result = ledger.deposit(1, Decimal::MAX).await;

        assert!(matches!(result, Err(AppError::InvalidAmount)));
        assert_eq!(ledger.find_user(1).await.unwrap().unwrap().balance, dec("1"));
        assert_eq!(ledger.transaction_count().await, 0);

        // The lock was released and the ledger is still usable
        ledger.deposit(1, dec("2")).await.unwrap();
        assert_eq!(ledger.find_user(1).await.unwrap().unwrap().balance, dec("3"));
    }

    #[tokio::test]
    async fn mutations_on_unknown_user_fail() {
        let ledger = InMemoryLedger::new();

        assert!(matches!(
            ledger.deposit(9, dec("1")).await,
            Err(AppError::UserNotFound)
        ));
        assert!(matches!(
            ledger.withdraw(9, dec("1"), dec("0.1")).await,
            Err(AppError::UserNotFound)
        ));
    }
}
