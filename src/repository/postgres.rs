//! PostgreSQL-backed ledger storage.
//!
//! # Atomicity Guarantees
//!
//! Deposits and withdrawals run inside a single PostgreSQL transaction with
//! the user's row locked (`FOR UPDATE`), so the balance, the ledger entry and
//! the admin fee total move together or not at all.

use rust_decimal::Decimal;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        transaction::{STATUS_COMPLETED, Transaction, TransactionKind},
        user::{User, UserId},
    },
    repository::LedgerRepository,
};

const ADMIN_FEES_ROW: i32 = 1;

/// Ledger storage on top of a `sqlx` PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgLedgerRepository {
    pool: DbPool,
}

impl PgLedgerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl LedgerRepository for PgLedgerRepository {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, balance, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_or_create_user(
        &self,
        user_id: UserId,
        seed_balance: Decimal,
    ) -> Result<User, AppError> {
        if let Some(user) = self.find_user(user_id).await? {
            return Ok(user);
        }

        // A concurrent GET may insert the same user first; fall back to reading it.
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, balance)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, username, balance, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(User::default_username(user_id))
        .bind(seed_balance)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(user) => {
                tracing::info!(user_id, balance = %user.balance, "created user");
                Ok(user)
            }
            None => self.find_user(user_id).await?.ok_or(AppError::UserNotFound),
        }
    }

    async fn recent_transactions(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, type AS transaction_type, amount, fee, status, description, created_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn admin_fee_total(&self) -> Result<Decimal, AppError> {
        let total: Option<Decimal> =
            sqlx::query_scalar("SELECT total_fees FROM admin_fees WHERE id = $1")
                .bind(ADMIN_FEES_ROW)
                .fetch_optional(&self.pool)
                .await?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }

    async fn deposit(&self, user_id: UserId, amount: Decimal) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated_count = sqlx::query(
            r#"
            UPDATE users
            SET balance = balance + $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(amount)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated_count == 0 {
            tx.rollback().await?;
            return Err(AppError::UserNotFound);
        }

        let transaction = insert_transaction(
            &mut tx,
            user_id,
            TransactionKind::Deposit,
            amount,
            Decimal::ZERO,
        )
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }

    async fn withdraw(
        &self,
        user_id: UserId,
        amount: Decimal,
        fee: Decimal,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the user's row until commit
        let balance: Decimal =
            sqlx::query_scalar("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(AppError::UserNotFound)?;

        if amount > balance {
            tx.rollback().await?;
            return Err(AppError::InsufficientFunds);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET balance = balance - $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(amount)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let transaction =
            insert_transaction(&mut tx, user_id, TransactionKind::Withdrawal, amount, fee).await?;

        // No admin_fees row means nothing to accumulate into
        sqlx::query(
            r#"
            UPDATE admin_fees
            SET total_fees = total_fees + $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(fee)
        .bind(ADMIN_FEES_ROW)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }
}

async fn insert_transaction(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: UserId,
    kind: TransactionKind,
    amount: Decimal,
    fee: Decimal,
) -> Result<Transaction, AppError> {
    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (user_id, type, amount, fee, status, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, type AS transaction_type, amount, fee, status, description, created_at
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(amount)
    .bind(fee)
    .bind(STATUS_COMPLETED)
    .bind(kind.description())
    .fetch_one(&mut **tx)
    .await?;

    Ok(transaction)
}
