//! Ledger service - business rules for balances, deposits and withdrawals.
//!
//! This service handles:
//! - Building the balance/history snapshot (creating users on first sight)
//! - Amount validation
//! - The 10% withdrawal fee
//! - Dispatching POST actions in the order clients observe errors

use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::{
        ledger::{
            LedgerAction, LedgerRequest, LedgerSnapshot, OperationResponse, parse_amount,
            parse_user_id,
        },
        transaction::Transaction,
        user::{SEED_BALANCE, UserId},
    },
    repository::LedgerRepository,
};

/// Maximum number of history entries returned in a snapshot.
pub const HISTORY_LIMIT: i64 = 50;

/// Share of every withdrawal retained by the platform: 0.1.
pub const WITHDRAWAL_FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Fee retained on a withdrawal of `amount`. Exact, no rounding.
pub fn withdrawal_fee(amount: Decimal) -> Decimal {
    amount * WITHDRAWAL_FEE_RATE
}

/// Outcome of a completed withdrawal.
#[derive(Debug, Clone)]
pub struct Withdrawal {
    pub transaction: Transaction,
    pub fee: Decimal,
    /// What the user actually gets: amount minus fee
    pub received: Decimal,
}

/// Load a user's balance, recent history and the admin fee total.
///
/// Unknown users are created with the seed balance.
pub async fn load_snapshot<R: LedgerRepository>(
    repository: &R,
    user_id: UserId,
) -> Result<LedgerSnapshot, AppError> {
    let user = repository
        .find_or_create_user(user_id, SEED_BALANCE)
        .await?;
    let transactions = repository
        .recent_transactions(user_id, HISTORY_LIMIT)
        .await?;
    let admin_balance = repository.admin_fee_total().await?;

    Ok(LedgerSnapshot {
        user: user.into(),
        transactions: transactions.into_iter().map(Into::into).collect(),
        admin_balance,
    })
}

fn ensure_positive(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount);
    }
    Ok(())
}

/// Credit `amount` to a user.
///
/// # Errors
///
/// - `InvalidAmount`: amount is zero or negative
/// - `UserNotFound`: user doesn't exist
/// - `Database`: database error occurred
pub async fn execute_deposit<R: LedgerRepository>(
    repository: &R,
    user_id: UserId,
    amount: Decimal,
) -> Result<Transaction, AppError> {
    ensure_positive(amount)?;

    let transaction = repository.deposit(user_id, amount).await?;
    tracing::info!(user_id, %amount, transaction_id = %transaction.id, "deposit completed");

    Ok(transaction)
}

/// Withdraw `amount` from a user, keeping 10% as the platform fee.
///
/// The full amount leaves the user's balance; the fee is taken out of what
/// they receive and credited to the admin total.
///
/// # Errors
///
/// - `InvalidAmount`: amount is zero or negative
/// - `UserNotFound`: user doesn't exist
/// - `InsufficientFunds`: amount exceeds the balance
/// - `Database`: database error occurred
pub async fn execute_withdrawal<R: LedgerRepository>(
    repository: &R,
    user_id: UserId,
    amount: Decimal,
) -> Result<Withdrawal, AppError> {
    ensure_positive(amount)?;

    let fee = withdrawal_fee(amount);
    let transaction = repository.withdraw(user_id, amount, fee).await?;
    tracing::info!(user_id, %amount, %fee, transaction_id = %transaction.id, "withdrawal completed");

    Ok(Withdrawal {
        transaction,
        fee,
        received: amount - fee,
    })
}

/// Run a POST request end to end.
///
/// # Process
///
/// 1. Coerce `amount` and reject anything not strictly positive
/// 2. Coerce `user_id` and load the user (404 when missing)
/// 3. Dispatch on `action`; unknown actions are rejected only after the user lookup
pub async fn apply_action<R: LedgerRepository>(
    repository: &R,
    request: LedgerRequest,
) -> Result<OperationResponse, AppError> {
    let amount = parse_amount(request.amount.as_ref())?;
    ensure_positive(amount)?;

    let user_id = parse_user_id(request.user_id.as_ref())?;
    let user = repository
        .find_user(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let action = request
        .action
        .as_deref()
        .ok_or(AppError::InvalidAction)?
        .parse::<LedgerAction>()?;

    match action {
        LedgerAction::Deposit => {
            execute_deposit(repository, user.id, amount).await?;
            Ok(OperationResponse::deposit())
        }
        LedgerAction::Withdrawal => {
            if amount > user.balance {
                return Err(AppError::InsufficientFunds);
            }
            let withdrawal = execute_withdrawal(repository, user.id, amount).await?;
            Ok(OperationResponse::withdrawal(
                withdrawal.fee,
                withdrawal.received,
            ))
        }
    }
}
