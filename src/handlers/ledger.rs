//! Ledger HTTP handlers.
//!
//! The ledger is served from a single path and multiplexed by method:
//! - GET / - Balance, recent history and admin fee total (creates the user if needed)
//! - POST / - Deposit or withdrawal
//! - OPTIONS / - CORS preflight, answered by the CORS layer
//! - anything else, HEAD included - 405

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::Method,
};

use crate::{
    error::AppError,
    models::ledger::{
        DEFAULT_USER_ID, LedgerQuery, LedgerRequest, LedgerSnapshot, OperationResponse,
        parse_user_id_str,
    },
    repository::LedgerRepository,
    services::ledger_service,
    state::AppState,
};

/// Get a user's ledger snapshot.
///
/// # Query Parameters
///
/// - `user_id` - defaults to `1`
///
/// # Response (200)
///
/// ```json
/// {
///   "user": { "id": 1, "username": "user_1", "balance": 9000.0, "created_at": "..." },
///   "transactions": [
///     { "id": "...", "type": "withdrawal", "amount": 1000.0, "fee": 100.0,
///       "status": "completed", "description": "Withdrawal to card", "date": "..." }
///   ],
///   "admin_balance": 100.0
/// }
/// ```
///
/// The router hands HEAD to this handler too. HEAD is refused here, since
/// serving it would create the user as a side effect.
pub async fn get_ledger<R: LedgerRepository>(
    method: Method,
    State(state): State<AppState<R>>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<LedgerSnapshot>, AppError> {
    let repository = state.repository()?;
    if method == Method::HEAD {
        return Err(AppError::MethodNotAllowed);
    }

    let user_id = match query.user_id.as_deref() {
        Some(raw) => parse_user_id_str(raw)?,
        None => DEFAULT_USER_ID,
    };

    let snapshot = ledger_service::load_snapshot(repository, user_id).await?;

    Ok(Json(snapshot))
}

/// Apply a deposit or withdrawal.
///
/// # Request Body
///
/// ```json
/// { "action": "withdrawal", "user_id": "1", "amount": 1000 }
/// ```
///
/// # Response (200)
///
/// ```json
/// { "success": true, "message": "Withdrawal successful", "fee": 100.0, "received": 900.0 }
/// ```
///
/// # Errors
///
/// - 400: invalid JSON, amount <= 0, unknown action, insufficient funds
/// - 404: user not found
/// - 500: database not configured or failing
pub async fn post_ledger<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    body: Bytes,
) -> Result<Json<OperationResponse>, AppError> {
    let repository = state.repository()?;

    let request = LedgerRequest::from_body(&body)?;
    let response = ledger_service::apply_action(repository, request).await?;

    Ok(Json(response))
}

/// Fallback for verbs the ledger does not serve.
///
/// A missing database configuration is still reported first.
pub async fn method_not_allowed<R: LedgerRepository>(
    State(state): State<AppState<R>>,
) -> AppError {
    match state.repository() {
        Ok(_) => AppError::MethodNotAllowed,
        Err(err) => err,
    }
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
