//! Request and response types for the ledger entry point.
//!
//! This module defines:
//! - `LedgerQuery` / `LedgerRequest`: what clients send on GET and POST
//! - `LedgerAction`: the parsed POST action
//! - `LedgerSnapshot`: the GET response
//! - `OperationResponse`: the POST success response
//!
//! Clients are loose about types: `user_id` and `amount` arrive either as JSON
//! numbers or as strings, so both are kept as raw JSON values here and coerced
//! by `parse_user_id` and `parse_amount`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::models::transaction::TransactionResponse;
use crate::models::user::{UserId, UserResponse};

/// User addressed when a request does not name one.
pub const DEFAULT_USER_ID: UserId = 1;

/// Query string accepted by `GET`.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    pub user_id: Option<String>,
}

/// JSON body accepted by `POST`.
///
/// # JSON Example
///
/// ```json
/// {
///   "action": "withdrawal",
///   "user_id": "1",
///   "amount": 1500
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct LedgerRequest {
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub user_id: Option<Value>,

    #[serde(default)]
    pub amount: Option<Value>,
}

impl LedgerRequest {
    /// Parse a raw POST body. An empty body is treated as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body)
            .map_err(|_| AppError::InvalidRequest("Invalid JSON body".to_string()))
    }
}

/// Operation requested by a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAction {
    Deposit,
    Withdrawal,
}

impl FromStr for LedgerAction {
    type Err = AppError;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action {
            "deposit" => Ok(LedgerAction::Deposit),
            "withdrawal" => Ok(LedgerAction::Withdrawal),
            _ => Err(AppError::InvalidAction),
        }
    }
}

/// Coerce a client-supplied user identifier, defaulting to user 1.
pub fn parse_user_id(raw: Option<&Value>) -> Result<UserId, AppError> {
    let invalid = || AppError::InvalidRequest("Invalid user_id".to_string());

    match raw {
        None | Some(Value::Null) => Ok(DEFAULT_USER_ID),
        Some(Value::Number(number)) => number.as_i64().ok_or_else(invalid),
        Some(Value::String(text)) => parse_user_id_str(text),
        Some(_) => Err(invalid()),
    }
}

/// Parse a user identifier that arrived as text (query string or JSON string).
pub fn parse_user_id_str(raw: &str) -> Result<UserId, AppError> {
    raw.trim()
        .parse::<UserId>()
        .map_err(|_| AppError::InvalidRequest("Invalid user_id".to_string()))
}

/// Coerce a client-supplied amount to a decimal.
///
/// A missing amount reads as zero, which callers then reject as non-positive.
/// Numbers and numeric strings are accepted, including scientific notation.
pub fn parse_amount(raw: Option<&Value>) -> Result<Decimal, AppError> {
    match raw {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::Number(number)) => decimal_from_text(&number.to_string()),
        Some(Value::String(text)) => decimal_from_text(text.trim()),
        Some(_) => Err(AppError::InvalidAmount),
    }
}

fn decimal_from_text(text: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| AppError::InvalidAmount)
}

/// Response body for `GET`.
///
/// # JSON Example
///
/// ```json
/// {
///   "user": { "id": 1, "username": "user_1", "balance": 10000.0, "created_at": "..." },
///   "transactions": [],
///   "admin_balance": 0.0
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct LedgerSnapshot {
    pub user: UserResponse,
    pub transactions: Vec<TransactionResponse>,
    #[serde(with = "rust_decimal::serde::float")]
    pub admin_balance: Decimal,
}

/// Response body for a successful `POST`.
///
/// Withdrawals also report the fee retained and the net amount received.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub success: bool,
    pub message: String,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub received: Option<Decimal>,
}

impl OperationResponse {
    pub fn deposit() -> Self {
        Self {
            success: true,
            message: "Deposit successful".to_string(),
            fee: None,
            received: None,
        }
    }

    pub fn withdrawal(fee: Decimal, received: Decimal) -> Self {
        Self {
            success: true,
            message: "Withdrawal successful".to_string(),
            fee: Some(fee),
            received: Some(received),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[rstest]
    #[case(json!(100), "100")]
    #[case(json!(250.75), "250.75")]
    #[case(json!("42.10"), "42.10")]
    #[case(json!(" 7 "), "7")]
    #[case(json!("1e3"), "1000")]
    #[case(json!(-5), "-5")]
    fn parses_amounts(#[case] raw: Value, #[case] expected: &str) {
        assert_eq!(parse_amount(Some(&raw)).unwrap(), dec(expected));
    }

    #[test]
    fn missing_amount_reads_as_zero() {
        assert_eq!(parse_amount(None).unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount(Some(&Value::Null)).unwrap(), Decimal::ZERO);
    }

    #[rstest]
    #[case(json!("ten"))]
    #[case(json!(""))]
    #[case(json!(true))]
    #[case(json!([100]))]
    #[case(json!({"value": 100}))]
    fn rejects_unparsable_amounts(#[case] raw: Value) {
        assert!(matches!(
            parse_amount(Some(&raw)),
            Err(AppError::InvalidAmount)
        ));
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(json!(42)), 42)]
    #[case(Some(json!("42")), 42)]
    #[case(Some(Value::Null), 1)]
    fn parses_user_ids(#[case] raw: Option<Value>, #[case] expected: UserId) {
        assert_eq!(parse_user_id(raw.as_ref()).unwrap(), expected);
    }

    #[rstest]
    #[case(json!("abc"))]
    #[case(json!(""))]
    #[case(json!(1.5))]
    #[case(json!(false))]
    fn rejects_bad_user_ids(#[case] raw: Value) {
        assert!(matches!(
            parse_user_id(Some(&raw)),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn parses_actions() {
        assert_eq!(
            "deposit".parse::<LedgerAction>().unwrap(),
            LedgerAction::Deposit
        );
        assert_eq!(
            "withdrawal".parse::<LedgerAction>().unwrap(),
            LedgerAction::Withdrawal
        );
        assert!(matches!(
            "transfer".parse::<LedgerAction>(),
            Err(AppError::InvalidAction)
        ));
    }

    #[test]
    fn empty_body_is_an_empty_request() {
        let request = LedgerRequest::from_body(b"  \n").unwrap();

        assert!(request.action.is_none());
        assert!(request.user_id.is_none());
        assert!(request.amount.is_none());
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(matches!(
            LedgerRequest::from_body(b"{not json"),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn deposit_response_omits_fee_fields() {
        let json = serde_json::to_value(OperationResponse::deposit()).unwrap();

        assert_eq!(
            json,
            json!({ "success": true, "message": "Deposit successful" })
        );
    }

    #[test]
    fn withdrawal_response_reports_fee_and_received() {
        let json =
            serde_json::to_value(OperationResponse::withdrawal(dec("10"), dec("90"))).unwrap();

        assert_eq!(
            json,
            json!({
                "success": true,
                "message": "Withdrawal successful",
                "fee": 10.0,
                "received": 90.0
            })
        );
    }
}
