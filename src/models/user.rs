//! User data model and its API representation.
//!
//! This module defines:
//! - `User`: Database entity representing a ledger holder
//! - `UserResponse`: The `user` object embedded in the ledger snapshot

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Identifier of a ledger user (`users.id`, a `BIGINT`).
pub type UserId = i64;

/// Balance given to a user the first time they are looked up: 10000.00.
pub const SEED_BALANCE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 2);

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. The balance is a `NUMERIC` column and is kept
/// non-negative by the withdrawal check rather than by a constraint.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: UserId,

    /// Defaults to `user_<id>` for lazily created users
    pub username: String,

    pub balance: Decimal,

    pub created_at: DateTime<Utc>,

    /// Timestamp of last balance update
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Username assigned to a user created on first sight.
    pub fn default_username(id: UserId) -> String {
        format!("user_{id}")
    }
}

/// The `user` object returned by `GET`.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "username": "user_1",
///   "balance": 10000.0,
///   "created_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            balance: user.balance,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn seed_balance_is_ten_thousand() {
        assert_eq!(SEED_BALANCE, Decimal::from_str("10000.00").unwrap());
        assert_eq!(SEED_BALANCE.to_string(), "10000.00");
    }

    #[test]
    fn response_drops_updated_at_and_renders_balance_as_number() {
        let now = Utc::now();
        let user = User {
            id: 7,
            username: User::default_username(7),
            balance: Decimal::from_str("125.50").unwrap(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "user_7");
        assert_eq!(json["balance"], 125.5);
        assert!(json.get("updated_at").is_none());
    }
}
