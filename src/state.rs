//! Shared application state.

use crate::{error::AppError, repository::LedgerRepository};

/// State handed to every handler.
///
/// The repository is optional: without a configured database the server still
/// answers, but every ledger request fails with `DatabaseConfigMissing`.
#[derive(Clone)]
pub struct AppState<R: LedgerRepository> {
    repository: Option<R>,
}

impl<R: LedgerRepository> AppState<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Some(repository),
        }
    }

    /// State for a server started without `DATABASE_URL`.
    pub fn unconfigured() -> Self {
        Self { repository: None }
    }

    /// The configured repository, or the configuration error clients should see.
    pub fn repository(&self) -> Result<&R, AppError> {
        self.repository
            .as_ref()
            .ok_or(AppError::DatabaseConfigMissing)
    }
}
