//! Store error types.

use thiserror::Error;

/// Errors surfaced by the credential and prediction stores.
///
/// Failed authentication is not represented here; it is an expected outcome
/// and comes back as `Ok(None)` from the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Signup attempted with an email that already has an account.
    #[error("an account already exists for {email}")]
    DuplicateAccount { email: String },

    /// An operation referenced a user id that does not exist.
    #[error("no user with id {user_id}")]
    UserNotFound { user_id: i64 },

    /// Underlying database failure.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
