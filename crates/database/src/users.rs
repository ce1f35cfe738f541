//! Repository functions for user account operations.

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreError;
use crate::models::{CreateUser, UpdateProfile, User};

/// Repository for user account operations.
pub struct UserRepository;

impl UserRepository {
    /// Creates a new user account with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateAccount` if the email is already
    /// registered, or an error if the database operation fails.
    pub async fn create_account(pool: &SqlitePool, input: CreateUser) -> Result<User, StoreError> {
        if Self::find_by_email(pool, &input.email).await?.is_some() {
            return Err(StoreError::DuplicateAccount { email: input.email });
        }

        let password_hash = hash_password(&input.password);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES (?, ?)
            RETURNING id, email, password_hash, name, phone, address
            "#,
        )
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(pool)
        .await?;

        info!(user = user.id, "created account");

        Ok(user)
    }

    /// Checks credentials against the stored account.
    ///
    /// Returns `Ok(None)` for a wrong password as well as for an unknown
    /// email; callers cannot tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn authenticate(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let Some(user) = Self::find_by_email(pool, email).await? else {
            return Ok(None);
        };

        if user.password_hash == hash_password(password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, phone, address
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, phone, address
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Overwrites the profile fields of an existing account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserNotFound` if the id does not exist, or an
    /// error if the database operation fails.
    pub async fn update_profile(
        pool: &SqlitePool,
        user_id: i64,
        input: UpdateProfile,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = ?, phone = ?, address = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(user_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound { user_id });
        }

        info!(user = user_id, "updated profile");

        Ok(())
    }

    /// Counts registered accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(pool: &SqlitePool) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

/// Hashes a password to its SHA-256 hex digest.
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
