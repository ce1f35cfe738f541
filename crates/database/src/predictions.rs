//! Repository functions for prediction record operations.

use sqlx::SqlitePool;
use sqlx::types::chrono::Utc;
use tracing::info;

use crate::error::StoreError;
use crate::models::{CreatePrediction, PredictionRecord};

/// Repository for prediction record operations.
pub struct PredictionRepository;

impl PredictionRepository {
    /// Saves a new prediction record stamped with the current time.
    ///
    /// Records are immutable once written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserNotFound` if the record references a user id
    /// that does not exist, or an error if the database operation fails.
    pub async fn save_record(
        pool: &SqlitePool,
        input: CreatePrediction,
    ) -> Result<PredictionRecord, StoreError> {
        let user_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(input.user_id)
            .fetch_one(pool)
            .await?;
        if !user_exists {
            return Err(StoreError::UserNotFound {
                user_id: input.user_id,
            });
        }

        let record = sqlx::query_as::<_, PredictionRecord>(
            r#"
            INSERT INTO predictions (user_id, breed, height, weight, gender, image_path, age, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, breed, height, weight, gender, image_path, age, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.breed)
        .bind(input.height)
        .bind(input.weight)
        .bind(input.gender)
        .bind(&input.image_path)
        .bind(input.age)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        info!(record = record.id, user = record.user_id, breed = %record.breed, "saved prediction record");

        Ok(record)
    }

    /// Lists all records for a user, most recent first.
    ///
    /// A user with no records gets an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_records(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<PredictionRecord>, StoreError> {
        let records = sqlx::query_as::<_, PredictionRecord>(
            r#"
            SELECT id, user_id, breed, height, weight, gender, image_path, age, created_at
            FROM predictions
            WHERE user_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Counts records for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM predictions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
