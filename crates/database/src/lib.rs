//! SQLite storage for user accounts and saved breed predictions.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

mod error;
mod models;
mod predictions;
mod users;

pub use error::StoreError;
pub use models::{CreatePrediction, CreateUser, Gender, PredictionRecord, UpdateProfile, User};
pub use predictions::PredictionRepository;
pub use users::UserRepository;

/// Creates a connection pool to the `SQLite` database.
///
/// The database file is created if it does not exist, and foreign key
/// enforcement is switched on for every connection.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the connection fails.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Runs all pending migrations.
///
/// # Errors
///
/// Returns an error if running migrations fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Migrated in-memory pool for tests.
///
/// A single connection with timeouts disabled, so the shared in-memory
/// database is never dropped mid-test.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid connection string")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory database");

    run_migrations(&pool).await.expect("migrations");

    pool
}
