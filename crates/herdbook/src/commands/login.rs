//! Login command - checks a credential pair.

use anyhow::Result;
use database::UserRepository;
use sqlx::SqlitePool;

/// Runs the login command.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn run(pool: &SqlitePool, email: &str, password: &str) -> Result<()> {
    match UserRepository::authenticate(pool, email, password).await? {
        Some(user) => println!("Login OK for {} (id {}).", user.email, user.id),
        None => println!("Invalid email or password."),
    }

    Ok(())
}
