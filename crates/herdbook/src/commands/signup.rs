//! Signup command - registers a new account.

use anyhow::Result;
use database::{CreateUser, StoreError, UserRepository};
use sqlx::SqlitePool;

/// Runs the signup command.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn run(pool: &SqlitePool, email: &str, password: &str) -> Result<()> {
    let input = CreateUser {
        email: email.to_string(),
        password: password.to_string(),
    };

    match UserRepository::create_account(pool, input).await {
        Ok(user) => println!(
            "Account created for {} (id {}). Log in to continue.",
            user.email, user.id
        ),
        Err(StoreError::DuplicateAccount { email }) => {
            println!("An account already exists for {email}.");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
