//! Profile command - updates the contact details on an account.

use anyhow::Result;
use database::{UpdateProfile, UserRepository};
use sqlx::SqlitePool;

/// Runs the profile command.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn run(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    update: UpdateProfile,
) -> Result<()> {
    let Some(user) = UserRepository::authenticate(pool, email, password).await? else {
        println!("Invalid email or password.");
        return Ok(());
    };

    UserRepository::update_profile(pool, user.id, update).await?;
    println!("Profile updated for {}.", user.email);

    Ok(())
}
