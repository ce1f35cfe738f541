//! Records command - lists saved prediction records.

use anyhow::Result;
use database::{PredictionRepository, UserRepository};
use sqlx::SqlitePool;

/// Runs the records command.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn run(pool: &SqlitePool, email: &str, password: &str) -> Result<()> {
    let Some(user) = UserRepository::authenticate(pool, email, password).await? else {
        println!("Invalid email or password.");
        return Ok(());
    };

    let records = PredictionRepository::list_records(pool, user.id).await?;
    if records.is_empty() {
        println!("No records saved yet.");
        return Ok(());
    }

    println!("Found {} records", records.len());
    for record in records {
        println!(
            "#{} {} | {} cm, {} kg, {} yr, {} | {} | {}",
            record.id,
            record.breed,
            record.height,
            record.weight,
            record.age,
            record.gender,
            record.image_path,
            record.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}
