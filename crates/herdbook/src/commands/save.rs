//! Save command - classifies an image and writes a measurement record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::Bytes;
use database::{Gender, UserRepository};
use sqlx::SqlitePool;

use crate::workflow::{Measurements, Workflow, WorkflowError};

/// Inputs for one record save.
pub struct SaveRequest {
    pub email: String,
    pub password: String,
    pub image: PathBuf,
    pub breed: Option<String>,
    pub height: f64,
    pub weight: f64,
    pub age: f64,
    pub gender: String,
}

/// Runs the save command.
///
/// When no breed is given the classifier's suggestion is used.
///
/// # Errors
///
/// Returns an error if the image cannot be read or the database is
/// unreachable.
pub async fn run(workflow: &mut Workflow, pool: &SqlitePool, request: SaveRequest) -> Result<()> {
    let gender =
        Gender::from_str(&request.gender).context("Invalid gender. Use: male, female")?;

    let Some(user) =
        UserRepository::authenticate(pool, &request.email, &request.password).await?
    else {
        println!("Invalid email or password.");
        return Ok(());
    };

    let data = std::fs::read(&request.image)
        .with_context(|| format!("Failed to read image {}", request.image.display()))?;

    let breed = match request.breed {
        Some(breed) => breed,
        None => {
            let image = image::load_from_memory(&data)
                .with_context(|| format!("Failed to decode image {}", request.image.display()))?;
            let prediction = workflow.classify(&image)?;
            println!(
                "Predicted breed: {} ({:.2}% confidence)",
                prediction.label, prediction.confidence
            );
            prediction.label
        }
    };

    let image_name = request.image.file_name().and_then(|name| name.to_str());
    let measurements = Measurements {
        height: request.height,
        weight: request.weight,
        age: request.age,
        gender,
    };

    match workflow
        .save_prediction(Some(&user), Bytes::from(data), image_name, &breed, measurements)
        .await
    {
        Ok(record) => println!(
            "Saved record #{} ({}) for {}.",
            record.id, record.breed, user.email
        ),
        Err(err @ WorkflowError::Validation(_)) => println!("{err}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
