//! Classify command - runs the breed classifier on one image.

use std::path::Path;

use anyhow::{Context, Result};

use crate::workflow::Workflow;

/// Runs the classify command.
///
/// # Errors
///
/// Returns an error if the image cannot be read or inference fails.
pub fn run(workflow: &mut Workflow, image_path: &Path) -> Result<()> {
    let image = image::open(image_path)
        .with_context(|| format!("Failed to read image {}", image_path.display()))?;

    let prediction = workflow.classify(&image)?;

    if !workflow.classifier_ready() {
        println!("Classifier is {}.", workflow.classifier_status());
    }
    println!(
        "Predicted breed: {} ({:.2}% confidence)",
        prediction.label, prediction.confidence
    );
    println!("The breed can be corrected when saving the record.");

    Ok(())
}
