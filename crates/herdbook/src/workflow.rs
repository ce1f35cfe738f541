//! Classify-and-record workflow.
//!
//! Classification and saving are independent steps: a prediction can be
//! inspected, corrected, and only then written to the database.

use std::ops::RangeInclusive;

use bytes::Bytes;
use classifier::{BreedClassifier, ClassifierError, Prediction};
use database::{CreatePrediction, Gender, PredictionRecord, PredictionRepository, StoreError, User};
use image::DynamicImage;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::intake::ImageStore;

/// Accepted height at the withers, in centimetres.
pub const HEIGHT_RANGE: RangeInclusive<f64> = 50.0..=250.0;
/// Accepted body weight, in kilograms.
pub const WEIGHT_RANGE: RangeInclusive<f64> = 50.0..=1000.0;
/// Accepted age, in years.
pub const AGE_RANGE: RangeInclusive<f64> = 0.0..=25.0;

/// Body measurements entered alongside a classified image.
#[derive(Debug, Clone, Copy)]
pub struct Measurements {
    pub height: f64,
    pub weight: f64,
    pub age: f64,
    pub gender: Gender,
}

impl Measurements {
    /// Checks every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("height", self.height, &HEIGHT_RANGE)?;
        check_range("weight", self.weight, &WEIGHT_RANGE)?;
        check_range("age", self.age, &AGE_RANGE)?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("you must log in before saving records")]
    LoginRequired,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("failed to store image: {0}")]
    Intake(#[from] object_store::Error),
}

/// Everything a record entry needs: the database pool, the classifier,
/// and the image directory. Built once in `main` and passed to commands.
pub struct Workflow {
    pool: SqlitePool,
    classifier: BreedClassifier,
    images: ImageStore,
}

impl Workflow {
    #[must_use]
    pub fn new(pool: SqlitePool, classifier: BreedClassifier, images: ImageStore) -> Self {
        Self {
            pool,
            classifier,
            images,
        }
    }

    /// Classifies an image without touching the database.
    ///
    /// # Errors
    ///
    /// Returns an error if a loaded model fails during inference.
    pub fn classify(&mut self, image: &DynamicImage) -> Result<Prediction, WorkflowError> {
        Ok(self.classifier.classify(image)?)
    }

    #[must_use]
    pub fn classifier_ready(&self) -> bool {
        self.classifier.is_ready()
    }

    #[must_use]
    pub fn classifier_status(&self) -> String {
        self.classifier.status()
    }

    /// Stores the image and writes one prediction record for `user`.
    ///
    /// The breed is whatever the caller settled on, which may differ from
    /// the classifier's suggestion. Nothing is written unless the user is
    /// logged in and every measurement is in range.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` for anonymous sessions, a validation error
    /// for out-of-range measurements, and storage errors otherwise.
    pub async fn save_prediction(
        &self,
        user: Option<&User>,
        image_data: Bytes,
        image_name: Option<&str>,
        breed: &str,
        measurements: Measurements,
    ) -> Result<PredictionRecord, WorkflowError> {
        let user = user.ok_or(WorkflowError::LoginRequired)?;
        measurements.validate()?;

        let image_path = self
            .images
            .store_image(Some(user), image_name, image_data)
            .await?;

        let record = PredictionRepository::save_record(
            &self.pool,
            CreatePrediction {
                user_id: user.id,
                breed: breed.to_string(),
                height: measurements.height,
                weight: measurements.weight,
                gender: measurements.gender,
                image_path,
                age: measurements.age,
            },
        )
        .await?;

        info!(
            record_id = record.id,
            user_id = user.id,
            breed = %record.breed,
            "saved prediction record"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use database::{CreateUser, UserRepository};
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        database::run_migrations(&pool).await.unwrap();
        pool
    }

    fn offline_classifier() -> BreedClassifier {
        BreedClassifier::load(
            Path::new("missing/model.onnx"),
            Path::new("missing/classes.json"),
        )
    }

    fn measurements() -> Measurements {
        Measurements {
            height: 130.0,
            weight: 350.0,
            age: 4.0,
            gender: Gender::Female,
        }
    }

    async fn test_workflow(dir: &Path) -> Workflow {
        Workflow::new(
            test_pool().await,
            offline_classifier(),
            ImageStore::open(dir).unwrap(),
        )
    }

    fn image_count(dir: &Path) -> usize {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0;
        };
        entries
            .flatten()
            .map(|entry| {
                if entry.path().is_dir() {
                    image_count(&entry.path())
                } else {
                    1
                }
            })
            .sum()
    }

    #[test]
    fn test_measurement_bounds() {
        assert!(measurements().validate().is_ok());

        let short = Measurements {
            height: 30.0,
            ..measurements()
        };
        assert_eq!(
            short.validate(),
            Err(ValidationError::OutOfRange {
                field: "height",
                value: 30.0,
                min: 50.0,
                max: 250.0,
            })
        );

        let heavy = Measurements {
            weight: 1200.0,
            ..measurements()
        };
        assert!(heavy.validate().is_err());

        let negative_age = Measurements {
            age: -1.0,
            ..measurements()
        };
        assert!(negative_age.validate().is_err());

        let boundary = Measurements {
            height: 50.0,
            weight: 1000.0,
            age: 25.0,
            gender: Gender::Male,
        };
        assert!(boundary.validate().is_ok());
    }

    #[tokio::test]
    async fn test_saving_requires_a_logged_in_user() {
        let dir = tempfile::tempdir().unwrap();
        let workflow = test_workflow(dir.path()).await;

        let result = workflow
            .save_prediction(
                None,
                Bytes::from_static(b"jpg"),
                Some("cow.jpg"),
                "Gir",
                measurements(),
            )
            .await;

        assert!(matches!(result, Err(WorkflowError::LoginRequired)));
        assert_eq!(image_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_invalid_measurements_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let workflow = test_workflow(dir.path()).await;

        let user = UserRepository::create_account(
            &workflow.pool,
            CreateUser {
                email: "farmer@example.com".to_string(),
                password: "pw1".to_string(),
            },
        )
        .await
        .unwrap();

        let result = workflow
            .save_prediction(
                Some(&user),
                Bytes::from_static(b"jpg"),
                Some("cow.jpg"),
                "Gir",
                Measurements {
                    height: 30.0,
                    ..measurements()
                },
            )
            .await;

        assert!(matches!(result, Err(WorkflowError::Validation(_))));
        assert_eq!(
            PredictionRepository::count_for_user(&workflow.pool, user.id)
                .await
                .unwrap(),
            0
        );
        assert_eq!(image_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_classify_then_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut workflow = test_workflow(dir.path()).await;

        UserRepository::create_account(
            &workflow.pool,
            CreateUser {
                email: "farmer@example.com".to_string(),
                password: "pw1".to_string(),
            },
        )
        .await
        .unwrap();
        let user = UserRepository::authenticate(&workflow.pool, "farmer@example.com", "pw1")
            .await
            .unwrap()
            .expect("fresh account should log in");

        // No model on disk, so the prediction is the Unknown sentinel.
        let image = DynamicImage::new_rgb8(32, 32);
        let prediction = workflow.classify(&image).unwrap();
        assert_eq!(prediction.label, "Unknown");
        assert!((0.0..=100.0).contains(&prediction.confidence));

        // The operator corrects the breed before saving.
        let record = workflow
            .save_prediction(
                Some(&user),
                Bytes::from_static(b"jpg"),
                Some("cow.jpg"),
                "Gir",
                measurements(),
            )
            .await
            .unwrap();

        assert_eq!(record.breed, "Gir");
        assert!(record.image_path.starts_with("user-"));

        let records = PredictionRepository::list_records(&workflow.pool, user.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, record.id);
        assert_eq!(image_count(dir.path()), 1);
    }
}
