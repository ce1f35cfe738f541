use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Path to the serialized breed classifier
    pub model_path: PathBuf,

    /// Path to the JSON file mapping breed names to classifier output indices
    pub labels_path: PathBuf,

    /// Base directory for stored images
    pub image_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// All variables are optional and fall back to fixed defaults:
    /// - `DATABASE_URL`: `SQLite` connection string (default: `sqlite://herdbook.db`)
    /// - `BREED_MODEL_PATH`: classifier model file (default: `models/bovine_breed.onnx`)
    /// - `BREED_LABELS_PATH`: label index file (default: `models/bovine_breed_classes.json`)
    /// - `IMAGE_BASE_PATH`: base directory for stored images (default: `images`)
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://herdbook.db".to_string());

        let model_path = std::env::var("BREED_MODEL_PATH")
            .map_or_else(|_| PathBuf::from("models/bovine_breed.onnx"), PathBuf::from);

        let labels_path = std::env::var("BREED_LABELS_PATH").map_or_else(
            |_| PathBuf::from("models/bovine_breed_classes.json"),
            PathBuf::from,
        );

        let image_dir =
            std::env::var("IMAGE_BASE_PATH").map_or_else(|_| PathBuf::from("images"), PathBuf::from);

        Self {
            database_url,
            model_path,
            labels_path,
            image_dir,
        }
    }
}
