//! Cattle Breed Logbook
//!
//! Classifies cattle breeds from photographs with an ONNX model and keeps
//! per-user measurement records in SQLite.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use classifier::BreedClassifier;
use config::Config;
use database::{UpdateProfile, create_pool, run_migrations};
use herdbook::commands;
use herdbook::commands::save::SaveRequest;
use herdbook::intake::ImageStore;
use herdbook::workflow::Workflow;
use sqlx::SqlitePool;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Cattle Breed Logbook
#[derive(Parser)]
#[command(name = "herdbook")]
#[command(about = "Classifies cattle breeds from images and keeps measurement records")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Signup {
        /// Email address to register
        #[arg(short, long)]
        email: String,

        /// Password for the new account
        #[arg(short, long)]
        password: String,
    },

    /// Check a credential pair
    Login {
        /// Email address of the account
        #[arg(short, long)]
        email: String,

        /// Password for the account
        #[arg(short, long)]
        password: String,
    },

    /// Classify a cattle image without saving anything
    Classify {
        /// Path to the image file
        #[arg(short, long)]
        image: PathBuf,
    },

    /// Classify an image and save a measurement record
    Save {
        /// Email address of the account
        #[arg(short, long)]
        email: String,

        /// Password for the account
        #[arg(short, long)]
        password: String,

        /// Path to the image file
        #[arg(short, long)]
        image: PathBuf,

        /// Breed to record (defaults to the classifier's suggestion)
        #[arg(short, long)]
        breed: Option<String>,

        /// Height at the withers in centimetres (50-250)
        #[arg(long)]
        height: f64,

        /// Body weight in kilograms (50-1000)
        #[arg(short, long)]
        weight: f64,

        /// Age in years (0-25)
        #[arg(short, long)]
        age: f64,

        /// Gender of the animal ("male" or "female")
        #[arg(short, long)]
        gender: String,
    },

    /// List saved records, most recent first
    Records {
        /// Email address of the account
        #[arg(short, long)]
        email: String,

        /// Password for the account
        #[arg(short, long)]
        password: String,
    },

    /// Update the contact details on an account
    Profile {
        /// Email address of the account
        #[arg(short, long)]
        email: String,

        /// Password for the account
        #[arg(short, long)]
        password: String,

        /// Display name to store
        #[arg(short, long)]
        name: Option<String>,

        /// Phone number to store
        #[arg(long)]
        phone: Option<String>,

        /// Postal address to store
        #[arg(long)]
        address: Option<String>,
    },

    /// Open the interactive shell
    Shell,

    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env();
    let pool = create_pool(&config.database_url).await?;

    match cli.command {
        Commands::Signup { email, password } => {
            commands::signup::run(&pool, &email, &password).await?;
        }
        Commands::Login { email, password } => {
            commands::login::run(&pool, &email, &password).await?;
        }
        Commands::Classify { image } => {
            let mut workflow = build_workflow(&config, pool.clone())?;
            commands::classify::run(&mut workflow, &image)?;
        }
        Commands::Save {
            email,
            password,
            image,
            breed,
            height,
            weight,
            age,
            gender,
        } => {
            let mut workflow = build_workflow(&config, pool.clone())?;
            let request = SaveRequest {
                email,
                password,
                image,
                breed,
                height,
                weight,
                age,
                gender,
            };
            commands::save::run(&mut workflow, &pool, request).await?;
        }
        Commands::Records { email, password } => {
            commands::records::run(&pool, &email, &password).await?;
        }
        Commands::Profile {
            email,
            password,
            name,
            phone,
            address,
        } => {
            let update = UpdateProfile {
                name,
                phone,
                address,
            };
            commands::profile::run(&pool, &email, &password, update).await?;
        }
        Commands::Shell => {
            let mut workflow = build_workflow(&config, pool.clone())?;
            commands::shell::run(&mut workflow, &pool).await?;
        }
        Commands::Migrate => {
            run_migrations(&pool).await?;
            info!("Migrations completed successfully");
        }
    }

    Ok(())
}

fn build_workflow(config: &Config, pool: SqlitePool) -> Result<Workflow> {
    let classifier = BreedClassifier::load(&config.model_path, &config.labels_path);
    let images = ImageStore::open(&config.image_dir)?;

    Ok(Workflow::new(pool, classifier, images))
}
