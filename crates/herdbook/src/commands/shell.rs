//! Shell command - interactive session that walks the app's pages.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use bytes::Bytes;
use database::{
    CreateUser, Gender, PredictionRepository, StoreError, UpdateProfile, UserRepository,
};
use sqlx::SqlitePool;

use crate::session::{Page, Session};
use crate::workflow::{Measurements, Workflow, WorkflowError};

/// Runs the interactive shell.
///
/// Expected failures (bad credentials, out-of-range measurements, unknown
/// commands) are printed and the shell keeps going; only infrastructure
/// faults end it.
///
/// # Errors
///
/// Returns an error if stdin is unreadable or the database is unreachable.
pub async fn run(workflow: &mut Workflow, pool: &SqlitePool) -> Result<()> {
    println!("Cattle breed logbook. Classifier {}.", workflow.classifier_status());
    println!("Type 'help' for commands, 'quit' to leave.");

    let mut session = Session::new();
    let mut lines = io::stdin().lock().lines();

    loop {
        print!("{}> ", session.page());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            continue;
        };

        match (session.page(), command) {
            (_, "quit" | "exit") => break,
            (_, "help") => print_help(session.page()),
            (_, "logout") => {
                session.logout();
                println!("Logged out.");
            }
            (_, "go") => match args.first().and_then(|name| Page::from_str(name)) {
                Some(target) => {
                    if let Err(err) = session.navigate(target) {
                        println!("{err}");
                    }
                }
                None => println!("Pages: auth, upload, profile, records."),
            },
            (Page::Auth, "signup") => {
                if let [email, password] = *args {
                    let input = CreateUser {
                        email: email.to_string(),
                        password: password.to_string(),
                    };
                    match UserRepository::create_account(pool, input).await {
                        Ok(user) => {
                            println!("Account created for {}. Log in to continue.", user.email);
                        }
                        Err(StoreError::DuplicateAccount { email }) => {
                            println!("An account already exists for {email}.");
                        }
                        Err(err) => return Err(err.into()),
                    }
                } else {
                    println!("Usage: signup <email> <password>");
                }
            }
            (Page::Auth, "login") => {
                if let [email, password] = *args {
                    match UserRepository::authenticate(pool, email, password).await? {
                        Some(user) => {
                            println!("Welcome, {}.", user.email);
                            session.login(user);
                        }
                        None => println!("Invalid email or password."),
                    }
                } else {
                    println!("Usage: login <email> <password>");
                }
            }
            (Page::Auth, "skip") => {
                session.skip();
                println!("Continuing without an account. Records cannot be saved.");
            }
            (Page::Upload, "classify") => {
                if let [path] = *args {
                    match image::open(path) {
                        Ok(image) => {
                            let prediction = workflow.classify(&image)?;
                            println!(
                                "Predicted breed: {} ({:.2}% confidence)",
                                prediction.label, prediction.confidence
                            );
                        }
                        Err(err) => println!("Failed to read image: {err}"),
                    }
                } else {
                    println!("Usage: classify <image-path>");
                }
            }
            (Page::Upload, "save") => {
                if let [image, breed, height, weight, age, gender] = *args {
                    let Some(measurements) = parse_measurements(height, weight, age, gender)
                    else {
                        continue;
                    };
                    match std::fs::read(image) {
                        Ok(data) => {
                            let result = workflow
                                .save_prediction(
                                    session.user(),
                                    Bytes::from(data),
                                    Some(image),
                                    breed,
                                    measurements,
                                )
                                .await;
                            match result {
                                Ok(record) => {
                                    println!("Saved record #{} ({}).", record.id, record.breed);
                                }
                                Err(
                                    err @ (WorkflowError::LoginRequired
                                    | WorkflowError::Validation(_)),
                                ) => println!("{err}"),
                                Err(err) => return Err(err.into()),
                            }
                        }
                        Err(err) => println!("Failed to read image: {err}"),
                    }
                } else {
                    println!("Usage: save <image-path> <breed> <height> <weight> <age> <gender>");
                }
            }
            (Page::Records, "list") => {
                let Some(user) = session.user() else {
                    println!("Log in to view records.");
                    continue;
                };
                let records = PredictionRepository::list_records(pool, user.id).await?;
                if records.is_empty() {
                    println!("No records saved yet.");
                }
                for record in records {
                    println!(
                        "#{} {} | {} cm, {} kg, {} yr, {} | {}",
                        record.id,
                        record.breed,
                        record.height,
                        record.weight,
                        record.age,
                        record.gender,
                        record.created_at.format("%Y-%m-%d %H:%M"),
                    );
                }
            }
            (Page::Profile, "update") => {
                if let [name, phone, address] = *args {
                    let Some(user) = session.user() else {
                        println!("Log in to update the profile.");
                        continue;
                    };
                    let update = UpdateProfile {
                        name: profile_field(name),
                        phone: profile_field(phone),
                        address: profile_field(address),
                    };
                    UserRepository::update_profile(pool, user.id, update).await?;
                    println!("Profile updated.");
                } else {
                    println!("Usage: update <name> <phone> <address> ('-' clears a field)");
                }
            }
            _ => println!("Unknown command here. Type 'help'."),
        }
    }

    Ok(())
}

fn print_help(page: Page) {
    println!("Anywhere: help, go <page>, logout, quit");
    match page {
        Page::Auth => println!("Here: signup <email> <password>, login <email> <password>, skip"),
        Page::Upload => println!(
            "Here: classify <image-path>, save <image-path> <breed> <height> <weight> <age> <gender>"
        ),
        Page::Profile => println!("Here: update <name> <phone> <address> ('-' clears a field)"),
        Page::Records => println!("Here: list"),
    }
}

fn parse_measurements(height: &str, weight: &str, age: &str, gender: &str) -> Option<Measurements> {
    let height = parse_number("height", height)?;
    let weight = parse_number("weight", weight)?;
    let age = parse_number("age", age)?;
    let Some(gender) = Gender::from_str(gender) else {
        println!("Invalid gender. Use: male, female");
        return None;
    };

    Some(Measurements {
        height,
        weight,
        age,
        gender,
    })
}

fn parse_number(field: &str, value: &str) -> Option<f64> {
    match value.parse() {
        Ok(number) => Some(number),
        Err(_) => {
            println!("{field} must be a number, got '{value}'");
            None
        }
    }
}
