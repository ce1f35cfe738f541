//! Database model types.

use core::fmt;

use sqlx::types::chrono::{DateTime, Utc};

/// Gender recorded for a classified animal, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Returns the gender from a string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Male => "Male",
            Self::Female => "Female",
        };
        write!(f, "{name}")
    }
}

/// A registered user account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A saved breed prediction with its body measurements.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PredictionRecord {
    pub id: i64,
    pub user_id: i64,
    pub breed: String,
    pub height: f64,
    pub weight: f64,
    pub gender: Gender,
    pub image_path: String,
    pub age: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user account.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
}

/// Input for overwriting a user's profile fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for creating a new prediction record.
#[derive(Debug, Clone)]
pub struct CreatePrediction {
    pub user_id: i64,
    pub breed: String,
    pub height: f64,
    pub weight: f64,
    pub gender: Gender,
    pub image_path: String,
    pub age: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_from_str() {
        assert_eq!(Gender::from_str("Male"), Some(Gender::Male));
        assert_eq!(Gender::from_str("female"), Some(Gender::Female));
        assert_eq!(Gender::from_str("F"), Some(Gender::Female));
        assert_eq!(Gender::from_str("heifer"), None);
        assert_eq!(Gender::from_str(""), None);
    }

    #[test]
    fn test_gender_display_matches_stored_text() {
        assert_eq!(Gender::Male.to_string(), "Male");
        assert_eq!(Gender::Female.to_string(), "Female");
    }
}
