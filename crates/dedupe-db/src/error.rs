use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("No user account with id {user_id} {location}")]
    UserNotFound {
        user_id: i64,
        location: ErrorLocation,
    },

    #[error("Email {email} already belongs to another account {location}")]
    EmailTaken {
        email: String,
        location: ErrorLocation,
    },

    #[error("Invalid merge: {message} {location}")]
    InvalidMerge {
        message: String,
        location: ErrorLocation,
    },

    #[error(
        "Post-cleanup verification failed: {remaining_groups} duplicate group(s) remain {location}"
    )]
    VerificationFailed {
        remaining_groups: usize,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Core(#[from] dedupe_core::CoreError),
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
