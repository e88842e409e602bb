//! Error handling for the House Keeper client.

use std::fmt;

use thiserror::Error;

/// Unified error type for the House Keeper client.
///
/// Service-crate errors convert in via `From`, so application code can use one
/// error type across the whole client surface.
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] house_keeper_auth::AuthError),

    /// Item service errors
    #[error("Items error: {0}")]
    Items(#[from] house_keeper_items::ItemsError),

    /// Location service errors
    #[error("Locations error: {0}")]
    Locations(#[from] house_keeper_locations::LocationsError),

    /// Reminder service errors
    #[error("Reminders error: {0}")]
    Reminders(#[from] house_keeper_reminders::RemindersError),

    /// Upload errors
    #[error("Storage error: {0}")]
    Storage(#[from] house_keeper_storage::StorageError),

    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors from the facade's own endpoints (stats, health)
    #[error("API error: {detail} (status {status})")]
    Api {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// No session is held but the operation needs one
    #[error("Not signed in")]
    MissingSession,

    /// The backend rejected the session
    #[error("Session rejected by the backend")]
    Unauthorized,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}
