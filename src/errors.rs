//! Unified error type for the store, aggregation and data-transfer layers.

use crate::entities::EntityKind;
use thiserror::Error;

/// Every failure the core can report. Nothing is retried; callers decide how
/// to surface the error to the user.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Update, delete or toggle targeted an id that does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Collection that was searched
        entity: EntityKind,
        /// Missing id
        id: i64,
    },

    /// An import document is missing its `version` or `data` section
    #[error("Invalid import file format: {message}")]
    Import {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// File system failure while exporting, importing or backing up
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Environment variable present but unreadable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] on the given collection.
    #[must_use]
    pub const fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
