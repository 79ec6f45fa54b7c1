//! Database-specific error types and conversions.

use portico_core::error::PorticoError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for PorticoError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PorticoError::NotFound { entity, id },
            other => PorticoError::Database(other.to_string()),
        }
    }
}
