//! Errors surfaced by repository implementations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Failed to check a connection out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// An insert or update hit a unique constraint. Kept separate from
    /// [`RepositoryError::Database`] so callers can retry slug collisions.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[source] diesel::result::Error),
    /// A stored row no longer satisfies a domain constraint.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => RepositoryError::UniqueViolation(info.message().to_string()),
            other => RepositoryError::Database(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
