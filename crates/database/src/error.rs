use sea_orm::DbErr;
use thiserror::Error;

/// Failure of an admin operation, carrying the message shown to the operator
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected before touching the database
    #[error("{0}")]
    Validation(String),

    /// An application-level uniqueness check failed
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Gagal menyimpan data: {0}")]
    Database(#[from] DbErr),
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
