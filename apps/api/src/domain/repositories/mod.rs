// Repository contracts (ports)
// Implemented by adapters in `infrastructure::repositories`

pub mod incident_repository;
pub mod user_repository;

use thiserror::Error;

pub use incident_repository::IncidentRepository;
pub use user_repository::{NewUser, User, UserRepository};

/// Errors surfaced by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored row could not be mapped back into a domain value
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
