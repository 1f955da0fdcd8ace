// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Every variant is caused by caller input; the in-memory store itself has
/// no failure mode.
#[derive(Error, Debug)]
pub enum AppError {
    /// Broken domain invariant (queue name rules)
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    /// Request exceeds a configured broker limit
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
