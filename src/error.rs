//! Error types for the studio booking engine
//!
//! Business rejections (slot unavailable, coupon refused) are ordinary
//! values returned by the services, never errors. `AppError` is reserved
//! for caller invariant violations and store failures.

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
