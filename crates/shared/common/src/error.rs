//! Error taxonomy for the authentication core.
//!
//! Every failure surfaced by the orchestrator is one of the variants below.
//! The transport layer picks a gRPC status code with a pure mapping
//! (`grpc_code`, `From<AppError> for Status`).

use domain::DomainError;
use thiserror::Error;
use tonic::{Code, Status};

/// Message shared by both credential failures so callers cannot tell them apart.
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Input
    #[error("{0}")]
    Validation(String),

    // Accounts
    #[error("User not found")]
    UserNotFound,

    #[error("User with email already exists")]
    AlreadyExists,

    #[error("Passwords do not match")]
    WrongPassword,

    // Tokens
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// gRPC code for this error kind.
    pub fn grpc_code(&self) -> Code {
        match self {
            AppError::Validation(_) => Code::InvalidArgument,
            AppError::UserNotFound => Code::NotFound,
            AppError::AlreadyExists => Code::AlreadyExists,
            AppError::WrongPassword | AppError::InvalidToken(_) | AppError::ExpiredToken => {
                Code::Unauthenticated
            }
            _ => Code::Internal,
        }
    }

    /// gRPC code for operations that check credentials.
    ///
    /// An unknown email is reported exactly like a wrong password so the code
    /// does not reveal whether an account exists.
    pub fn credentials_code(&self) -> Code {
        match self {
            AppError::UserNotFound => Code::Unauthenticated,
            other => other.grpc_code(),
        }
    }

    /// Convert into a gRPC status using the credentials mapping.
    pub fn into_credentials_status(self) -> Status {
        match self {
            AppError::UserNotFound | AppError::WrongPassword => {
                Status::new(self.credentials_code(), INVALID_CREDENTIALS_MESSAGE)
            }
            other => Status::from(other),
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidToken(reason) => {
                tracing::debug!("Token rejected: {}", reason);
                "Invalid token".to_string()
            }

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

// =============================================================================
// gRPC Status (Tonic)
// =============================================================================

impl From<AppError> for Status {
    fn from(err: AppError) -> Self {
        Status::new(err.grpc_code(), err.user_message())
    }
}

// =============================================================================
// Domain / Store Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Password(msg) => AppError::Internal(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Unique-constraint violations are duplicate registrations; everything else
/// stays an opaque database error.
#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyExists,
            _ => AppError::Database(err),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invalid_token(reason: impl Into<String>) -> Self {
        AppError::InvalidToken(reason.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
