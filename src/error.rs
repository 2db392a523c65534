//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure the credential workflow, the token codec, the identity directory or
//! the request gate can produce is one of its variants, and each variant maps to
//! exactly one HTTP status.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers and middleware
//! can return it directly. `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error` and
//! `bcrypt::BcryptError` allow the `?` operator at every seam.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed request payload (HTTP 400).
    BadRequest(String),
    /// Request payload failed field validation (HTTP 400).
    ValidationError(String),
    /// Registration for a key that already exists (HTTP 400).
    DuplicateIdentity,
    /// Login failure. Unknown key and wrong secret both produce this (HTTP 401).
    InvalidCredentials,
    /// Hashing the secret failed during registration (HTTP 500).
    HashingFailure(String),
    /// No bearer header, or one that cannot be parsed (HTTP 401).
    Unauthenticated(String),
    /// A token that failed verification for any reason (HTTP 403).
    InvalidToken,
    /// Valid request context but insufficient role, or a rejected token (HTTP 403).
    Forbidden,
    /// Represents a situation where a requested resource was not found (HTTP 404).
    NotFound(String),
    /// Represents an error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Process configuration is missing or invalid. Raised at construction time only.
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DuplicateIdentity => write!(f, "email already registered"),
            AppError::InvalidCredentials => write!(f, "invalid credentials"),
            AppError::HashingFailure(msg) => write!(f, "Hashing Failure: {}", msg),
            AppError::Unauthenticated(msg) => write!(f, "{}", msg),
            // InvalidToken and Forbidden share a message so the two stages cannot be told apart.
            AppError::InvalidToken | AppError::Forbidden => write!(f, "unauthorized"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Server-side faults are reported with a generic message; the detail only goes to the log.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::ValidationError(_) | AppError::DuplicateIdentity => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials | AppError::Unauthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::InvalidToken | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::HashingFailure(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::HashingFailure(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::Configuration(_) => {
                log::error!("{}", self);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`, a unique-constraint violation becomes
/// `DuplicateIdentity`, everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateIdentity
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// Only field names and rule codes are kept. The rejected values stay out of the message,
/// since one of them may be a plaintext secret.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        let mut failures: Vec<String> = error
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors
                    .iter()
                    .map(move |rule| format!("{}: {}", field, rule.code))
            })
            .collect();
        failures.sort();
        AppError::ValidationError(failures.join(", "))
    }
}

/// Every `jsonwebtoken` failure collapses to `InvalidToken`; the reason is dropped on purpose.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::InvalidToken
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::HashingFailure(error.to_string())
    }
}
