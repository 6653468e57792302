//! Client error types
//!
//! [`ClientError`] describes what went wrong on the wire. [`AdminError`] is
//! what the presentation layer gets back from the link board; it always
//! converts into a structured [`AppError`], never escapes as a panic.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Constraint violation (unique key, foreign key, ...)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// PostgREST error body: `{"code":"23505","message":"...","details":...,"hint":...}`
#[derive(Debug, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl ClientError {
    /// Map a non-success status and its body to an error
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let text = match serde_json::from_str::<RestErrorBody>(body) {
            Ok(parsed) => {
                let mut text = parsed.message.unwrap_or_else(|| status.to_string());
                if let Some(details) = parsed.details.filter(|d| !d.is_empty()) {
                    text = format!("{text} ({details})");
                }
                if let Some(code) = parsed.code {
                    text = format!("[{code}] {text}");
                }
                text
            }
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => body.to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden(text),
            StatusCode::NOT_FOUND => Self::NotFound(text),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(text),
            StatusCode::CONFLICT => Self::Conflict(text),
            _ => Self::Internal(text),
        }
    }

    /// Whether the request never got a definitive answer from the store
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout() || e.is_connect() || e.is_request())
    }

    /// Structured error code for this failure
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidResponse,
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Conflict(_) => ErrorCode::AlreadyExists,
            Self::Internal(_) => ErrorCode::DatabaseError,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }
}

/// Store operation a persistence failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    SaveOrder,
    ToggleActive,
    Delete,
    Create,
    Update,
}

impl Operation {
    fn describe(&self) -> &'static str {
        match self {
            Self::Load => "load links",
            Self::SaveOrder => "save the new order",
            Self::ToggleActive => "change the link status",
            Self::Delete => "delete the link",
            Self::Create => "create the link",
            Self::Update => "update the link",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Errors surfaced by the link board
#[derive(Debug, Error)]
pub enum AdminError {
    /// Field-level edit failed its constraints; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Operation referenced a link no longer in the collection
    #[error("Link {0} not found")]
    NotFound(String),

    /// The store call failed; local state was left as before the call
    #[error("Failed to {operation}: {source}")]
    Persistence {
        operation: Operation,
        #[source]
        source: ClientError,
    },

    /// An order save is still pending
    #[error("An order save is already in progress")]
    SaveInFlight,
}

pub type AdminResult<T> = Result<T, AdminError>;

impl AdminError {
    pub fn not_found(id: impl fmt::Display) -> Self {
        Self::NotFound(id.to_string())
    }

    pub fn persistence(operation: Operation, source: ClientError) -> Self {
        Self::Persistence { operation, source }
    }

    /// Field names that failed validation, sorted
    pub fn invalid_fields(&self) -> Vec<String> {
        match self {
            Self::Validation(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|k| k.to_string())
                    .collect();
                fields.sort();
                fields
            }
            _ => Vec::new(),
        }
    }

    /// Banner text for the presentation layer
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => {
                format!("Please check these fields: {}", self.invalid_fields().join(", "))
            }
            Self::NotFound(_) => {
                "This link no longer exists. Reload the list to see the latest data.".to_string()
            }
            Self::Persistence { operation, source } if source.is_transport() => {
                format!("Could not {operation}: the server is unreachable. Please retry.")
            }
            Self::Persistence { operation, .. } => {
                format!("Could not {operation}. Please retry.")
            }
            Self::SaveInFlight => "Saving the current order, please wait.".to_string(),
        }
    }

    /// Structured error code for this failure
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) if self.invalid_fields().iter().any(|f| f == "url") => {
                ErrorCode::LinkInvalidUrl
            }
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::NotFound(_) => ErrorCode::LinkNotFound,
            Self::Persistence {
                operation: Operation::SaveOrder,
                source,
            } if !source.is_transport() => ErrorCode::ReorderRejected,
            Self::Persistence { source, .. } => source.error_code(),
            Self::SaveInFlight => ErrorCode::SaveInFlight,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let mut err = AppError::with_message(self.error_code(), self.user_message());
        match self {
            Self::Validation(_) => {
                err = err.with_detail("fields", self.invalid_fields());
            }
            Self::NotFound(id) => {
                err = err.with_detail("id", id.clone());
            }
            Self::Persistence { source, .. } => {
                err = err.with_detail("cause", source.to_string());
            }
            Self::SaveInFlight => {}
        }
        err
    }
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        err.to_app_error()
    }
}
