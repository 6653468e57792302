//! Unified error system for the admin back-office
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified result envelope for the presentation layer
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Store rejected the credentials
//! - 2xxx: Store denied the operation
//! - 3xxx: Link / ordering errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::LinkNotFound);
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Invalid URL")
//!     .with_detail("field", "url");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(2));
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
