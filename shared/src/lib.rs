//! Shared types for the admin back-office
//!
//! Domain models, view parameters, paginated results and the unified
//! error system used by the admin client and its presentation hosts.

pub mod error;
pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{Link, LinkCreate, LinkUpdate, Orderable, SortOrderItem};
pub use request::ViewParams;
pub use response::Page;
