//! Data models
//!
//! Shared between the admin client and every presentation host.
//! All IDs are `i64` (Postgres BIGINT identity columns).

pub mod link;
pub mod orderable;
pub mod sort_order;

// Re-exports
pub use link::*;
pub use orderable::*;
pub use sort_order::*;
