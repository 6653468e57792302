//! Admin Client - reorderable links board over a hosted REST store
//!
//! Keeps a local ordered mirror of the links table, lets a presentation
//! layer drag items around, and reconciles the resulting sequence into
//! gap-spaced `order` values with a single batch call.

pub mod board;
pub mod collection;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod reconcile;
pub mod store;

pub use board::{LinkBoard, SaveOutcome};
pub use collection::{MoveTarget, OrderedCollection};
pub use config::ClientConfig;
pub use error::{AdminError, AdminResult, ClientError, ClientResult, Operation};
pub use http::HttpClient;
pub use reconcile::{ORDER_GAP, Reconciler};
pub use store::{LinkStore, MemoryStore, StoreOp, SupabaseStore};

// Re-export shared types for convenience
pub use shared::{ApiResponse, AppError, Link, LinkCreate, LinkUpdate, Page, ViewParams};
