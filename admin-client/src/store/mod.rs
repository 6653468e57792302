//! Persisted Store contract
//!
//! The store is the single arbiter of durable link state. The board only
//! ever talks to it through [`LinkStore`], so a hosted REST backend and the
//! in-process [`MemoryStore`] are interchangeable.

mod memory;
mod supabase;

pub use memory::{MemoryStore, StoreOp};
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use shared::{Link, LinkCreate, LinkUpdate, Page, SortOrderItem, ViewParams};

use crate::ClientResult;

/// Store operations for orderable links
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// All links, including `order` and `active`
    async fn list_items(&self) -> ClientResult<Vec<Link>>;

    /// One page of links matching the view's search term
    async fn list_page(&self, params: &ViewParams) -> ClientResult<Page<Link>>;

    /// Insert a link; the returned row carries the assigned id and order
    async fn create_item(&self, fields: &LinkCreate) -> ClientResult<Link>;

    /// Patch a link's descriptive fields or `active` flag
    async fn update_item(&self, id: i64, fields: &LinkUpdate) -> ClientResult<Link>;

    /// Delete a link; `false` when no row matched
    async fn delete_item(&self, id: i64) -> ClientResult<bool>;

    /// Write every `(id, order)` pair or none of them
    async fn batch_reorder(&self, pairs: &[SortOrderItem]) -> ClientResult<()>;
}
