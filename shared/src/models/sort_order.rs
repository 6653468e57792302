//! Batch reorder payload

use serde::{Deserialize, Serialize};

/// One `(id, order)` pair of a batch reorder request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrderItem<Id = i64> {
    pub id: Id,
    pub order: i64,
}

impl<Id> SortOrderItem<Id> {
    pub fn new(id: Id, order: i64) -> Self {
        Self { id, order }
    }
}

/// Body of the reorder RPC call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSortOrderRequest<Id = i64> {
    pub items: Vec<SortOrderItem<Id>>,
}
