//! Orderable resource contract
//!
//! Any admin resource whose rows carry a nullable `order` column can be
//! held in an ordered collection and re-sequenced with batch reorders.

use std::fmt;
use std::hash::Hash;

/// A record with a stable identifier and a nullable persisted `order`.
pub trait Orderable {
    /// Store-assigned identifier, immutable after creation
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Persisted order value; `None` means "append at end"
    fn order(&self) -> Option<i64>;

    fn set_order(&mut self, order: Option<i64>);
}
