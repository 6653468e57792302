//! Reconciliation of sequence position into persisted `order` values
//!
//! A save is split in three steps so the network call can run without
//! holding the collection: [`begin_save`] snapshots the assignment,
//! the caller ships it to the store, then [`commit_save`] stamps the
//! confirmed values back. On failure the ticket is simply dropped.

use std::sync::atomic::{AtomicBool, Ordering};

use shared::{Orderable, SortOrderItem};

use crate::collection::OrderedCollection;

/// Spacing between consecutive persisted orders
pub const ORDER_GAP: i64 = 100;

/// `order = (position + 1) * ORDER_GAP` for every item in sequence
pub fn compute_order_assignment<T: Orderable>(items: &[T]) -> Vec<SortOrderItem<T::Id>> {
    items
        .iter()
        .zip(1..)
        .map(|(item, n)| SortOrderItem::new(item.id().clone(), n * ORDER_GAP))
        .collect()
}

/// Order for a newly appended item: highest existing order plus the gap
pub fn next_order<T: Orderable>(items: &[T]) -> i64 {
    items
        .iter()
        .filter_map(|item| item.order())
        .max()
        .map_or(ORDER_GAP, |max| max + ORDER_GAP)
}

/// Snapshot of the assignment being persisted
#[derive(Debug, Clone)]
pub struct SaveTicket<Id> {
    pub assignment: Vec<SortOrderItem<Id>>,
    revision: u64,
}

impl<Id> SaveTicket<Id> {
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }
}

pub fn begin_save<T: Orderable>(collection: &OrderedCollection<T>) -> SaveTicket<T::Id> {
    SaveTicket {
        assignment: compute_order_assignment(collection.items()),
        revision: collection.revision(),
    }
}

/// Stamp the confirmed orders onto the collection.
///
/// The dirty flag is cleared only when nothing moved since the snapshot;
/// returns whether the collection is clean afterwards.
pub fn commit_save<T: Orderable>(
    collection: &mut OrderedCollection<T>,
    ticket: &SaveTicket<T::Id>,
) -> bool {
    collection.stamp(ticket.assignment.iter().map(|p| (&p.id, p.order)));
    if collection.revision() == ticket.revision {
        collection.mark_clean();
    }
    !collection.is_dirty()
}

/// Tracks whether a save is in flight; one save at a time
#[derive(Debug, Default)]
pub struct Reconciler {
    saving: AtomicBool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Claim the save slot, or `None` if a save is already pending.
    ///
    /// The slot is released when the guard drops, including on cancellation.
    pub fn try_begin(&self) -> Option<SaveGuard<'_>> {
        self.saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SaveGuard { flag: &self.saving })
    }
}

/// Releases the in-flight flag on drop
#[derive(Debug)]
pub struct SaveGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
