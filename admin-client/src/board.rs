//! Link board controller
//!
//! Owns the local ordered collection of links and mediates every change
//! between the presentation layer and the store:
//! - drag moves are local and synchronous, they only mark the board dirty
//! - `save_order` commits the whole sequence in one all-or-nothing batch
//! - toggle / delete / upsert are single-row calls that bypass reordering
//!
//! Store failures never escape as panics; callers always get an
//! [`AdminError`] that maps onto a structured `AppError`.

use std::sync::Arc;

use parking_lot::Mutex;
use shared::{Link, LinkCreate, LinkUpdate, Page, ViewParams};
use validator::Validate;

use crate::collection::{MoveTarget, OrderedCollection};
use crate::error::{AdminError, AdminResult, Operation};
use crate::reconcile::{Reconciler, begin_save, commit_save, next_order};
use crate::store::LinkStore;

/// Result of a committed order save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Number of `(id, order)` pairs written
    pub written: usize,
    /// Whether the board is clean after stamping
    pub clean: bool,
}

/// Controller for the reorderable links list
pub struct LinkBoard<S> {
    store: Arc<S>,
    collection: Mutex<OrderedCollection<Link>>,
    reconciler: Reconciler,
}

impl<S: LinkStore> LinkBoard<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            collection: Mutex::new(OrderedCollection::default()),
            reconciler: Reconciler::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetch every link and make it the clean baseline.
    ///
    /// On failure the current collection is kept untouched. Refused while a
    /// save is pending.
    pub async fn load(&self) -> AdminResult<usize> {
        if self.is_saving() {
            return Err(AdminError::SaveInFlight);
        }
        let links = self.store.list_items().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to load links");
            AdminError::persistence(Operation::Load, e)
        })?;
        let count = links.len();

        // checked under the lock: a save claims its slot before snapshotting
        let mut collection = self.collection.lock();
        if self.is_saving() {
            tracing::warn!("Discarding load that raced an order save");
            return Err(AdminError::SaveInFlight);
        }
        collection.initialize(links);
        drop(collection);

        tracing::debug!(count, "Links loaded");
        Ok(count)
    }

    /// Fetch one page of links for a list screen
    pub async fn list_page(&self, params: &ViewParams) -> AdminResult<Page<Link>> {
        self.store
            .list_page(params)
            .await
            .map_err(|e| AdminError::persistence(Operation::Load, e))
    }

    /// Current sequence, in display order
    pub fn snapshot(&self) -> Vec<Link> {
        self.collection.lock().items().to_vec()
    }

    pub fn is_dirty(&self) -> bool {
        self.collection.lock().is_dirty()
    }

    /// Whether an order save is pending; drag interaction should be disabled
    pub fn is_saving(&self) -> bool {
        self.reconciler.is_saving()
    }

    /// Apply a drag-end: move `id` before `target` (or to the end).
    ///
    /// Unknown ids and no-op moves return `Ok(false)`. Moves are refused
    /// while a save is in flight.
    pub fn move_item(&self, id: i64, target: MoveTarget<i64>) -> AdminResult<bool> {
        if self.is_saving() {
            return Err(AdminError::SaveInFlight);
        }
        let moved = self.collection.lock().move_item(&id, target);
        if moved {
            tracing::debug!(link_id = id, "Link moved");
        }
        Ok(moved)
    }

    /// Persist the current sequence as gap-spaced orders in one batch.
    ///
    /// A second call while one is pending is refused. On failure no local
    /// `order` is touched and the board stays dirty.
    pub async fn save_order(&self) -> AdminResult<SaveOutcome> {
        let Some(_guard) = self.reconciler.try_begin() else {
            return Err(AdminError::SaveInFlight);
        };

        let ticket = begin_save(&self.collection.lock());
        tracing::debug!(count = ticket.len(), "Saving link order");

        if let Err(e) = self.store.batch_reorder(&ticket.assignment).await {
            tracing::warn!(error = %e, "Link order save failed");
            return Err(AdminError::persistence(Operation::SaveOrder, e));
        }

        let clean = commit_save(&mut self.collection.lock(), &ticket);
        tracing::info!(count = ticket.len(), clean, "Link order saved");
        Ok(SaveOutcome {
            written: ticket.len(),
            clean,
        })
    }

    /// Flip a link's `active` flag, rolling back if the store refuses
    pub async fn toggle_active(&self, id: i64) -> AdminResult<Link> {
        let active = {
            let mut collection = self.collection.lock();
            let Some(link) = collection.get_mut(&id) else {
                tracing::warn!(link_id = id, "Toggle on unknown link");
                return Err(AdminError::not_found(id));
            };
            link.active = !link.active;
            link.active
        };

        match self.store.update_item(id, &LinkUpdate::active(active)).await {
            Ok(row) => {
                self.collection.lock().replace(row.clone());
                tracing::info!(link_id = id, active, "Link status changed");
                Ok(row)
            }
            Err(e) => {
                tracing::warn!(link_id = id, error = %e, "Toggle failed, rolling back");
                if let Some(link) = self.collection.lock().get_mut(&id) {
                    link.active = !active;
                }
                Err(AdminError::persistence(Operation::ToggleActive, e))
            }
        }
    }

    /// Delete a link from the store, then from the board.
    ///
    /// Remaining orders are not renumbered.
    pub async fn delete_item(&self, id: i64) -> AdminResult<()> {
        if self.is_saving() {
            return Err(AdminError::SaveInFlight);
        }
        if !self.collection.lock().contains(&id) {
            tracing::warn!(link_id = id, "Delete on unknown link");
            return Err(AdminError::not_found(id));
        }

        let existed = self
            .store
            .delete_item(id)
            .await
            .map_err(|e| {
                tracing::warn!(link_id = id, error = %e, "Delete failed");
                AdminError::persistence(Operation::Delete, e)
            })?;
        if !existed {
            tracing::warn!(link_id = id, "Link was already gone from the store");
        }

        self.collection.lock().remove(&id);
        tracing::info!(link_id = id, "Link deleted");
        Ok(())
    }

    /// Create a link (`existing_id == None`) or edit one's descriptive fields.
    ///
    /// Values are validated before any network call. New links are always
    /// appended at `max order + GAP` (any `order` in `values` is ignored) and
    /// default to active; edits never touch `order`.
    pub async fn upsert_item(
        &self,
        mut values: LinkCreate,
        existing_id: Option<i64>,
    ) -> AdminResult<Link> {
        values.validate()?;

        match existing_id {
            None => {
                if self.is_saving() {
                    return Err(AdminError::SaveInFlight);
                }
                values.order = Some(next_order(self.collection.lock().items()));
                values.active.get_or_insert(true);

                let link = self.store.create_item(&values).await.map_err(|e| {
                    tracing::warn!(error = %e, "Create failed");
                    AdminError::persistence(Operation::Create, e)
                })?;
                self.collection.lock().push(link.clone());
                tracing::info!(link_id = link.id, order = ?link.order, "Link created");
                Ok(link)
            }
            Some(id) => {
                if !self.collection.lock().contains(&id) {
                    tracing::warn!(link_id = id, "Edit on unknown link");
                    return Err(AdminError::not_found(id));
                }

                let update = LinkUpdate::from(values);
                let link = self.store.update_item(id, &update).await.map_err(|e| {
                    tracing::warn!(link_id = id, error = %e, "Update failed");
                    AdminError::persistence(Operation::Update, e)
                })?;
                self.collection.lock().replace(link.clone());
                tracing::info!(link_id = id, "Link updated");
                Ok(link)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreOp};

    fn link(id: i64, order: Option<i64>) -> Link {
        Link {
            id,
            title: format!("Link {id}"),
            url: format!("https://example.com/{id}"),
            image: None,
            description: None,
            order,
            active: true,
            created_at: None,
        }
    }

    async fn loaded(rows: Vec<Link>) -> (Arc<MemoryStore>, LinkBoard<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_rows(rows));
        let board = LinkBoard::new(store.clone());
        board.load().await.unwrap();
        (store, board)
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_items() {
        let (store, board) = loaded(vec![link(1, Some(100))]).await;
        store.set_failing(StoreOp::List, true);

        let err = board.load().await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::Persistence {
                operation: Operation::Load,
                ..
            }
        ));
        assert_eq!(board.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_save_on_clean_board_rewrites_same_orders() {
        let (store, board) = loaded(vec![link(1, Some(100)), link(2, Some(200))]).await;
        let outcome = board.save_order().await.unwrap();
        assert_eq!(outcome, SaveOutcome { written: 2, clean: true });
        assert_eq!(store.row(2).unwrap().order, Some(200));
    }

    #[tokio::test]
    async fn test_move_unknown_id_is_noop() {
        let (_, board) = loaded(vec![link(1, Some(100))]).await;
        assert!(!board.move_item(42, MoveTarget::End).unwrap());
        assert!(!board.is_dirty());
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_not_found() {
        let (store, board) = loaded(vec![link(1, Some(100))]).await;
        let err = board.toggle_active(7).await.unwrap_err();
        assert!(matches!(err, AdminError::NotFound(_)));
        assert_eq!(store.call_count(StoreOp::Update), 0);
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_item() {
        let (store, board) = loaded(vec![link(1, Some(100)), link(2, Some(200))]).await;
        store.set_failing(StoreOp::Delete, true);
        assert!(board.delete_item(2).await.is_err());
        assert_eq!(board.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_keeps_order_and_position() {
        let (_, board) = loaded(vec![link(1, Some(100)), link(2, Some(200))]).await;
        let edited = board
            .upsert_item(
                LinkCreate {
                    title: "Renamed".to_string(),
                    url: "https://example.com/renamed".to_string(),
                    order: Some(5),
                    ..Default::default()
                },
                Some(1),
            )
            .await
            .unwrap();
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.order, Some(100));
        assert_eq!(board.snapshot()[0].id, 1);
    }

    #[tokio::test]
    async fn test_edit_unknown_id_is_not_found() {
        let (_, board) = loaded(Vec::new()).await;
        let err = board
            .upsert_item(
                LinkCreate {
                    title: "Ghost".to_string(),
                    url: "https://example.com".to_string(),
                    ..Default::default()
                },
                Some(9),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::NotFound(_)));
    }
}
