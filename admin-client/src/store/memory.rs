//! In-process link store
//!
//! Behaves like the hosted store (id assignment, append-at-end ordering,
//! all-or-nothing reorders) and adds failure injection, call counting and a
//! reorder gate so hosts can run offline and tests can pin down timing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{Link, LinkCreate, LinkUpdate, Orderable, Page, SortOrderItem, ViewParams};
use tokio::sync::Notify;

use super::LinkStore;
use crate::reconcile::next_order;
use crate::{ClientError, ClientResult};

/// Store operation kinds, for failure injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Create,
    Update,
    Delete,
    Reorder,
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<Link>,
    next_id: i64,
    failing: HashSet<StoreOp>,
    calls: HashMap<StoreOp, usize>,
    reorders: Vec<Vec<SortOrderItem>>,
}

/// [`LinkStore`] kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    reorder_gate: Mutex<Option<Arc<Notify>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows as-is; new ids continue after the highest seeded id
    pub fn with_rows(rows: Vec<Link>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            state: Mutex::new(MemoryState {
                rows,
                next_id,
                ..Default::default()
            }),
            reorder_gate: Mutex::new(None),
        }
    }

    /// Make every call of `op` fail (or succeed again) until changed
    pub fn set_failing(&self, op: StoreOp, failing: bool) {
        let mut state = self.state.lock();
        if failing {
            state.failing.insert(op);
        } else {
            state.failing.remove(&op);
        }
    }

    /// Hold every subsequent reorder until the returned handle is notified
    pub fn hold_reorders(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.reorder_gate.lock() = Some(gate.clone());
        gate
    }

    /// Number of calls made for `op`, failed ones included
    pub fn call_count(&self, op: StoreOp) -> usize {
        self.state.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Every batch that reached the store, in call order
    pub fn reorder_batches(&self) -> Vec<Vec<SortOrderItem>> {
        self.state.lock().reorders.clone()
    }

    /// Stored rows, in storage (insertion) order
    pub fn rows(&self) -> Vec<Link> {
        self.state.lock().rows.clone()
    }

    pub fn row(&self, id: i64) -> Option<Link> {
        self.state.lock().rows.iter().find(|r| r.id == id).cloned()
    }

    /// Count the call and fail it if `op` is marked failing
    fn enter(&self, op: StoreOp) -> ClientResult<()> {
        let mut state = self.state.lock();
        *state.calls.entry(op).or_default() += 1;
        if state.failing.contains(&op) {
            return Err(ClientError::Internal(format!("injected {op:?} failure")));
        }
        Ok(())
    }
}

/// Rows sorted the way the REST store lists them
fn sorted(rows: &[Link]) -> Vec<Link> {
    let mut rows = rows.to_vec();
    rows.sort_by_key(|r| (r.order.is_none(), r.order, r.id));
    rows
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn list_items(&self) -> ClientResult<Vec<Link>> {
        self.enter(StoreOp::List)?;
        Ok(sorted(&self.state.lock().rows))
    }

    async fn list_page(&self, params: &ViewParams) -> ClientResult<Page<Link>> {
        self.enter(StoreOp::List)?;
        let rows = sorted(&self.state.lock().rows);
        let term = params.search_term().map(str::to_lowercase);
        let matching: Vec<Link> = rows
            .into_iter()
            .filter(|r| match &term {
                Some(t) => r.title.to_lowercase().contains(t.as_str()),
                None => true,
            })
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit() as usize)
            .collect();
        Ok(Page::new(items, Some(total), params))
    }

    async fn create_item(&self, fields: &LinkCreate) -> ClientResult<Link> {
        self.enter(StoreOp::Create)?;
        let mut state = self.state.lock();
        state.next_id += 1;
        let link = Link {
            id: state.next_id,
            title: fields.title.clone(),
            url: fields.url.clone(),
            image: fields.image.clone(),
            description: fields.description.clone(),
            order: Some(fields.order.unwrap_or_else(|| next_order(&state.rows))),
            active: fields.active.unwrap_or(true),
            created_at: None,
        };
        state.rows.push(link.clone());
        Ok(link)
    }

    async fn update_item(&self, id: i64, fields: &LinkUpdate) -> ClientResult<Link> {
        self.enter(StoreOp::Update)?;
        let mut state = self.state.lock();
        let row = state
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("link {id}")))?;
        fields.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_item(&self, id: i64) -> ClientResult<bool> {
        self.enter(StoreOp::Delete)?;
        let mut state = self.state.lock();
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        Ok(state.rows.len() != before)
    }

    async fn batch_reorder(&self, pairs: &[SortOrderItem]) -> ClientResult<()> {
        let gate = self.reorder_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.enter(StoreOp::Reorder)?;
        let mut state = self.state.lock();
        state.reorders.push(pairs.to_vec());

        if let Some(missing) = pairs
            .iter()
            .find(|p| !state.rows.iter().any(|r| r.id == p.id))
        {
            return Err(ClientError::NotFound(format!("link {}", missing.id)));
        }
        for pair in pairs {
            if let Some(row) = state.rows.iter_mut().find(|r| r.id == pair.id) {
                row.set_order(Some(pair.order));
            }
        }
        Ok(())
    }
}
