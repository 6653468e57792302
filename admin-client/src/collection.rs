//! Local Ordered Collection
//!
//! In-memory mirror of the store's rows. Sequence position is the display
//! order; each item's `order` field is only the last persisted projection
//! of that position. Drag moves mutate the sequence synchronously and mark
//! the collection dirty; nothing here touches the network.

use shared::Orderable;

/// Where a moved item lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget<Id> {
    /// Immediately before the referenced item
    Before(Id),
    /// After every other item
    End,
}

/// Ordered sequence of items plus its dirty flag
#[derive(Debug, Clone)]
pub struct OrderedCollection<T: Orderable> {
    items: Vec<T>,
    dirty: bool,
    /// Bumped on every effective move
    revision: u64,
}

impl<T: Orderable> Default for OrderedCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dirty: false,
            revision: 0,
        }
    }
}

impl<T: Orderable> OrderedCollection<T> {
    /// Build a clean collection from the store's rows
    pub fn new(items: Vec<T>) -> Self {
        let mut collection = Self::default();
        collection.initialize(items);
        collection
    }

    /// Replace the contents with `items` sorted by `order` ascending.
    ///
    /// Null orders go last; ties keep their position in `items`.
    pub fn initialize(&mut self, mut items: Vec<T>) {
        // sort_by_key is stable, which gives the positional tie-break
        items.sort_by_key(|item| (item.order().is_none(), item.order()));
        self.items = items;
        self.dirty = false;
        self.revision += 1;
    }

    /// Move `id` before `target`, or to the end.
    ///
    /// Returns `false` without marking dirty when the id is unknown, the
    /// target is the item itself or is unknown, or the item already sits
    /// at the requested spot.
    pub fn move_item(&mut self, id: &T::Id, target: MoveTarget<T::Id>) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };

        // insertion index in the sequence *with* the item still present
        let to = match &target {
            MoveTarget::Before(before) if before == id => return false,
            MoveTarget::Before(before) => match self.position(before) {
                Some(pos) => pos,
                None => return false,
            },
            MoveTarget::End => self.items.len(),
        };

        // landing right in front of itself or its successor is a no-op
        if to == from || to == from + 1 {
            return false;
        }

        let item = self.items.remove(from);
        let to = if to > from { to - 1 } else { to };
        self.items.insert(to, item);
        self.dirty = true;
        self.revision += 1;
        true
    }

    /// Whether the sequence diverged from the last persisted state
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Counter identifying the current sequence state
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Mutable access for field-level edits; never changes position
    pub fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }

    /// Append a freshly created item at the end
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Swap in a new version of an item at its current position
    pub fn replace(&mut self, item: T) -> bool {
        match self.get_mut(&item.id().clone()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Remove an item; remaining orders are left as they are
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let pos = self.position(id)?;
        Some(self.items.remove(pos))
    }

    /// Write confirmed `order` values onto the items they belong to
    pub fn stamp<'a, I>(&mut self, assignment: I)
    where
        I: IntoIterator<Item = (&'a T::Id, i64)>,
        T::Id: 'a,
    {
        for (id, order) in assignment {
            if let Some(item) = self.get_mut(id) {
                item.set_order(Some(order));
            }
        }
    }

    /// Clear the dirty flag after a successful save
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
