//! Paginated list result

use serde::{Deserialize, Serialize};

use crate::request::ViewParams;

/// One page of a list screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching rows across all pages, when the store reported it
    pub total: Option<u64>,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: Option<u64>, params: &ViewParams) -> Self {
        Self {
            items,
            total,
            page: params.page.max(1),
            per_page: params.limit(),
        }
    }

    /// Number of pages, or `None` when the total is unknown
    pub fn total_pages(&self) -> Option<u32> {
        self.total
            .map(|total| total.div_ceil(self.per_page.max(1) as u64) as u32)
    }

    pub fn has_next(&self) -> bool {
        match self.total_pages() {
            Some(pages) => self.page < pages,
            None => self.items.len() as u32 >= self.per_page,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
