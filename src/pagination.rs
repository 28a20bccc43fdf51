//! Page selection for list queries.

use serde::{Deserialize, Serialize};

/// One-based page selection. Serialized into cache keys, so two equal
/// values always address the same cached page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }
}
