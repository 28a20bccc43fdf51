use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryDescription, CategoryId, CategoryName, Slug};

/// Curated subject area a post can be filed under.
///
/// Categories are seeded with the schema and read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: Slug,
    pub description: Option<CategoryDescription>,
    pub created_at: NaiveDateTime,
}
