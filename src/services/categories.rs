//! Category lookups. The category set is seeded with the schema and never
//! changes at runtime, so the cached listing only falls out via TTL or a
//! whole-cache clear.

use crate::cache::{CachedValue, QueryCache};
use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::repository::CategoryReader;

use super::{ServiceError, ServiceResult};

const CACHE_KEY: &str = "categories";

/// Lists every category, ordered by name.
pub fn list_categories<R: CategoryReader>(
    repo: &R,
    cache: &QueryCache,
) -> ServiceResult<Vec<Category>> {
    if let Some(CachedValue::Categories(categories)) = cache.get(CACHE_KEY) {
        return Ok(categories);
    }

    match repo.list_categories() {
        Ok(categories) => {
            cache.set(CACHE_KEY, CachedValue::Categories(categories.clone()));
            Ok(categories)
        }
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetches one category for its landing page.
pub fn get_category<R: CategoryReader>(category_id: i32, repo: &R) -> ServiceResult<Category> {
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::DateTime;

    use crate::domain::types::{CategoryName, Slug};
    use crate::models::config::CacheConfig;
    use crate::repository::test::TestRepository;

    fn sample_category(id: i32, name: &str, slug: &str) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            slug: Slug::new(slug).unwrap(),
            description: None,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn list_categories_memoizes_the_seeded_set() {
        let repo = TestRepository::new().with_categories(vec![
            sample_category(1, "Science", "science"),
            sample_category(2, "Study Tips", "study-tips"),
        ]);
        let cache = QueryCache::new(CacheConfig::default());

        let first = list_categories(&repo, &cache).unwrap();
        let second = list_categories(&repo, &cache).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(repo.category_reads(), 1);
    }

    #[test]
    fn get_category_reports_not_found() {
        let repo =
            TestRepository::new().with_categories(vec![sample_category(1, "Science", "science")]);

        assert_eq!(get_category(1, &repo).unwrap().name, "Science");
        assert!(matches!(
            get_category(99, &repo),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(get_category(0, &repo), Err(ServiceError::NotFound)));
    }
}
