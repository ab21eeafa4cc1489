//! Service layer for item operations.
//!
//! Thin functions over any [`ItemRepository`]. Handlers call these rather
//! than the repository directly so that cross-cutting rules (currently the
//! page size ceiling) live in one place.

use log::{debug, warn};

use super::repository::{ItemRepository, RepositoryResult};
use crate::models::{Item, ItemChanges, ItemId, NewItem};

/// Check that the storage backend is reachable.
pub async fn health_check(repo: &dyn ItemRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

pub async fn create_item(repo: &dyn ItemRepository, item: &NewItem) -> RepositoryResult<Item> {
    repo.create_item(item).await
}

pub async fn get_item(repo: &dyn ItemRepository, id: ItemId) -> RepositoryResult<Option<Item>> {
    repo.get_item(id).await
}

/// List a page of items, clamping `limit` to `max_limit`.
pub async fn list_items(
    repo: &dyn ItemRepository,
    skip: usize,
    limit: usize,
    max_limit: usize,
) -> RepositoryResult<Vec<Item>> {
    let effective = clamp_limit(limit, max_limit);
    debug!("Listing items skip={} limit={}", skip, effective);
    repo.list_items(skip, effective).await
}

pub async fn update_item(
    repo: &dyn ItemRepository,
    id: ItemId,
    changes: &ItemChanges,
) -> RepositoryResult<Option<Item>> {
    repo.update_item(id, changes).await
}

pub async fn delete_item(repo: &dyn ItemRepository, id: ItemId) -> RepositoryResult<bool> {
    repo.delete_item(id).await
}

/// Cap a requested page size.
pub fn clamp_limit(limit: usize, max_limit: usize) -> usize {
    if limit > max_limit {
        warn!("Requested limit {} exceeds maximum {}, clamping", limit, max_limit);
        max_limit
    } else {
        limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0, 1000), 0);
        assert_eq!(clamp_limit(100, 1000), 100);
        assert_eq!(clamp_limit(1000, 1000), 1000);
        assert_eq!(clamp_limit(5000, 1000), 1000);
    }
}
