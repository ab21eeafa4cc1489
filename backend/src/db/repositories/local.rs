//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Items live in a
//! `BTreeMap` keyed by id behind a single `RwLock`, so iteration order is
//! ascending id and every operation is atomic with respect to the others.

use async_trait::async_trait;
use log::debug;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::{ErrorContext, ItemRepository, RepositoryError, RepositoryResult};
use crate::models::{Item, ItemChanges, ItemId, NewItem};

/// In-memory local repository.
///
/// Cloning shares the underlying store.
///
/// # Example
/// ```ignore
/// use items_rust::db::repositories::LocalRepository;
/// use items_rust::db::repository::ItemRepository;
/// use items_rust::models::NewItem;
///
/// let repo = LocalRepository::new();
/// let item = repo.create_item(&NewItem::new("A")).await?;
/// assert_eq!(item.id.value(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    items: BTreeMap<ItemId, Item>,
    // Monotonic; ids of deleted items are never handed out again.
    next_item_id: i64,
    // Connection health, toggled by tests to simulate storage faults
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_item_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy, every item operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all items. The id counter keeps its position.
    pub fn clear(&self) {
        self.data.write().items.clear();
    }

    /// Get the number of items stored.
    pub fn item_count(&self) -> usize {
        self.data.read().items.len()
    }

    /// Check if an item exists.
    pub fn has_item(&self, id: ItemId) -> bool {
        self.data.read().items.contains_key(&id)
    }

    /// Acquire a read session, failing if storage is marked unhealthy.
    fn read_session(&self, operation: &str) -> RepositoryResult<RwLockReadGuard<'_, LocalData>> {
        let data = self.data.read();
        if !data.is_healthy {
            return Err(Self::unavailable(operation));
        }
        Ok(data)
    }

    /// Acquire a write session, failing if storage is marked unhealthy.
    fn write_session(
        &self,
        operation: &str,
    ) -> RepositoryResult<RwLockWriteGuard<'_, LocalData>> {
        let data = self.data.write();
        if !data.is_healthy {
            return Err(Self::unavailable(operation));
        }
        Ok(data)
    }

    fn unavailable(operation: &str) -> RepositoryError {
        RepositoryError::connection("Database is not healthy")
            .with_context(ErrorContext::new(operation).with_entity("item"))
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_item(&self, item: &NewItem) -> RepositoryResult<Item> {
        let mut data = self.write_session("create_item")?;
        let id = ItemId::new(data.next_item_id);
        data.next_item_id += 1;

        let stored = Item {
            id,
            title: item.title.clone(),
            description: item.description.clone(),
        };
        data.items.insert(id, stored.clone());
        debug!("Created item id={}", id);

        Ok(stored)
    }

    async fn get_item(&self, id: ItemId) -> RepositoryResult<Option<Item>> {
        let data = self.read_session("get_item")?;
        Ok(data.items.get(&id).cloned())
    }

    async fn list_items(&self, skip: usize, limit: usize) -> RepositoryResult<Vec<Item>> {
        let data = self.read_session("list_items")?;
        Ok(data.items.values().skip(skip).take(limit).cloned().collect())
    }

    async fn update_item(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> RepositoryResult<Option<Item>> {
        let mut data = self.write_session("update_item")?;
        let Some(item) = data.items.get_mut(&id) else {
            return Ok(None);
        };

        changes.apply_to(item);
        debug!("Updated item id={}", id);
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, id: ItemId) -> RepositoryResult<bool> {
        let mut data = self.write_session("delete_item")?;
        let removed = data.items.remove(&id).is_some();
        if removed {
            debug!("Deleted item id={}", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let repo = LocalRepository::new();
        let a = repo.create_item(&NewItem::new("a")).await.unwrap();
        let b = repo.create_item(&NewItem::new("b")).await.unwrap();
        assert_eq!(a.id, ItemId::new(1));
        assert_eq!(b.id, ItemId::new(2));
    }

    #[tokio::test]
    async fn test_clear_keeps_id_counter() {
        let repo = LocalRepository::new();
        repo.create_item(&NewItem::new("a")).await.unwrap();
        repo.clear();
        assert_eq!(repo.item_count(), 0);

        let next = repo.create_item(&NewItem::new("b")).await.unwrap();
        assert_eq!(next.id, ItemId::new(2));
    }

    #[tokio::test]
    async fn test_unhealthy_store_fails_with_connection_error() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        assert!(!repo.health_check().await.unwrap());
        let err = repo.create_item(&NewItem::new("a")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Connection { .. }));
        assert_eq!(err.context().operation.as_deref(), Some("create_item"));
        assert!(err.is_retryable());
    }
}
