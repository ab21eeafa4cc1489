//! Repository trait for abstracting item storage.
//!
//! This trait defines the interface for all storage operations, allowing
//! different implementations (PostgreSQL via Diesel, in-memory, etc.) to be
//! swapped via dependency injection.

use async_trait::async_trait;

use crate::models::{Item, ItemChanges, ItemId, NewItem};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository trait for item CRUD operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust and allow
/// sharing across request handlers.
///
/// # Sessions
/// Each method acquires its own storage session, runs inside a single
/// transactional unit and releases the session before returning, on every
/// path. A fault aborts the unit and is returned as [`RepositoryError`];
/// implementations do not retry.
///
/// # Missing items
/// An id with no stored row is an expected outcome, reported as `None` or
/// `false`, never as an error.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if storage is healthy
    /// - `Ok(false)` if storage is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Item Operations ====================

    /// Store a new item. Storage assigns a fresh id that is never reused.
    async fn create_item(&self, item: &NewItem) -> RepositoryResult<Item>;

    /// Retrieve a single item by id.
    ///
    /// # Returns
    /// * `Ok(Some(Item))` - The stored item
    /// * `Ok(None)` - No item with this id
    async fn get_item(&self, id: ItemId) -> RepositoryResult<Option<Item>>;

    /// List items in ascending id order, skipping `skip` rows and returning
    /// at most `limit`. No ceiling is applied to `limit` here.
    async fn list_items(&self, skip: usize, limit: usize) -> RepositoryResult<Vec<Item>>;

    /// Apply a partial update.
    ///
    /// Only the fields present in `changes` are written. Empty changes return
    /// the unchanged item.
    ///
    /// # Returns
    /// * `Ok(Some(Item))` - The refreshed item
    /// * `Ok(None)` - No item with this id; nothing was written
    async fn update_item(&self, id: ItemId, changes: &ItemChanges)
        -> RepositoryResult<Option<Item>>;

    /// Delete an item.
    ///
    /// # Returns
    /// * `Ok(true)` - The item existed and was removed
    /// * `Ok(false)` - No item with this id; nothing was removed
    async fn delete_item(&self, id: ItemId) -> RepositoryResult<bool>;
}
