//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - One pooled session and one transaction per repository call
//! - Embedded bootstrap migration creating the `items` table
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, trace};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::db::repository::{ErrorContext, ItemRepository, RepositoryError, RepositoryResult};
use crate::models::{Item, ItemChanges, ItemId, NewItem};

mod models;
mod schema;

use models::{ItemChangeset, ItemRow, NewItemRow};
use schema::items;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the variables read and their defaults.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total sessions opened
    pub total_sessions: u64,
    /// Sessions that ended with an error
    pub failed_sessions: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_sessions: Arc<AtomicU64>,
    failed_sessions: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection(e.to_string()).with_context(
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection(e.to_string())
                    .with_context(ErrorContext::new("get_connection_for_migrations"))
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_sessions: Arc::new(AtomicU64::new(0)),
            failed_sessions: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal(format!("Migration failed: {}", e))
                .with_context(ErrorContext::new("run_migrations"))
        })?;

        Ok(())
    }

    /// Run `f` inside one pooled session and one transaction.
    ///
    /// The connection is checked out on a blocking thread and returned to the
    /// pool when this call finishes, whether `f` succeeds or fails. Any error
    /// rolls the transaction back and is returned once, without retry.
    async fn with_session<T, F>(&self, context: ErrorContext, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, diesel::result::Error> + Send + 'static,
    {
        let pool = self.pool.clone();
        let total_sessions = self.total_sessions.clone();
        let failed_sessions = self.failed_sessions.clone();
        let join_context = context.clone();

        task::spawn_blocking(move || {
            let started = Instant::now();
            total_sessions.fetch_add(1, Ordering::Relaxed);

            let result = pool
                .get()
                .map_err(RepositoryError::from)
                .and_then(|mut conn| {
                    trace!("Session acquired {}", context);
                    conn.transaction(|tx| f(tx)).map_err(RepositoryError::from)
                });

            trace!(
                "Session released {} after {}ms",
                context,
                started.elapsed().as_millis()
            );
            result.map_err(|e| {
                failed_sessions.fetch_add(1, Ordering::Relaxed);
                e.with_context(context)
            })
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(format!("Task join error: {}", e))
                .with_context(join_context.with_details("spawn_blocking"))
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_sessions: self.total_sessions.load(Ordering::Relaxed),
            failed_sessions: self.failed_sessions.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

#[async_trait]
impl ItemRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_session(ErrorContext::new("health_check"), |conn| {
            diesel::sql_query("SELECT 1").execute(conn).map(|_| true)
        })
        .await
    }

    async fn create_item(&self, item: &NewItem) -> RepositoryResult<Item> {
        let item = item.clone();
        let row = self
            .with_session(
                ErrorContext::new("create_item").with_entity("item"),
                move |conn| {
                    diesel::insert_into(items::table)
                        .values(NewItemRow::from(&item))
                        .returning(ItemRow::as_returning())
                        .get_result(conn)
                },
            )
            .await?;

        debug!("Created item id={}", row.id);
        Ok(row.into())
    }

    async fn get_item(&self, id: ItemId) -> RepositoryResult<Option<Item>> {
        let row = self
            .with_session(ErrorContext::for_item("get_item", id), move |conn| {
                items::table
                    .find(id.value())
                    .select(ItemRow::as_select())
                    .first(conn)
                    .optional()
            })
            .await?;

        Ok(row.map(Item::from))
    }

    async fn list_items(&self, skip: usize, limit: usize) -> RepositoryResult<Vec<Item>> {
        // Postgres takes signed offsets; anything past i64::MAX is an empty page anyway.
        let offset = i64::try_from(skip).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = self
            .with_session(
                ErrorContext::new("list_items")
                    .with_entity("item")
                    .with_details(format!("skip={} limit={}", skip, limit)),
                move |conn| {
                    items::table
                        .order(items::id.asc())
                        .offset(offset)
                        .limit(limit)
                        .select(ItemRow::as_select())
                        .load(conn)
                },
            )
            .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn update_item(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> RepositoryResult<Option<Item>> {
        let changes = changes.clone();
        let row = self
            .with_session(ErrorContext::for_item("update_item", id), move |conn| {
                let current = items::table
                    .find(id.value())
                    .select(ItemRow::as_select())
                    .for_update()
                    .first(conn)
                    .optional()?;

                // Diesel refuses an empty changeset; nothing to write anyway.
                match current {
                    None => Ok(None),
                    Some(row) if changes.is_empty() => Ok(Some(row)),
                    Some(_) => diesel::update(items::table.find(id.value()))
                        .set(ItemChangeset::from(&changes))
                        .returning(ItemRow::as_returning())
                        .get_result(conn)
                        .map(Some),
                }
            })
            .await?;

        if row.is_some() {
            debug!("Updated item id={}", id);
        }
        Ok(row.map(Item::from))
    }

    async fn delete_item(&self, id: ItemId) -> RepositoryResult<bool> {
        let deleted = self
            .with_session(ErrorContext::for_item("delete_item", id), move |conn| {
                diesel::delete(items::table.find(id.value())).execute(conn)
            })
            .await?;

        if deleted > 0 {
            debug!("Deleted item id={}", id);
        }
        Ok(deleted > 0)
    }
}
