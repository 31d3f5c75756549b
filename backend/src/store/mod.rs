//! Storage backends for tasks.
//!
//! Every backend speaks the same four operations in terms of [`TaskFilter`].
//! "First match" means first in the backend's natural order: insertion order
//! for MongoDB and the in-memory store, creation time for Redis.

mod memory;
mod mongo;
mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use shared::{Task, TaskFilter};

use crate::config::{Backend, Config};
use crate::error::Result;

pub use self::memory::MemoryStore;
pub use self::mongo::MongoStore;
pub use self::redis::RedisStore;

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: &Task) -> Result<()>;

    /// Returns every task matching `filter`. Stops at the first decode or
    /// transport error.
    async fn find(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Marks the first match completed and returns it as it was before the
    /// update, or `None` when nothing matched.
    async fn find_one_and_complete(&self, filter: &TaskFilter) -> Result<Option<Task>>;

    /// Removes the first match and returns how many tasks were removed.
    async fn delete_one(&self, filter: &TaskFilter) -> Result<u64>;

    /// Releases the underlying connection.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Opens the store named by `config.database_url`.
pub async fn connect(config: &Config) -> Result<Arc<dyn TaskStore>> {
    let store: Arc<dyn TaskStore> = match config.backend()? {
        Backend::Mongo => Arc::new(MongoStore::connect(config).await?),
        Backend::Redis => Arc::new(RedisStore::connect(config).await?),
    };
    Ok(store)
}
