//! Task storage and the query layer for the `tasker` CLI.

pub mod config;
pub mod error;
pub mod repository;
pub mod store;

pub use config::{Backend, Config, DuplicatePolicy};
pub use error::{Error, Result};
pub use repository::{Listing, TaskRepository};
pub use store::{connect, MemoryStore, MongoStore, RedisStore, TaskStore};
