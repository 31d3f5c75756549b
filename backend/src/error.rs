use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot add an empty task")]
    EmptyTask,

    #[error("a task with text {0:?} already exists")]
    DuplicateText(String),

    #[error("no task matches {0:?}")]
    NotFound(String),

    #[error("no tasks were deleted")]
    NothingDeleted,

    #[error("unsupported database url {0:?}: expected mongodb:// or redis://")]
    UnsupportedUrl(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("failed to decode task: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("stored timestamp {0} is out of range")]
    Timestamp(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
