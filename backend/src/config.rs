//! Environment-driven settings for the task store.

use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_DATABASE_URL: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "tasker";
pub const DEFAULT_COLLECTION: &str = "tasks";

/// What `add` does when a task with the same text already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Store it anyway; `done` and `rm` act on the first match in store order.
    #[default]
    Allow,
    /// Refuse to add it.
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(DuplicatePolicy::Allow),
            "reject" => Ok(DuplicatePolicy::Reject),
            _ => Err(Error::InvalidConfig {
                key: "TASKER_DUPLICATES",
                value: s.to_string(),
            }),
        }
    }
}

/// Which store implementation a database URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mongo,
    Redis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub database: String,
    pub collection: String,
    pub duplicates: DuplicatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset or blank keys fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        let duplicates = match get("TASKER_DUPLICATES") {
            Some(value) => value.parse()?,
            None => defaults.duplicates,
        };

        Ok(Self {
            database_url: get("TASKER_DATABASE_URL").unwrap_or(defaults.database_url),
            database: get("TASKER_DATABASE").unwrap_or(defaults.database),
            collection: get("TASKER_COLLECTION").unwrap_or(defaults.collection),
            duplicates,
        })
    }

    pub fn backend(&self) -> Result<Backend> {
        let scheme = self
            .database_url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase());

        match scheme.as_deref() {
            Some("mongodb") | Some("mongodb+srv") => Ok(Backend::Mongo),
            Some("redis") | Some("rediss") => Ok(Backend::Redis),
            _ => Err(Error::UnsupportedUrl(self.database_url.clone())),
        }
    }
}
