//! Query layer: the task operations the CLI is built on.

use std::sync::Arc;

use shared::{Task, TaskFilter};
use tracing::{debug, info, warn};

use crate::config::DuplicatePolicy;
use crate::error::{Error, Result};
use crate::store::TaskStore;

/// Outcome of a list query. An empty match is a valid answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Tasks(Vec<Task>),
    Empty,
}

impl Listing {
    fn from_tasks(tasks: Vec<Task>) -> Self {
        if tasks.is_empty() {
            Listing::Empty
        } else {
            Listing::Tasks(tasks)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Listing::Empty)
    }

    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            Listing::Tasks(tasks) => tasks,
            Listing::Empty => Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn TaskStore>,
    duplicates: DuplicatePolicy,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            duplicates: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Validates `text`, then stores a fresh pending task for it.
    pub async fn add(&self, text: &str) -> Result<Task> {
        validate_text(text)?;
        let task = Task::new(text);
        self.create(&task).await?;
        Ok(task)
    }

    pub async fn create(&self, task: &Task) -> Result<()> {
        validate_text(&task.text)?;

        if self.duplicates == DuplicatePolicy::Reject
            && !self.store.find(&TaskFilter::text(&task.text)).await?.is_empty()
        {
            return Err(Error::DuplicateText(task.text.clone()));
        }

        self.store.insert(task).await?;
        info!(id = %task.id, "added task");
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Listing> {
        self.list(TaskFilter::All).await
    }

    pub async fn list_pending(&self) -> Result<Listing> {
        self.list(TaskFilter::pending()).await
    }

    pub async fn list_finished(&self) -> Result<Listing> {
        self.list(TaskFilter::finished()).await
    }

    /// Marks the first task whose text equals `text` as completed and returns
    /// it as it was before the update. `updated_at` is left alone.
    ///
    /// A task that is already completed matches too, so repeating the call
    /// succeeds.
    pub async fn complete(&self, text: &str) -> Result<Task> {
        match self.store.find_one_and_complete(&TaskFilter::text(text)).await? {
            Some(before) => {
                info!(id = %before.id, "completed task");
                Ok(before)
            }
            None => {
                warn!(text, "no task to complete");
                Err(Error::NotFound(text.to_string()))
            }
        }
    }

    /// Removes the first task whose text equals `text`.
    pub async fn delete(&self, text: &str) -> Result<()> {
        let deleted = self.store.delete_one(&TaskFilter::text(text)).await?;
        if deleted == 0 {
            warn!(text, "no task to delete");
            return Err(Error::NothingDeleted);
        }

        info!(deleted, "deleted task");
        Ok(())
    }

    async fn list(&self, filter: TaskFilter) -> Result<Listing> {
        let tasks = self.store.find(&filter).await?;
        debug!(?filter, count = tasks.len(), "listed tasks");
        Ok(Listing::from_tasks(tasks))
    }
}

fn validate_text(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(Error::EmptyTask);
    }
    Ok(())
}
