use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry on the task list.
///
/// `text` is what the user sees and what `done`/`rm` match against. `id` is
/// never shown and never used for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Set once at creation. Completing a task leaves it untouched.
    pub updated_at: DateTime<Utc>,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            text: text.into(),
            completed: false,
        }
    }
}

/// Match expression used to select tasks from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    /// Every task in the collection.
    All,
    /// Tasks whose `completed` flag equals the value.
    Completed(bool),
    /// Tasks whose text is exactly equal to the value.
    Text(String),
}

impl TaskFilter {
    pub fn pending() -> Self {
        TaskFilter::Completed(false)
    }

    pub fn finished() -> Self {
        TaskFilter::Completed(true)
    }

    pub fn text(text: impl Into<String>) -> Self {
        TaskFilter::Text(text.into())
    }

    /// Evaluates the filter in-process, for stores without a query language.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed(completed) => task.completed == *completed,
            TaskFilter::Text(text) => task.text == *text,
        }
    }
}
