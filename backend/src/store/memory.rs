use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{Task, TaskFilter};

use super::TaskStore;
use crate::error::Result;

/// Insertion-ordered store that lives for as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, task: &Task) -> Result<()> {
        self.tasks.lock().push(task.clone());
        Ok(())
    }

    async fn find(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .lock()
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn find_one_and_complete(&self, filter: &TaskFilter) -> Result<Option<Task>> {
        let mut tasks = self.tasks.lock();
        let before = tasks.iter_mut().find(|task| filter.matches(task)).map(|task| {
            let before = task.clone();
            task.completed = true;
            before
        });
        Ok(before)
    }

    async fn delete_one(&self, filter: &TaskFilter) -> Result<u64> {
        let mut tasks = self.tasks.lock();
        let index = tasks.iter().position(|task| filter.matches(task));
        match index {
            Some(index) => {
                tasks.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
