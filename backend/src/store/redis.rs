use async_trait::async_trait;
use redis::aio::Connection;
use redis::{AsyncCommands, Client};
use shared::{Task, TaskFilter};
use tracing::{debug, info};
use uuid::Uuid;

use super::TaskStore;
use crate::config::Config;
use crate::error::Result;

/// Tasks kept as JSON strings under `<database>:<collection>:<id>` keys.
///
/// Redis has no query language for these values, so filters run client-side
/// over the whole namespace, ordered by creation time.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    namespace: String,
}

impl RedisStore {
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Client::open(config.database_url.as_str())?;
        let store = Self {
            client,
            namespace: format!("{}:{}", config.database, config.collection),
        };

        let mut conn = store.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(namespace = %store.namespace, "connected to redis");

        Ok(store)
    }

    async fn connection(&self) -> Result<Connection> {
        Ok(self.client.get_async_connection().await?)
    }

    fn key(&self, id: &Uuid) -> String {
        format!("{}:{}", self.namespace, id)
    }

    async fn load(&self, conn: &mut Connection) -> Result<Vec<Task>> {
        let keys: Vec<String> = conn.keys(format!("{}:*", self.namespace)).await?;
        let mut tasks = Vec::with_capacity(keys.len());

        for key in keys {
            let task_json: Option<String> = conn.get(&key).await?;
            // Deleted between KEYS and GET.
            let Some(task_json) = task_json else {
                continue;
            };
            tasks.push(serde_json::from_str::<Task>(&task_json)?);
        }

        Ok(in_store_order(tasks))
    }
}

/// Creation time, ties broken by id, so "first match" is stable across calls.
fn in_store_order(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    tasks
}

fn first_match(tasks: Vec<Task>, filter: &TaskFilter) -> Option<Task> {
    tasks.into_iter().find(|task| filter.matches(task))
}

/// The record written back on completion. `updated_at` is left as it was.
fn completed(task: &Task) -> Task {
    Task {
        completed: true,
        ..task.clone()
    }
}

#[async_trait]
impl TaskStore for RedisStore {
    async fn insert(&self, task: &Task) -> Result<()> {
        let task_json = serde_json::to_string(task)?;
        let mut conn = self.connection().await?;

        let _: () = conn.set(self.key(&task.id), task_json).await?;
        debug!(id = %task.id, "stored task");
        Ok(())
    }

    async fn find(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut conn = self.connection().await?;
        let tasks: Vec<Task> = self
            .load(&mut conn)
            .await?
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect();

        debug!(?filter, count = tasks.len(), "queried tasks");
        Ok(tasks)
    }

    async fn find_one_and_complete(&self, filter: &TaskFilter) -> Result<Option<Task>> {
        let mut conn = self.connection().await?;
        let Some(before) = first_match(self.load(&mut conn).await?, filter) else {
            return Ok(None);
        };

        let updated = completed(&before);
        let task_json = serde_json::to_string(&updated)?;
        let _: () = conn.set(self.key(&updated.id), task_json).await?;

        Ok(Some(before))
    }

    async fn delete_one(&self, filter: &TaskFilter) -> Result<u64> {
        let mut conn = self.connection().await?;
        match first_match(self.load(&mut conn).await?, filter) {
            Some(task) => {
                let deleted: u64 = conn.del(self.key(&task.id)).await?;
                Ok(deleted)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn task_at(id: u128, millis: i64, text: &str) -> Task {
        let at: DateTime<Utc> = DateTime::from_timestamp_millis(millis).unwrap();
        Task {
            id: Uuid::from_u128(id),
            created_at: at,
            updated_at: at,
            text: text.to_string(),
            completed: false,
        }
    }

    #[test]
    fn store_order_is_creation_time_then_id() {
        let tasks = vec![
            task_at(3, 2_000, "late"),
            task_at(2, 1_000, "tie b"),
            task_at(1, 1_000, "tie a"),
        ];

        let texts: Vec<String> = in_store_order(tasks).into_iter().map(|t| t.text).collect();

        assert_eq!(texts, ["tie a", "tie b", "late"]);
    }

    #[test]
    fn first_match_follows_store_order() {
        let tasks = in_store_order(vec![
            task_at(9, 5_000, "dup"),
            task_at(1, 5_000, "dup"),
            task_at(5, 1_000, "other"),
        ]);

        let found = first_match(tasks.clone(), &TaskFilter::text("dup")).unwrap();
        assert_eq!(found.id, Uuid::from_u128(1));

        assert!(first_match(tasks, &TaskFilter::text("missing")).is_none());
    }

    #[test]
    fn completion_write_back_keeps_everything_but_the_flag() {
        let before = task_at(1, 1_000, "buy milk");

        let after = completed(&before);

        assert!(after.completed);
        assert_eq!(after.id, before.id);
        assert_eq!(after.text, before.text);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[test]
    fn keys_are_namespaced_by_database_and_collection() {
        let config = Config {
            database_url: "redis://127.0.0.1:6379".to_string(),
            database: "tasker".to_string(),
            collection: "tasks".to_string(),
            ..Config::default()
        };
        let store = RedisStore {
            client: Client::open(config.database_url.as_str()).unwrap(),
            namespace: format!("{}:{}", config.database, config.collection),
        };
        let id = Uuid::nil();

        assert_eq!(
            store.key(&id),
            "tasker:tasks:00000000-0000-0000-0000-000000000000"
        );
    }
}
