use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use shared::{Task, TaskFilter};
use tracing::{debug, info};
use uuid::Uuid;

use super::TaskStore;
use crate::config::Config;
use crate::error::{Error, Result};

/// Tasks kept in a MongoDB collection.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<TaskDocument>,
}

impl MongoStore {
    /// Connects and pings the server so a bad URL fails here rather than on
    /// the first query.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Client::with_uri_str(&config.database_url).await?;
        client.database("admin").run_command(doc! { "ping": 1 }).await?;

        info!(
            database = %config.database,
            collection = %config.collection,
            "connected to mongodb"
        );

        let collection = client
            .database(&config.database)
            .collection::<TaskDocument>(&config.collection);
        Ok(Self { client, collection })
    }
}

#[async_trait]
impl TaskStore for MongoStore {
    async fn insert(&self, task: &Task) -> Result<()> {
        self.collection.insert_one(TaskDocument::from(task)).await?;
        debug!(id = %task.id, "inserted task document");
        Ok(())
    }

    async fn find(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let cursor = self.collection.find(filter_document(filter)).await?;
        let documents: Vec<TaskDocument> = cursor.try_collect().await?;
        debug!(?filter, count = documents.len(), "queried task documents");

        documents.into_iter().map(Task::try_from).collect()
    }

    async fn find_one_and_complete(&self, filter: &TaskFilter) -> Result<Option<Task>> {
        // The driver hands back the pre-update document by default.
        let update = doc! { "$set": { "completed": true } };
        self.collection
            .find_one_and_update(filter_document(filter), update)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    async fn delete_one(&self, filter: &TaskFilter) -> Result<u64> {
        let result = self.collection.delete_one(filter_document(filter)).await?;
        Ok(result.deleted_count)
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}

pub(crate) fn filter_document(filter: &TaskFilter) -> Document {
    match filter {
        TaskFilter::All => doc! {},
        TaskFilter::Completed(completed) => doc! { "completed": *completed },
        TaskFilter::Text(text) => doc! { "text": text.as_str() },
    }
}

/// On-disk shape of a task. New documents store the uuid as a string `_id`;
/// collections written by other clients may hold ObjectIds instead, and may
/// lack any other field. Missing fields read as zero values so one sparse
/// document cannot break a listing or a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TaskDocument {
    #[serde(rename = "_id")]
    id: Bson,
    #[serde(default = "unix_epoch")]
    created_at: bson::DateTime,
    #[serde(default = "unix_epoch")]
    updated_at: bson::DateTime,
    #[serde(default)]
    text: String,
    #[serde(default)]
    completed: bool,
}

fn unix_epoch() -> bson::DateTime {
    bson::DateTime::from_millis(0)
}

impl From<&Task> for TaskDocument {
    fn from(task: &Task) -> Self {
        Self {
            id: Bson::String(task.id.to_string()),
            created_at: bson::DateTime::from_millis(task.created_at.timestamp_millis()),
            updated_at: bson::DateTime::from_millis(task.updated_at.timestamp_millis()),
            text: task.text.clone(),
            completed: task.completed,
        }
    }
}

impl TryFrom<TaskDocument> for Task {
    type Error = Error;

    fn try_from(document: TaskDocument) -> Result<Self> {
        Ok(Task {
            id: task_id(&document.id),
            created_at: to_chrono(document.created_at)?,
            updated_at: to_chrono(document.updated_at)?,
            text: document.text,
            completed: document.completed,
        })
    }
}

/// Ids that are not uuid strings get a stable v5 uuid derived from their text.
fn task_id(id: &Bson) -> Uuid {
    let raw = match id {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    };
    Uuid::parse_str(&raw).unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, raw.as_bytes()))
}

fn to_chrono(value: bson::DateTime) -> Result<DateTime<Utc>> {
    let millis = value.timestamp_millis();
    DateTime::from_timestamp_millis(millis).ok_or(Error::Timestamp(millis))
}
