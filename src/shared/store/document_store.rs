use std::sync::Arc;

use futures::TryStreamExt;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::Row;
use sqlx::{postgres::PgRow, Pool, Postgres};
use thiserror::Error;

use crate::custom_nanoid;
use crate::shared::database::Database;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  DatabaseError(#[from] sqlx::Error),
}

/// A stored document: the store-assigned id plus the raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
  pub id: String,
  pub data: Value,
}

/// Opaque collection/document store. Collections are addressed by path,
/// sub-collections nest under a parent document (`trips/{id}/guests`).
pub trait DocumentStore {
  /// Inserts `data` into `collection` and returns the new document id.
  async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError>;
  async fn get(
    &self,
    collection: &str,
    id: &str,
  ) -> Result<Option<Document>, StoreError>;
  /// All documents of `collection`, oldest first.
  async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
}

pub struct PgDocumentStore {
  pool: Arc<Pool<Postgres>>,
}

impl PgDocumentStore {
  pub fn new(database: Arc<Database>) -> Self {
    Self {
      pool: database.pool.clone(),
    }
  }
}

impl DocumentStore for PgDocumentStore {
  async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
    let id = custom_nanoid();
    let query = r#"
      INSERT INTO documents (collection, id, data)
      VALUES ($1, $2, $3)
    "#;
    sqlx::query(query)
      .bind(collection)
      .bind(&id)
      .bind(Json(data))
      .execute(&*self.pool)
      .await?;
    Ok(id)
  }

  async fn get(
    &self,
    collection: &str,
    id: &str,
  ) -> Result<Option<Document>, StoreError> {
    sqlx::query("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
      .bind(collection)
      .bind(id)
      .map(|row: PgRow| Document::from(row))
      .fetch_optional(&*self.pool)
      .await
      .map_err(StoreError::from)
  }

  async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
    let query = r#"
      SELECT id, data FROM documents
      WHERE collection = $1
      ORDER BY created_at, id
    "#;
    let documents: Vec<Document> = sqlx::query(query)
      .bind(collection)
      .fetch(&*self.pool)
      .map_ok(Document::from)
      .try_collect()
      .await?;
    Ok(documents)
  }
}

impl From<PgRow> for Document {
  fn from(row: PgRow) -> Self {
    Self {
      id: row.get("id"),
      data: row.get::<Json<Value>, _>("data").0,
    }
  }
}

#[cfg(test)]
pub mod tests {
  use std::collections::HashMap;
  use std::sync::RwLock;

  use serde_json::{json, Value};

  use super::{Document, DocumentStore, StoreError};
  use crate::custom_nanoid;

  /// Keeps every collection in memory. `fail_after` makes every `add` past
  /// that many successful writes fail, which simulates the store going away
  /// in the middle of a request.
  pub struct InMemoryDocumentStore {
    pub collections: RwLock<HashMap<String, Vec<Document>>>,
    pub fail_after: Option<usize>,
    writes: RwLock<usize>,
  }

  impl InMemoryDocumentStore {
    pub fn new() -> Self {
      Self {
        collections: RwLock::new(HashMap::new()),
        fail_after: None,
        writes: RwLock::new(0),
      }
    }

    pub fn failing_after(writes: usize) -> Self {
      Self {
        fail_after: Some(writes),
        ..Self::new()
      }
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
      let collections = self.collections.read().unwrap(); // Acquire read lock
      collections.get(collection).cloned().unwrap_or_default()
    }
  }

  impl DocumentStore for InMemoryDocumentStore {
    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
      let mut writes = self.writes.write().unwrap();
      if self.fail_after.is_some_and(|limit| *writes >= limit) {
        return Err(StoreError::DatabaseError(sqlx::Error::PoolTimedOut));
      }
      *writes += 1;

      let id = custom_nanoid();
      let mut collections = self.collections.write().unwrap(); // Acquire write lock
      collections
        .entry(collection.to_string())
        .or_default()
        .push(Document {
          id: id.clone(),
          data,
        });
      Ok(id)
    }

    async fn get(
      &self,
      collection: &str,
      id: &str,
    ) -> Result<Option<Document>, StoreError> {
      Ok(
        self
          .documents(collection)
          .into_iter()
          .find(|document| document.id == id),
      )
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
      Ok(self.documents(collection))
    }
  }

  #[actix_rt::test]
  async fn test_add_assigns_distinct_ids() {
    let store = InMemoryDocumentStore::new();

    let first = store.add("trips", json!({ "destination": "Paris" })).await.unwrap();
    let second = store.add("trips", json!({ "destination": "Lisboa" })).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(first.len(), 20);
    let document = store.get("trips", &second).await.unwrap().unwrap();
    assert_eq!(document.data["destination"], "Lisboa");
  }

  #[actix_rt::test]
  async fn test_get_missing_document_is_none() {
    let store = InMemoryDocumentStore::new();
    store.add("trips", json!({})).await.unwrap();

    assert_eq!(store.get("trips", "missing").await.unwrap(), None);
    assert_eq!(store.get("other", "missing").await.unwrap(), None);
  }

  #[actix_rt::test]
  async fn test_list_keeps_sub_collections_apart() {
    let store = InMemoryDocumentStore::new();
    store.add("trips/a/guests", json!({ "name": "Ana" })).await.unwrap();
    store.add("trips/a/guests", json!({ "name": "Bia" })).await.unwrap();
    store.add("trips/b/guests", json!({ "name": "Caio" })).await.unwrap();

    let names: Vec<Value> = store
      .list("trips/a/guests")
      .await
      .unwrap()
      .into_iter()
      .map(|document| document.data["name"].clone())
      .collect();
    assert_eq!(names, vec![json!("Ana"), json!("Bia")]);
    assert!(store.list("trips/c/guests").await.unwrap().is_empty());
  }

  #[actix_rt::test]
  async fn test_failing_after_rejects_later_writes() {
    let store = InMemoryDocumentStore::failing_after(1);

    assert!(store.add("trips", json!({})).await.is_ok());
    assert!(matches!(
      store.add("trips", json!({})).await,
      Err(StoreError::DatabaseError(_))
    ));
    assert_eq!(store.documents("trips").len(), 1);
  }
}
