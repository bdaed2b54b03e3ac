//! Persistence gateway for the two record collections (blogs, careers).
//!
//! Records are dynamic documents: a map of user fields wrapped with
//! server-assigned identity and timestamps. The [`DocumentStore`] trait is the
//! seam between route handlers and the backing store; the bundled
//! [`MemoryStore`] keeps everything in-process, and a networked document
//! database can be slotted in behind the same trait.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Collection names are fixed; there is no dynamic schema layer.
pub const BLOGS: &str = "blogs";
pub const CAREERS: &str = "careers";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no {collection} record with id {id}")]
    NotFound { collection: String, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: Uuid) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// A stored record: server-assigned identity and timestamps wrapping the
/// validated user fields.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

impl Document {
    /// Wire form: system fields flattened into the object alongside the
    /// user fields.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("id".to_string(), Value::String(self.id.to_string()));
        for (k, v) in &self.fields {
            obj.insert(k.clone(), v.clone());
        }
        obj.insert(
            "createdAt".to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        obj.insert(
            "updatedAt".to_string(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        Value::Object(obj)
    }
}

/// CRUD operations against one record collection. All calls are independent
/// per-request operations; there are no cross-record transactions and no
/// optimistic concurrency control. Concurrent writers to the same id race and
/// the last write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Assign identity and timestamps, store the record, return it.
    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError>;

    /// All records, ordered by creation time descending (newest first).
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Merge the given fields into an existing record and refresh its
    /// `updated_at`. Fails with [`StoreError::NotFound`] if the id is absent.
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        partial: Map<String, Value>,
    ) -> Result<Document, StoreError>;

    /// Remove a record. Fails with [`StoreError::NotFound`] if absent.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError>;
}
