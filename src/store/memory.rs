//! In-process [`DocumentStore`] backed by a [`DashMap`] of collections.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Document, DocumentStore, StoreError};

/// In-memory document store. Each collection is a `Vec` kept in insertion
/// order, so `list()` is a reverse scan. Adequate for the handful of records
/// this backend manages; not a durability layer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection. Used by tests to assert that
    /// rejected requests performed no writes.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            fields,
        };
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let docs = self
            .collections
            .get(collection)
            .map(|c| c.iter().rev().cloned().collect())
            .unwrap_or_default();
        Ok(docs)
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        partial: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let mut entry = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let doc = entry
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        for (k, v) in partial {
            doc.fields.insert(k, v);
        }
        // updated_at never moves backwards, even under clock skew.
        doc.updated_at = Utc::now().max(doc.updated_at);
        Ok(doc.clone())
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        let mut entry = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let before = entry.len();
        entry.retain(|d| d.id != id);
        if entry.len() == before {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    #[tokio::test]
    async fn insert_assigns_unique_identity_and_timestamps() {
        let store = MemoryStore::new();
        let a = store.insert("blogs", fields(json!({"title": "A"}))).await.unwrap();
        let b = store.insert("blogs", fields(json!({"title": "B"}))).await.unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.created_at <= a.updated_at);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        store.insert("blogs", fields(json!({"title": "A"}))).await.unwrap();
        store.insert("blogs", fields(json!({"title": "B"}))).await.unwrap();
        let docs = store.list("blogs").await.unwrap();
        assert_eq!(docs[0].fields["title"], "B");
        assert_eq!(docs[1].fields["title"], "A");
    }

    #[tokio::test]
    async fn update_merges_and_refreshes_updated_at() {
        let store = MemoryStore::new();
        let doc = store
            .insert("blogs", fields(json!({"title": "A", "author": "Ada"})))
            .await
            .unwrap();
        let updated = store
            .update("blogs", doc.id, fields(json!({"title": "X"})))
            .await
            .unwrap();
        assert_eq!(updated.fields["title"], "X");
        assert_eq!(updated.fields["author"], "Ada");
        assert_eq!(updated.created_at, doc.created_at);
        assert!(updated.updated_at >= doc.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        store.insert("blogs", fields(json!({"title": "A"}))).await.unwrap();
        let err = store
            .update("blogs", Uuid::new_v4(), fields(json!({"title": "X"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let store = MemoryStore::new();
        let doc = store.insert("careers", fields(json!({"title": "A"}))).await.unwrap();
        store.delete("careers", doc.id).await.unwrap();
        let err = store.delete("careers", doc.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.count("careers"), 0);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        store.insert("blogs", fields(json!({"title": "A"}))).await.unwrap();
        assert!(store.list("careers").await.unwrap().is_empty());
    }

    #[test]
    fn wire_form_flattens_system_fields() {
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            fields: fields(json!({"title": "A"})),
        };
        let wire = doc.to_json();
        assert_eq!(wire["title"], "A");
        assert_eq!(wire["id"], doc.id.to_string());
        assert!(wire.get("createdAt").is_some());
        assert!(wire.get("updatedAt").is_some());
    }
}
