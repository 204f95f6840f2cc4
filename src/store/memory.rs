//! Process-local document store. Same semantics as the PostgreSQL backend; used in development and tests.

use super::{Document, DocumentStore, StoredDocument};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryDocumentStore {
    /// Collection name -> documents in insertion order.
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn ensure_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default();
        Ok(())
    }

    async fn insert(&self, collection: &str, body: &Document) -> Result<String, StoreError> {
        let mut guard = self.collections.write().await;
        let docs = guard
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        let id = uuid::Uuid::new_v4().to_string();
        docs.push(StoredDocument {
            id: id.clone(),
            body: body.clone(),
        });
        Ok(id)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let guard = self.collections.read().await;
        guard
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let guard = self.collections.read().await;
        let docs = guard
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(docs.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let guard = self.collections.read().await;
        let docs = guard
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(docs
            .iter()
            .filter(|d| matches!(d.body.get(field), Some(serde_json::Value::String(s)) if s == value))
            .cloned()
            .collect())
    }

    async fn replace(&self, collection: &str, id: &str, body: &Document) -> Result<u64, StoreError> {
        let mut guard = self.collections.write().await;
        let docs = guard
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => {
                doc.body = body.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError> {
        let mut guard = self.collections.write().await;
        let docs = guard
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok((before - docs.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn ensure_collection_keeps_existing_documents() {
        let store = MemoryDocumentStore::new();
        store.ensure_collection("note").await.unwrap();
        store.insert("note", &doc(json!({"text": "hi"}))).await.unwrap();
        store.ensure_collection("note").await.unwrap();
        assert_eq!(store.find_all("note").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replace_and_delete_report_counts() {
        let store = MemoryDocumentStore::new();
        store.ensure_collection("note").await.unwrap();
        let id = store.insert("note", &doc(json!({"text": "hi"}))).await.unwrap();

        assert_eq!(store.replace("note", &id, &doc(json!({"text": "bye"}))).await.unwrap(), 1);
        assert_eq!(store.replace("note", "missing", &doc(json!({}))).await.unwrap(), 0);
        let found = store.find_one("note", &id).await.unwrap().unwrap();
        assert_eq!(found.body, doc(json!({"text": "bye"})));

        assert_eq!(store.delete("note", &id).await.unwrap(), 1);
        assert_eq!(store.delete("note", &id).await.unwrap(), 0);
        assert!(store.find_one("note", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_field_matches_string_values_only() {
        let store = MemoryDocumentStore::new();
        store.ensure_collection("user").await.unwrap();
        store.insert("user", &doc(json!({"username": "alice"}))).await.unwrap();
        store.insert("user", &doc(json!({"username": "bob"}))).await.unwrap();
        store.insert("user", &doc(json!({"username": 7}))).await.unwrap();

        let found = store.find_by_field("user", "username", "bob").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].body, doc(json!({"username": "bob"})));
        assert!(store.find_by_field("user", "username", "7").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_collection_is_an_error() {
        let store = MemoryDocumentStore::new();
        let err = store.find_all("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownCollection(_)));
    }
}
