//! Document store interface: one named collection per resource, single-document operations only.

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::{ensure_database_exists, PgDocumentStore};

use crate::error::StoreError;
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};

/// Document body as stored: a JSON object without the identifier.
pub type Document = Map<String, Value>;

/// Field under which the store-assigned identifier is exposed to clients.
pub const ID_FIELD: &str = "_id";

#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: Document,
}

impl StoredDocument {
    /// Body with the identifier merged in under `_id`.
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        body.insert(ID_FIELD.to_string(), Value::String(self.id));
        Value::Object(body)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create the collection if missing. Must not touch existing documents.
    async fn ensure_collection(&self, collection: &str) -> Result<(), StoreError>;

    /// Insert a new document and return its assigned id.
    async fn insert(&self, collection: &str, body: &Document) -> Result<String, StoreError>;

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Documents whose top-level `field` is the string `value`, in insertion order.
    async fn find_by_field(&self, collection: &str, field: &str, value: &str)
        -> Result<Vec<StoredDocument>, StoreError>;

    /// Replace the whole body of one document. Returns the number of matched documents (0 or 1).
    async fn replace(&self, collection: &str, id: &str, body: &Document) -> Result<u64, StoreError>;

    /// Returns the number of removed documents (0 or 1).
    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError>;
}

/// Collection names double as URL segments and table names.
pub fn is_valid_collection_name(name: &str) -> bool {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
        .is_match(name)
}

/// Handle to one named collection, bound to a resource for the process lifetime.
#[derive(Clone)]
pub struct Collection {
    name: String,
    store: Arc<dyn DocumentStore>,
}

impl Collection {
    /// Ensure the backing collection exists and return a handle to it.
    pub async fn open(store: Arc<dyn DocumentStore>, name: &str) -> Result<Self, StoreError> {
        if !is_valid_collection_name(name) {
            return Err(StoreError::InvalidCollection(name.to_string()));
        }
        store.ensure_collection(name).await?;
        Ok(Self {
            name: name.to_string(),
            store,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn insert(&self, body: &Document) -> Result<String, StoreError> {
        self.store.insert(&self.name, body).await
    }

    pub async fn find_all(&self) -> Result<Vec<StoredDocument>, StoreError> {
        self.store.find_all(&self.name).await
    }

    pub async fn find_one(&self, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        self.store.find_one(&self.name, id).await
    }

    pub async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.store.find_by_field(&self.name, field, value).await
    }

    pub async fn replace(&self, id: &str, body: &Document) -> Result<u64, StoreError> {
        self.store.replace(&self.name, id, body).await
    }

    pub async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        self.store.delete(&self.name, id).await
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("name", &self.name).finish()
    }
}
