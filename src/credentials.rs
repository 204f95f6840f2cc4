//! Login credentials behind `POST /register` and `POST /auth`.
//!
//! Credentials live in an internal collection that no resource route reaches, so CRUD writes on
//! `user` records can never plant or alter a password hash.

use crate::config::USERNAME_FIELD;
use crate::error::{AppError, StoreError};
use crate::store::{Collection, Document, DocumentStore};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Internal collection name. Resource names may not start with `_`.
pub const CREDENTIALS_COLLECTION: &str = "_credentials";
/// Stored field holding the Argon2id PHC string.
pub const PASSWORD_HASH_FIELD: &str = "password_hash";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("username already registered")]
    Taken,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("password hash: {0}")]
    Crypto(String),
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Taken => AppError::Conflict("Username already exists".into()),
            CredentialError::Store(e) => AppError::Store(e),
            CredentialError::Crypto(m) => AppError::Internal(m),
        }
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Claim `username`, first come first served.
    async fn register(&self, username: &str, password: &str) -> Result<(), CredentialError>;
    async fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError>;
}

/// Credential records in the `_credentials` collection of a [`DocumentStore`].
pub struct CollectionCredentialStore {
    credentials: Collection,
    // serializes the lookup and insert of `register`
    claim: Mutex<()>,
}

impl CollectionCredentialStore {
    pub async fn open(store: Arc<dyn DocumentStore>) -> Result<Self, StoreError> {
        Ok(Self {
            credentials: Collection::open(store, CREDENTIALS_COLLECTION).await?,
            claim: Mutex::new(()),
        })
    }
}

#[async_trait]
impl CredentialStore for CollectionCredentialStore {
    async fn register(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        let password_hash = hash_password(password)?;
        let _guard = self.claim.lock().await;
        if !self.credentials.find_by_field(USERNAME_FIELD, username).await?.is_empty() {
            return Err(CredentialError::Taken);
        }
        let mut record = Document::new();
        record.insert(USERNAME_FIELD.to_string(), Value::String(username.to_string()));
        record.insert(PASSWORD_HASH_FIELD.to_string(), Value::String(password_hash));
        self.credentials.insert(&record).await?;
        Ok(())
    }

    async fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let records = self.credentials.find_by_field(USERNAME_FIELD, username).await?;
        let Some(record) = records.first() else {
            return Ok(false);
        };
        match record.body.get(PASSWORD_HASH_FIELD) {
            Some(Value::String(hash)) => verify_password(password, hash),
            _ => {
                tracing::warn!(%username, "credential record without password hash");
                Ok(false)
            }
        }
    }
}

/// Argon2id hash with a fresh random salt, in PHC string format.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Crypto(format!("hash error: {e}")))
}

/// `Ok(false)` on mismatch; a malformed stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(hash).map_err(|e| CredentialError::Crypto(format!("invalid hash format: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Crypto(format!("verify error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;

    async fn credentials() -> (Arc<dyn DocumentStore>, CollectionCredentialStore) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let creds = CollectionCredentialStore::open(store.clone()).await.unwrap();
        (store, creds)
    }

    #[test]
    fn hashes_are_salted_phc_strings() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a).unwrap());
        assert!(!verify_password("wrong", &a).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(verify_password("pw", "not-a-phc-string"), Err(CredentialError::Crypto(_))));
    }

    #[tokio::test]
    async fn register_then_verify() {
        let (_, creds) = credentials().await;
        creds.register("alice", "pw").await.unwrap();
        assert!(creds.verify("alice", "pw").await.unwrap());
        assert!(!creds.verify("alice", "wrong").await.unwrap());
        assert!(!creds.verify("bob", "pw").await.unwrap());
    }

    #[tokio::test]
    async fn usernames_are_claimed_once() {
        let (_, creds) = credentials().await;
        creds.register("alice", "pw").await.unwrap();
        assert!(matches!(creds.register("alice", "other").await, Err(CredentialError::Taken)));
        assert!(creds.verify("alice", "pw").await.unwrap());
        assert!(!creds.verify("alice", "other").await.unwrap());
    }

    #[tokio::test]
    async fn documents_in_other_collections_are_ignored() {
        let (store, creds) = credentials().await;
        let users = Collection::open(store, "user").await.unwrap();
        let mut planted = Document::new();
        planted.insert("username".into(), Value::String("alice".into()));
        planted.insert(PASSWORD_HASH_FIELD.into(), Value::String(hash_password("pw").unwrap()));
        users.insert(&planted).await.unwrap();

        assert!(!creds.verify("alice", "pw").await.unwrap());
    }
}
