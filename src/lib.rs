//! Resource server: schema-driven CRUD endpoints over a document store, gated by bearer tokens
//! and per-record ownership checks.

pub mod config;
pub mod credentials;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;
pub mod token;

pub use config::{load_all, ResourceBinding, ResourceRegistry, ResourceSchema};
pub use credentials::{CollectionCredentialStore, CredentialStore};
pub use error::{AppError, SchemaError, StoreError};
pub use routes::{app, common_routes, resource_routes};
pub use service::{CrudService, Identity};
pub use settings::{Settings, StoreBackend};
pub use state::AppState;
pub use store::{ensure_database_exists, Collection, DocumentStore, MemoryDocumentStore, PgDocumentStore};
pub use token::{TokenService, TokenType};
