//! Resource schema loading: definition files to a registry of schema/collection bindings.

mod loader;
mod resolved;
mod types;
mod validator;

pub use loader::{load_all, read_schema_dir};
pub use resolved::{ResourceBinding, ResourceRegistry};
pub use types::{ResourceSchema, OWNER_FIELD, USERNAME_FIELD, USER_RESOURCE};
