//! Load resource definitions from a directory of `<name>.json` files and open their collections.

use crate::config::resolved::{ResourceBinding, ResourceRegistry};
use crate::config::types::ResourceSchema;
use crate::error::SchemaError;
use crate::store::{Collection, DocumentStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parse every `.json` file in `dir` (lexical order). Any malformed file fails the whole load.
pub async fn read_schema_dir(dir: &Path) -> Result<Vec<ResourceSchema>, SchemaError> {
    let io_err = |source: std::io::Error| SchemaError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let mut schemas = Vec::with_capacity(files.len());
    for path in files {
        schemas.push(read_schema_file(&path).await?);
    }
    Ok(schemas)
}

async fn read_schema_file(path: &Path) -> Result<ResourceSchema, SchemaError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SchemaError::InvalidName(path.display().to_string()))?
        .to_string();
    let raw = tokio::fs::read_to_string(path).await.map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let definition: serde_json::Value = serde_json::from_str(&raw).map_err(|e| SchemaError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    ResourceSchema::new(name, definition)
}

/// Load all schemas in `dir` and bind each to a collection of the same name (created if missing).
pub async fn load_all(dir: &Path, store: Arc<dyn DocumentStore>) -> Result<ResourceRegistry, SchemaError> {
    let schemas = read_schema_dir(dir).await?;
    let mut bindings = Vec::with_capacity(schemas.len());
    for schema in schemas {
        let collection = Collection::open(store.clone(), &schema.name)
            .await
            .map_err(|source| SchemaError::Collection {
                name: schema.name.clone(),
                source,
            })?;
        tracing::info!(resource = %schema.name, owned = schema.has_owner_field, "resource registered");
        bindings.push(ResourceBinding {
            schema: Arc::new(schema),
            collection,
        });
    }
    Ok(ResourceRegistry::new(bindings))
}
