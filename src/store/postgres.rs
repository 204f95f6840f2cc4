//! PostgreSQL backend: one JSONB table per collection inside a dedicated schema.

use super::{is_valid_collection_name, Document, DocumentStore, StoredDocument};
use crate::error::StoreError;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{ConnectOptions, PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
}

impl PgDocumentStore {
    /// Collection tables live in `schema` (created on first use).
    pub fn with_schema(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    fn table(&self, collection: &str) -> Result<String, StoreError> {
        if !is_valid_collection_name(collection) {
            return Err(StoreError::InvalidCollection(collection.to_string()));
        }
        Ok(format!("{}.{}", quote_ident(&self.schema), quote_ident(collection)))
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn ensure_collection(&self, collection: &str) -> Result<(), StoreError> {
        let table = self.table(collection)?;
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&self.schema)))
            .execute(&self.pool)
            .await?;
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            table
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, collection: &str, body: &Document) -> Result<String, StoreError> {
        let sql = format!("INSERT INTO {} (id, body) VALUES ($1, $2)", self.table(collection)?);
        let id = Uuid::new_v4();
        tracing::debug!(sql = %sql, %id, "query");
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(body))
            .execute(&self.pool)
            .await?;
        Ok(id.to_string())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let sql = format!("SELECT id, body FROM {} ORDER BY created_at, id", self.table(collection)?);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_document).collect()
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let sql = format!("SELECT id, body FROM {} WHERE id = $1", self.table(collection)?);
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        tracing::debug!(sql = %sql, %id, "query");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let sql = format!(
            "SELECT id, body FROM {} WHERE body ->> $1 = $2 AND jsonb_typeof(body -> $1) = 'string' ORDER BY created_at, id",
            self.table(collection)?
        );
        tracing::debug!(sql = %sql, %field, "query");
        let rows = sqlx::query(&sql)
            .bind(field)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_document).collect()
    }

    async fn replace(&self, collection: &str, id: &str, body: &Document) -> Result<u64, StoreError> {
        let sql = format!(
            "UPDATE {} SET body = $2, updated_at = NOW() WHERE id = $1",
            self.table(collection)?
        );
        let Some(id) = parse_id(id) else {
            return Ok(0);
        };
        tracing::debug!(sql = %sql, %id, "query");
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(body))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table(collection)?);
        let Some(id) = parse_id(id) else {
            return Ok(0);
        };
        tracing::debug!(sql = %sql, %id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Ids that are not UUIDs match nothing.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<StoredDocument, StoreError> {
    let id: Uuid = row.try_get("id")?;
    let body: Json<serde_json::Value> = row.try_get("body")?;
    match body.0 {
        serde_json::Value::Object(map) => Ok(StoredDocument {
            id: id.to_string(),
            body: map,
        }),
        _ => Err(StoreError::Corrupt(id.to_string())),
    }
}

/// Create the target database if it does not exist. Connects to the `postgres` maintenance database to do so.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url);
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> (String, String) {
    let path_start = url.rfind('/').map(|i| i + 1).unwrap_or(url.len());
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    (format!("{}postgres", base), db_name.to_string())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
