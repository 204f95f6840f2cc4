//! Process configuration from environment variables (after `.env` is loaded by the binary).

use crate::token::{TokenError, TokenService};
use chrono::Duration;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,
    /// PostgreSQL schema holding one table per collection.
    pub resource_schema: String,
    pub store_backend: StoreBackend,
    pub schema_dir: PathBuf,
    pub static_events_path: PathBuf,
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub max_request_size_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".into(),
            database_url: "postgres://localhost/resources".into(),
            database_max_connections: 5,
            resource_schema: "resources".into(),
            store_backend: StoreBackend::Postgres,
            schema_dir: PathBuf::from("./schema"),
            static_events_path: PathBuf::from("./static_events.json"),
            jwt_secret: String::new(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 2_592_000,
            max_request_size_bytes: 1024 * 1024,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns. Unparseable numbers keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut s = Self::default();
        if let Some(v) = lookup("BIND_ADDR") {
            s.bind_addr = v;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            s.database_url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            s.database_max_connections = v.parse().unwrap_or(s.database_max_connections);
        }
        if let Some(v) = lookup("RESOURCE_SCHEMA") {
            s.resource_schema = v;
        }
        if let Some(v) = lookup("STORE_BACKEND") {
            s.store_backend = match v.to_lowercase().as_str() {
                "memory" | "mem" => StoreBackend::Memory,
                _ => StoreBackend::Postgres,
            };
        }
        if let Some(v) = lookup("SCHEMA_DIR") {
            s.schema_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("STATIC_EVENTS_PATH") {
            s.static_events_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("JWT_SECRET") {
            s.jwt_secret = v;
        }
        if let Some(v) = lookup("ACCESS_TOKEN_TTL_SECS") {
            s.access_token_ttl_secs = v.parse().unwrap_or(s.access_token_ttl_secs);
        }
        if let Some(v) = lookup("REFRESH_TOKEN_TTL_SECS") {
            s.refresh_token_ttl_secs = v.parse().unwrap_or(s.refresh_token_ttl_secs);
        }
        if let Some(v) = lookup("MAX_REQUEST_SIZE_BYTES") {
            s.max_request_size_bytes = v.parse().unwrap_or(s.max_request_size_bytes);
        }
        s
    }

    pub fn token_service(&self) -> Result<TokenService, TokenError> {
        TokenService::new(
            &self.jwt_secret,
            Duration::seconds(self.access_token_ttl_secs),
            Duration::seconds(self.refresh_token_ttl_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let s = Settings::from_lookup(|_| None);
        assert_eq!(s.bind_addr, "0.0.0.0:5000");
        assert_eq!(s.store_backend, StoreBackend::Postgres);
        assert_eq!(s.resource_schema, "resources");
        assert_eq!(s.access_token_ttl_secs, 900);
        assert!(s.token_service().is_err());
    }

    #[test]
    fn env_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("SCHEMA_DIR", "/etc/schemas"),
            ("RESOURCE_SCHEMA", "tenant_a"),
            ("JWT_SECRET", "s3cret"),
            ("ACCESS_TOKEN_TTL_SECS", "60"),
            ("REFRESH_TOKEN_TTL_SECS", "not-a-number"),
        ]));
        assert_eq!(s.store_backend, StoreBackend::Memory);
        assert_eq!(s.schema_dir, PathBuf::from("/etc/schemas"));
        assert_eq!(s.resource_schema, "tenant_a");
        assert_eq!(s.access_token_ttl_secs, 60);
        assert_eq!(s.refresh_token_ttl_secs, 2_592_000);
        assert!(s.token_service().is_ok());
    }
}
