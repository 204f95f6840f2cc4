#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use resource_server::{app, load_all, AppState, CollectionCredentialStore, DocumentStore, MemoryDocumentStore, TokenService};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";

const NOTE_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "text": {"type": "string"},
        "owner": {"type": "string"}
    },
    "required": ["text", "owner"],
    "additionalProperties": false
}"#;

const EVENT_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "title": {"type": "string"},
        "day": {"type": "integer"}
    },
    "required": ["title"]
}"#;

const USER_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "username": {"type": "string"},
        "display_name": {"type": "string"}
    },
    "required": ["username"]
}"#;

pub struct TestApp {
    pub router: Router,
    pub tokens: Arc<TokenService>,
    pub store: Arc<dyn DocumentStore>,
    pub dir: TempDir,
}

pub fn token_service() -> TokenService {
    TokenService::new(SECRET, Duration::minutes(15), Duration::days(30)).unwrap()
}

pub async fn test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let schemas = dir.path().join("schema");
    std::fs::create_dir(&schemas).unwrap();
    std::fs::write(schemas.join("note.json"), NOTE_SCHEMA).unwrap();
    std::fs::write(schemas.join("event.json"), EVENT_SCHEMA).unwrap();
    std::fs::write(schemas.join("user.json"), USER_SCHEMA).unwrap();
    let events = dir.path().join("static_events.json");
    std::fs::write(&events, r#"[{"title": "Opening", "day": 1}]"#).unwrap();

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let registry = Arc::new(load_all(&schemas, store.clone()).await.unwrap());
    let credentials = Arc::new(CollectionCredentialStore::open(store.clone()).await.unwrap());
    let tokens = Arc::new(token_service());
    let state = AppState {
        tokens: tokens.clone(),
        registry,
        credentials,
        static_events_path: Arc::new(events),
    };
    TestApp {
        router: app(state, 1024 * 1024),
        tokens,
        store,
        dir,
    }
}

impl TestApp {
    pub fn access_token(&self, subject: &str) -> String {
        self.tokens.issue_access_token(subject).unwrap()
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// `POST /register` followed by `POST /auth`; returns the issued access token.
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let creds = serde_json::json!({"username": username, "password": password});
        let (status, _) = self.send(Method::POST, "/register", None, Some(creds.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.send(Method::POST, "/auth", None, Some(creds)).await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Create as `subject` and return the new document's id (looked up via GET).
    pub async fn create(&self, resource: &str, subject: &str, body: Value) -> String {
        let token = self.access_token(subject);
        let (status, _) = self.send(Method::POST, &format!("/{resource}"), Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, list) = self.send(Method::GET, &format!("/{resource}"), Some(&token), None).await;
        list.as_array().unwrap().last().unwrap()["_id"].as_str().unwrap().to_string()
    }
}
