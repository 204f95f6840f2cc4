//! Server binary: loads resource schemas, binds their routes and serves them.

use resource_server::{
    app, ensure_database_exists, load_all, AppState, CollectionCredentialStore, DocumentStore, MemoryDocumentStore,
    PgDocumentStore, Settings, StoreBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("resource_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env();
    let tokens = Arc::new(settings.token_service()?);

    let store: Arc<dyn DocumentStore> = match settings.store_backend {
        StoreBackend::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.database_max_connections)
                .connect(&settings.database_url)
                .await?;
            Arc::new(PgDocumentStore::with_schema(pool, settings.resource_schema.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let registry = Arc::new(load_all(&settings.schema_dir, store.clone()).await?);
    tracing::info!(resources = ?registry.names(), "schemas loaded");

    let credentials = Arc::new(CollectionCredentialStore::open(store).await?);
    let state = AppState {
        tokens,
        registry,
        credentials,
        static_events_path: Arc::new(settings.static_events_path.clone()),
    };

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, settings.max_request_size_bytes)).await?;
    Ok(())
}
