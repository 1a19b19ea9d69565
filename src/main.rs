//! Directory server: reads config from env, connects the store, serves the API.

use directory_service::{
    app, ensure_database_exists, telemetry, AppState, DirectoryStore, MemoryDirectoryStore, PgDirectoryStore,
    ServerConfig, StoreBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = ServerConfig::from_env()?;
    let store: Arc<dyn DirectoryStore> = match config.store {
        StoreBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            let store = PgDirectoryStore::with_table(pool, &config.table);
            store.ensure_table().await?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryDirectoryStore::new())
        }
    };

    let app = app(AppState::new(store), config.body_limit);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
