//! # Teamboard API Server
//!
//! Multi-tenant project-management REST backend: projects, team members,
//! tasks and comments behind role-based access control.
//!
//! With `DATABASE_URL` set the server uses PostgreSQL and applies migrations
//! at startup; otherwise it keeps everything in memory.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p teamboard-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use teamboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use teamboard_shared::db::{migrations, pool};
use teamboard_shared::store::{MemoryStore, PgStore, Store};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Teamboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let (store, pg_pool) = match &config.database {
        Some(database) => {
            let pool = pool::create_pool(pool::DatabaseConfig::new(
                database.url.clone(),
                database.max_connections,
            ))
            .await
            .context("Failed to connect to database")?;

            migrations::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            (Arc::new(PgStore::new(pool.clone())) as Arc<dyn Store>, Some(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on shutdown");
            (Arc::new(MemoryStore::new()) as Arc<dyn Store>, None)
        }
    };

    let address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg_pool) = pg_pool {
        pool::close_pool(&pg_pool).await;
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections...");
}
