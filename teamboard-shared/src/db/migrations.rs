/// Schema migrations
///
/// SQL files under `teamboard-shared/migrations/` are embedded with
/// `sqlx::migrate!` and applied at startup when a database is configured.

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{error, info};

/// Applies pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("./migrations");
    info!(available = migrator.iter().count(), "Applying schema migrations");

    migrator.run(pool).await.inspect_err(|e| {
        error!(error = %e, "Schema migration failed");
    })?;

    info!("Schema is up to date");
    Ok(())
}

/// Creates the database named in `database_url` when it is missing
///
/// Local development and the ignored PostgreSQL tests rely on this.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        return Ok(());
    }

    info!("Creating missing database");
    Postgres::create_database(database_url).await
}
