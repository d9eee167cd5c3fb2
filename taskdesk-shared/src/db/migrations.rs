/// Embedded schema migrations
///
/// SQL files under `taskdesk-shared/migrations/` are compiled into the binary
/// and applied in version order. sqlx records applied versions in
/// `_sqlx_migrations`, so running at every startup is idempotent.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies every pending migration
///
/// # Errors
///
/// Returns an error if a migration fails to execute or if an applied
/// migration's checksum no longer matches its file.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!(
                count = migrations.iter().count(),
                "Database migrations up to date"
            );
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
