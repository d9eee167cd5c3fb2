/// Database plumbing for the PostgreSQL backend
///
/// # Modules
///
/// - `pool`: connection pool creation, health checks and shutdown
/// - `migrations`: embedded schema migrations
///
/// Queries live in [`crate::store::postgres`].
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     taskdesk_shared::db::migrations::run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
