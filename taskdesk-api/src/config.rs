/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe struct.
/// Every value is read once at startup and handed to constructors; nothing
/// reads the environment after that.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `STORAGE_BACKEND`: `postgres` or `memory` (default: postgres)
/// - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for token signing (required, at least 32 chars)
/// - `JWT_TTL_SECONDS`: Token lifetime (default: 300)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any
///   (default: http://localhost:3000)
/// - `TASK_LIST_SCOPE`: `owned` or `all` (default: owned)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter (default: taskdesk_api=debug,taskdesk_shared=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use taskdesk_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use chrono::Duration;
use std::env;
use std::str::FromStr;

/// Upper bound for `JWT_TTL_SECONDS` (one day); there is no refresh flow
const MAX_JWT_TTL_SECONDS: i64 = 86_400;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Which tasks `GET /tasks` may return
    pub task_list_scope: TaskListScope,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; a single `*` allows any
    pub cors_origins: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// PostgreSQL connection URL, present whenever the backend is postgres
    pub database_url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in seconds
    pub ttl_seconds: i64,
}

impl JwtConfig {
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds)
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in_memory" => Ok(Self::Memory),
            other => anyhow::bail!(
                "Invalid STORAGE_BACKEND '{}': expected 'postgres' or 'memory'",
                other
            ),
        }
    }
}

/// Visibility of `GET /tasks`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskListScope {
    /// Only tasks the caller created
    #[default]
    Owned,

    /// Every task matching the filters
    All,
}

impl FromStr for TaskListScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owned" => Ok(Self::Owned),
            "all" => Ok(Self::All),
            other => anyhow::bail!(
                "Invalid TASK_LIST_SCOPE '{}': expected 'owned' or 'all'",
                other
            ),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'", other),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_host = var("API_HOST", "0.0.0.0");
        let api_port = var("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Invalid API_PORT: {}", e))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        for origin in &cors_origins {
            if axum::http::HeaderValue::from_str(origin).is_err() {
                anyhow::bail!("Invalid CORS_ORIGINS entry: {:?}", origin);
            }
        }

        let backend: StorageBackend = var("STORAGE_BACKEND", "postgres").parse()?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if backend == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL environment variable is required");
        }

        let max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid DATABASE_MAX_CONNECTIONS: {}", e))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let jwt_ttl_seconds = var("JWT_TTL_SECONDS", "300")
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("Invalid JWT_TTL_SECONDS: {}", e))?;

        if !(1..=MAX_JWT_TTL_SECONDS).contains(&jwt_ttl_seconds) {
            anyhow::bail!(
                "JWT_TTL_SECONDS must be between 1 and {}",
                MAX_JWT_TTL_SECONDS
            );
        }

        let task_list_scope: TaskListScope = var("TASK_LIST_SCOPE", "owned").parse()?;
        let log_format: LogFormat = var("LOG_FORMAT", "pretty").parse()?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            storage: StorageConfig {
                backend,
                database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                ttl_seconds: jwt_ttl_seconds,
            },
            task_list_scope,
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.max_connections, 10);
        assert_eq!(config.jwt.ttl(), Duration::minutes(5));
        assert_eq!(config.task_list_scope, TaskListScope::Owned);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_memory_backend_needs_no_database_url() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", SECRET),
            ("TASK_LIST_SCOPE", "all"),
            ("LOG_FORMAT", "json"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
        ])
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.storage.database_url.is_none());
        assert_eq!(config.task_list_scope, TaskListScope::All);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.api.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_invalid_cors_origin_fails() {
        let err = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", SECRET),
            ("CORS_ORIGINS", "http://ok.test,http://bad\u{7f}.test"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));
    }

    #[test]
    fn test_missing_database_url_for_postgres() {
        let err = load(&[("JWT_SECRET", SECRET)]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_jwt_secret_required_and_long_enough() {
        let err = load(&[("STORAGE_BACKEND", "memory")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let err = load(&[("STORAGE_BACKEND", "memory"), ("JWT_SECRET", "short")]).unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(load(&[
            ("STORAGE_BACKEND", "mongo"),
            ("JWT_SECRET", SECRET),
        ])
        .is_err());
        assert!(load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", SECRET),
            ("API_PORT", "not-a-port"),
        ])
        .is_err());
        assert!(load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", SECRET),
            ("TASK_LIST_SCOPE", "mine"),
        ])
        .is_err());
        assert!(load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", SECRET),
            ("JWT_TTL_SECONDS", "0"),
        ])
        .is_err());
        assert!(load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", SECRET),
            ("JWT_TTL_SECONDS", "86401"),
        ])
        .is_err());
    }
}
