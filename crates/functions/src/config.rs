//! Functions configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FUNCTIONS_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection
//!   string, only when `FUNCTIONS_STORE=postgres`
//!
//! ## Optional
//! - `FUNCTIONS_HOST` - Bind address (default: 127.0.0.1)
//! - `FUNCTIONS_PORT` - Listen port (default: 8080)
//! - `FUNCTIONS_STORE` - `postgres` or `memory` (default: postgres)
//! - `FUNCTIONS_BACKEND_TIMEOUT_MS` - Per-call storage timeout (default: 10000)
//! - `FUNCTIONS_CALLER_HEADER` - Trusted caller identity header (default: x-caller-uid)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use secrecy::SecretString;
use thiserror::Error;

/// Default identity header set by the auth gateway.
pub const DEFAULT_CALLER_HEADER: &str = "x-caller-uid";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which document store backs the functions.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres { database_url: SecretString },
    /// In-process store; data is lost on restart.
    Memory,
}

/// Callable functions configuration.
#[derive(Debug, Clone)]
pub struct FunctionsConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    pub store: StoreBackend,
    /// Upper bound for every storage call
    pub backend_timeout: Duration,
    /// Header carrying the authenticated caller's account id
    pub caller_header: HeaderName,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl FunctionsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parsed("FUNCTIONS_HOST", "127.0.0.1")?;
        let port = env.parsed("FUNCTIONS_PORT", "8080")?;
        let store = match env.or_default("FUNCTIONS_STORE", "postgres").as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: env.database_url("FUNCTIONS_DATABASE_URL")?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "FUNCTIONS_STORE".to_string(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };

        let timeout_ms: u64 = env.parsed("FUNCTIONS_BACKEND_TIMEOUT_MS", "10000")?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "FUNCTIONS_BACKEND_TIMEOUT_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let caller_header = env.parsed("FUNCTIONS_CALLER_HEADER", DEFAULT_CALLER_HEADER)?;

        Ok(Self {
            host,
            port,
            store,
            backend_timeout: Duration::from_millis(timeout_ms),
            caller_header,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parsed("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; empty counts as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}
