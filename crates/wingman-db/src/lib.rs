//! # wingman-db
//!
//! PostgreSQL database layer for the Wingman analysis pipeline.
//!
//! This crate provides:
//! - Connection pool management
//! - Session directory (web-session token resolution, interview
//!   session ownership)
//! - Analysis record repository with an atomic `(session_id, user_id)`
//!   keyed upsert
//!
//! ## Example
//!
//! ```rust,ignore
//! use wingman_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/wingman").await?;
//!     let record = db.analysis_records.get_by_session(session_id).await?;
//!     Ok(())
//! }
//! ```

pub mod analysis_records;
pub mod pool;
pub mod sessions;

// Re-export core types
pub use wingman_core::*;

pub use analysis_records::PgAnalysisRecordRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use sessions::{hash_token, PgSessionDirectory};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Session directory for auth resolution and ownership checks.
    pub sessions: PgSessionDirectory,
    /// Analysis record repository.
    pub analysis_records: PgAnalysisRecordRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            sessions: PgSessionDirectory::new(pool.clone()),
            analysis_records: PgAnalysisRecordRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
