use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{CandidateProfile, UserProfile};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// PostgreSQL store of record for the engine.
///
/// Holds the shared connection pool and the profile-side reads the engine is
/// allowed to make. All quota/ledger/match writes go through the engine
/// components, which share this pool.
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database handle from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new database handle from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StorageError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Wrap an already-constructed pool (used by integration tests)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetch a user profile by id
    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfile, StorageError> {
        let query = r#"
            SELECT id, display_name, age, interests, city, department,
                   likes_used_today, daily_like_quota, created_at
            FROM users
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let row = row.ok_or_else(|| StorageError::NotFound(format!("user {}", user_id)))?;

        Ok(UserProfile {
            id: row.get("id"),
            display_name: row.get("display_name"),
            age: row.get("age"),
            interests: row.get("interests"),
            city: row.get("city"),
            department: row.get("department"),
            likes_used_today: row.get("likes_used_today"),
            daily_like_quota: row.get("daily_like_quota"),
            created_at: row.get("created_at"),
        })
    }

    /// Fetch every other user as a ranking candidate, annotated with the
    /// interaction-derived signals the strategies order by: whether the
    /// requester has already interacted with the profile, and the profile's
    /// current received-like count (recomputed, not read from the aggregate).
    pub async fn fetch_candidates(
        &self,
        user_id: i64,
    ) -> Result<Vec<CandidateProfile>, StorageError> {
        let query = r#"
            SELECT u.id, u.display_name, u.age, u.interests, u.city, u.department,
                   EXISTS (
                       SELECT 1 FROM interactions i
                       WHERE i.actor_id = $1 AND i.target_id = u.id
                   ) AS already_interacted,
                   (
                       SELECT COUNT(*) FROM interactions i
                       WHERE i.target_id = u.id AND i.liked
                   ) AS likes_received
            FROM users u
            WHERE u.id <> $1
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let candidates = rows
            .iter()
            .map(|row| CandidateProfile {
                id: row.get("id"),
                display_name: row.get("display_name"),
                age: row.get("age"),
                interests: row.get("interests"),
                city: row.get("city"),
                department: row.get("department"),
                already_interacted: row.get("already_interacted"),
                likes_received: row.get("likes_received"),
            })
            .collect();

        Ok(candidates)
    }

    /// Reset every user's daily like counter to zero.
    ///
    /// Invoked by the external scheduled collaborator (daily reset job); the
    /// engine never triggers this on its own.
    pub async fn reset_daily_quotas(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("UPDATE users SET likes_used_today = 0")
            .execute(&self.pool)
            .await?;

        tracing::info!("Reset daily like quota for {} users", result.rows_affected());

        Ok(result.rows_affected())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StorageError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
