use sqlx::{PgPool, Row};

use crate::engine::EngineError;
use crate::models::Interaction;

/// Durable record of every like/dislike decision, with quota enforcement.
///
/// A positive decision and its quota increment are applied inside one
/// transaction: either both persist or neither does. The conditional UPDATE
/// also takes the actor's row lock, which serializes concurrent positive
/// decisions by the same actor and closes the read-then-write race on the
/// counter.
pub struct InteractionLedger {
    pool: PgPool,
}

impl InteractionLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a decision by `actor_id` about `target_id`.
    ///
    /// Dislikes bypass the quota and are written unconditionally. Likes
    /// require `likes_used_today < daily_like_quota`; on exhaustion the call
    /// fails with `QuotaExceeded` and nothing is written.
    pub async fn record_interaction(
        &self,
        actor_id: i64,
        target_id: i64,
        liked: bool,
    ) -> Result<Interaction, EngineError> {
        if actor_id == target_id {
            return Err(EngineError::InvalidInput(
                "a user cannot interact with their own profile".to_string(),
            ));
        }

        if !liked {
            return self.insert_dislike(actor_id, target_id).await;
        }

        let mut tx = self.pool.begin().await?;

        // Check-and-increment as a single conditional statement; zero rows
        // means unknown actor or exhausted quota, distinguished below.
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET likes_used_today = likes_used_today + 1
            WHERE id = $1 AND likes_used_today < daily_like_quota
            "#,
        )
        .bind(actor_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let actor_exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                    .bind(actor_id)
                    .fetch_one(&mut *tx)
                    .await?;

            tx.rollback().await?;

            return if actor_exists {
                tracing::info!("Quota exhausted for user {}", actor_id);
                Err(EngineError::QuotaExceeded(actor_id))
            } else {
                Err(EngineError::InvalidInput(format!("unknown user {}", actor_id)))
            };
        }

        let row = sqlx::query(
            r#"
            INSERT INTO interactions (actor_id, target_id, liked)
            VALUES ($1, $2, TRUE)
            RETURNING id, created_at
            "#,
        )
        .bind(actor_id)
        .bind(target_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(reject_unknown_target)?;

        tx.commit().await?;

        tracing::debug!("Recorded like: {} -> {}", actor_id, target_id);

        Ok(Interaction {
            id: row.get("id"),
            actor_id,
            target_id,
            liked: true,
            created_at: row.get("created_at"),
        })
    }

    async fn insert_dislike(
        &self,
        actor_id: i64,
        target_id: i64,
    ) -> Result<Interaction, EngineError> {
        let row = sqlx::query(
            r#"
            INSERT INTO interactions (actor_id, target_id, liked)
            VALUES ($1, $2, FALSE)
            RETURNING id, created_at
            "#,
        )
        .bind(actor_id)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
        .map_err(reject_unknown_target)?;

        tracing::debug!("Recorded dislike: {} -> {}", actor_id, target_id);

        Ok(Interaction {
            id: row.get("id"),
            actor_id,
            target_id,
            liked: false,
            created_at: row.get("created_at"),
        })
    }
}

/// The interaction insert references both users; a foreign-key rejection is
/// caller error (nonexistent user), not a storage failure.
fn reject_unknown_target(err: sqlx::Error) -> EngineError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_foreign_key_violation() {
            return EngineError::InvalidInput("unknown user in interaction".to_string());
        }
    }
    EngineError::Storage(err)
}
