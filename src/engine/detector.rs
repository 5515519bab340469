use sqlx::{PgPool, Row};

use crate::engine::EngineError;
use crate::models::{canonical_pair, Match, MatchOutcome};

/// Decides, idempotently, whether a mutual like exists and materializes the
/// match exactly once.
///
/// The unordered pair is stored sorted ascending under a composite primary
/// key, so the final INSERT .. ON CONFLICT is the real idempotency guard:
/// two concurrent evaluations can both pass the existence checks, but only
/// one insert lands; the loser observes zero affected rows and reports
/// `AlreadyMatched`.
pub struct MatchDetector {
    pool: PgPool,
}

impl MatchDetector {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Evaluate the pair after a positive decision by `actor_id`.
    pub async fn evaluate_match(
        &self,
        actor_id: i64,
        target_id: i64,
    ) -> Result<MatchOutcome, EngineError> {
        if actor_id == target_id {
            return Err(EngineError::InvalidInput(
                "a user cannot match with themselves".to_string(),
            ));
        }

        let (lo, hi) = canonical_pair(actor_id, target_id);

        let already_matched: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM matches WHERE user_lo = $1 AND user_hi = $2)",
        )
        .bind(lo)
        .bind(hi)
        .fetch_one(&self.pool)
        .await?;

        if already_matched {
            tracing::debug!("Pair ({}, {}) already matched", lo, hi);
            return Ok(MatchOutcome::AlreadyMatched);
        }

        let reciprocal_like: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM interactions
                WHERE actor_id = $1 AND target_id = $2 AND liked
            )
            "#,
        )
        .bind(target_id)
        .bind(actor_id)
        .fetch_one(&self.pool)
        .await?;

        if !reciprocal_like {
            return Ok(MatchOutcome::NoMatch);
        }

        // Mutual like confirmed; let the composite key arbitrate racers.
        let inserted = sqlx::query(
            r#"
            INSERT INTO matches (user_lo, user_hi)
            VALUES ($1, $2)
            ON CONFLICT (user_lo, user_hi) DO NOTHING
            RETURNING matched_at
            "#,
        )
        .bind(lo)
        .bind(hi)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(row) => {
                tracing::info!("Match created for pair ({}, {})", lo, hi);
                Ok(MatchOutcome::MatchCreated(Match {
                    user_lo: lo,
                    user_hi: hi,
                    matched_at: row.get("matched_at"),
                }))
            }
            None => Ok(MatchOutcome::AlreadyMatched),
        }
    }
}
