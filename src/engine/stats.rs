use sqlx::{PgPool, Row};

use crate::engine::EngineError;
use crate::models::{GlobalStatistics, UserStatistics};

/// Maintains the denormalized per-user aggregates.
///
/// Every refresh recomputes from the interaction log and the match set
/// rather than incrementing, so the aggregate converges even if a prior
/// refresh was missed or applied twice.
pub struct StatisticsAggregator {
    pool: PgPool,
}

impl StatisticsAggregator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recompute and upsert the aggregates for one user as a single
    /// statement.
    pub async fn refresh_statistics(&self, user_id: i64) -> Result<(), EngineError> {
        sqlx::query(
            r#"
            INSERT INTO user_statistics (user_id, likes_received, total_matches, refreshed_at)
            VALUES (
                $1,
                (SELECT COUNT(*) FROM interactions WHERE target_id = $1 AND liked),
                (SELECT COUNT(*) FROM matches WHERE user_lo = $1 OR user_hi = $1),
                NOW()
            )
            ON CONFLICT (user_id) DO UPDATE SET
                likes_received = EXCLUDED.likes_received,
                total_matches = EXCLUDED.total_matches,
                refreshed_at = EXCLUDED.refreshed_at
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Refreshed statistics for user {}", user_id);

        Ok(())
    }

    /// Read the aggregates for display, together with the likes-given count
    /// the success rate is derived from. Missing rows read as zeros.
    pub async fn get_statistics(&self, user_id: i64) -> Result<UserStatistics, EngineError> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(s.likes_received, 0) AS likes_received,
                COALESCE(s.total_matches, 0) AS total_matches,
                s.refreshed_at,
                (SELECT COUNT(*) FROM interactions WHERE actor_id = $1 AND liked) AS likes_given
            FROM (SELECT 1) AS one
            LEFT JOIN user_statistics s ON s.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let likes_given: i64 = row.get("likes_given");
        let total_matches: i64 = row.get("total_matches");

        Ok(UserStatistics {
            user_id,
            likes_received: row.get("likes_received"),
            total_matches,
            likes_given,
            success_rate: compute_success_rate(likes_given, total_matches),
            refreshed_at: row.get("refreshed_at"),
        })
    }

    /// Platform-wide totals, computed by scanning current state.
    pub async fn global_totals(&self) -> Result<GlobalStatistics, EngineError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                COUNT(*) AS total_interactions,
                COUNT(*) FILTER (WHERE liked) AS total_likes,
                COUNT(*) FILTER (WHERE NOT liked) AS total_dislikes,
                (SELECT COUNT(*) FROM matches) AS total_matches
            FROM interactions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(GlobalStatistics {
            total_users: row.get("total_users"),
            total_interactions: row.get("total_interactions"),
            total_likes: row.get("total_likes"),
            total_dislikes: row.get("total_dislikes"),
            total_matches: row.get("total_matches"),
        })
    }
}

/// Share of given likes that turned into matches, as a percentage.
pub fn compute_success_rate(likes_given: i64, matches: i64) -> f64 {
    if likes_given > 0 {
        matches as f64 / likes_given as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_basic() {
        assert_eq!(compute_success_rate(10, 5), 50.0);
        assert_eq!(compute_success_rate(4, 1), 25.0);
    }

    #[test]
    fn test_success_rate_zero_likes_given() {
        assert_eq!(compute_success_rate(0, 0), 0.0);
        // No likes given but matches on record still reads as zero rather
        // than dividing by zero.
        assert_eq!(compute_success_rate(0, 3), 0.0);
    }

    #[test]
    fn test_success_rate_can_exceed_hundred() {
        // Duplicate interactions are allowed in the log, so matches can
        // outnumber distinct likes given; the function does not clamp.
        assert_eq!(compute_success_rate(1, 2), 200.0);
    }
}
