// Engine exports
pub mod detector;
pub mod ledger;
pub mod ranking;
pub mod stats;

pub use detector::MatchDetector;
pub use ledger::InteractionLedger;
pub use ranking::{strategy_for, AgeProximity, GeoProximity, RankingStrategy, SharedInterests};
pub use stats::{compute_success_rate, StatisticsAggregator};

use std::sync::Arc;

use thiserror::Error;

use crate::config::MatchingSettings;
use crate::models::{
    GlobalStatistics, Interaction, MatchOutcome, ProfileSummary, RankingPolicy, UserStatistics,
};
use crate::services::{Database, StorageError};

/// Engine-level error taxonomy.
///
/// `QuotaExceeded` and `InvalidInput` are caller-visible outcomes;
/// `Storage` is a transient infrastructure failure the caller may retry,
/// since every engine operation is a single atomic unit.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("daily like quota exhausted for user {0}")]
    QuotaExceeded(i64),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SqlxError(e) => EngineError::Storage(e),
            StorageError::MigrateError(e) => EngineError::Storage(sqlx::Error::Migrate(Box::new(e))),
            StorageError::NotFound(what) => EngineError::InvalidInput(format!("unknown {}", what)),
        }
    }
}

/// Result of one full browsing decision.
#[derive(Debug)]
pub struct DecisionOutcome {
    pub interaction: Interaction,
    /// Present only for positive decisions.
    pub match_outcome: Option<MatchOutcome>,
}

/// Facade over the interaction-and-matching engine.
///
/// Each public method is one short-lived unit of work against the shared
/// store; the engine keeps no mutable in-process state, so concurrent
/// browsing sessions need no coordination beyond what the storage layer
/// enforces.
pub struct Engine {
    db: Arc<Database>,
    ledger: InteractionLedger,
    detector: MatchDetector,
    stats: StatisticsAggregator,
    matching: MatchingSettings,
}

impl Engine {
    pub fn new(db: Arc<Database>, matching: MatchingSettings) -> Self {
        let pool = db.pool().clone();
        Self {
            ledger: InteractionLedger::new(pool.clone()),
            detector: MatchDetector::new(pool.clone()),
            stats: StatisticsAggregator::new(pool),
            db,
            matching,
        }
    }

    /// The browsing-session flow: record the decision, evaluate the match on
    /// a positive decision, then refresh the aggregates for both
    /// participants.
    pub async fn record_decision(
        &self,
        actor_id: i64,
        target_id: i64,
        liked: bool,
    ) -> Result<DecisionOutcome, EngineError> {
        let interaction = self
            .ledger
            .record_interaction(actor_id, target_id, liked)
            .await?;

        let match_outcome = if liked {
            Some(self.detector.evaluate_match(actor_id, target_id).await?)
        } else {
            None
        };

        self.stats.refresh_statistics(actor_id).await?;
        self.stats.refresh_statistics(target_id).await?;

        Ok(DecisionOutcome {
            interaction,
            match_outcome,
        })
    }

    /// Rank candidates for the next browsing session under the requested
    /// policy (or the configured default).
    ///
    /// Returns the resolved policy, the ranked summaries, and how many
    /// candidates were considered before ranking.
    pub async fn find_candidates(
        &self,
        user_id: i64,
        policy: Option<RankingPolicy>,
        count: usize,
    ) -> Result<(RankingPolicy, Vec<ProfileSummary>, usize), EngineError> {
        let policy = policy.unwrap_or(self.matching.default_policy);
        let count = count.min(self.matching.max_limit);

        let requester = self.db.get_profile(user_id).await?;
        let candidates = self.db.fetch_candidates(user_id).await?;
        let total_candidates = candidates.len();

        let strategy = strategy_for(policy, &self.matching);
        let ranked = strategy.rank(&requester, candidates, count);

        tracing::info!(
            "Ranked {} of {} candidates for user {} under {}",
            ranked.len(),
            total_candidates,
            user_id,
            strategy.name()
        );

        Ok((policy, ranked, total_candidates))
    }

    pub async fn user_statistics(&self, user_id: i64) -> Result<UserStatistics, EngineError> {
        self.stats.get_statistics(user_id).await
    }

    pub async fn global_statistics(&self) -> Result<GlobalStatistics, EngineError> {
        self.stats.global_totals().await
    }

    pub fn matching_settings(&self) -> &MatchingSettings {
        &self.matching
    }
}
