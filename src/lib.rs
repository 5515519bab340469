//! CampusMatch - interaction and matching engine for the CampusMatch social app
//!
//! This library provides the core engine of the CampusMatch application:
//! a durable interaction ledger with daily like quotas, idempotent mutual-like
//! match detection, convergent per-user statistics, and a family of
//! interchangeable candidate-ranking strategies.

pub mod config;
pub mod engine;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use engine::{
    compute_success_rate, strategy_for, Engine, EngineError, InteractionLedger, MatchDetector,
    RankingStrategy, StatisticsAggregator,
};
pub use models::{
    canonical_pair, CandidateProfile, Interaction, Match, MatchOutcome, ProfileSummary,
    RankingPolicy, UserProfile, UserStatistics,
};
