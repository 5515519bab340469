use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::RankingPolicy;

/// Request to record a like/dislike decision
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordInteractionRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "actor_id", rename = "actorId")]
    pub actor_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "target_id", rename = "targetId")]
    pub target_id: i64,
    pub liked: bool,
}

/// Request to fetch ranked candidates for a browsing session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindCandidatesRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
    /// Falls back to the configured default policy when absent.
    #[serde(default)]
    pub policy: Option<RankingPolicy>,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    20
}
