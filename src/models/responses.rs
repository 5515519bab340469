use serde::{Deserialize, Serialize};

use crate::models::domain::{Match, ProfileSummary};

/// Response for the record-interaction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "interactionId")]
    pub interaction_id: i64,
    pub liked: bool,
    /// "noMatch" | "matchCreated" | "alreadyMatched"; absent for dislikes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub created_match: Option<Match>,
}

/// Response for the candidate-ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<ProfileSummary>,
    pub policy: String,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the quota-reset admin endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetQuotasResponse {
    #[serde(rename = "usersReset")]
    pub users_reset: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
