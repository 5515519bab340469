use serde::{Deserialize, Serialize};

/// User profile as read from the store of record.
///
/// Everything except `likes_used_today` is owned by the registration/admin
/// collaborators; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub age: Option<i16>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(rename = "likesUsedToday")]
    pub likes_used_today: i32,
    #[serde(rename = "dailyLikeQuota")]
    pub daily_like_quota: i32,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserProfile {
    /// Remaining positive decisions for today, never below zero.
    pub fn likes_remaining(&self) -> i32 {
        (self.daily_like_quota - self.likes_used_today).max(0)
    }
}

/// One recorded like/dislike decision. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Interaction {
    pub id: i64,
    #[serde(rename = "actorId")]
    pub actor_id: i64,
    #[serde(rename = "targetId")]
    pub target_id: i64,
    pub liked: bool,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A materialized mutual like. The pair is stored sorted ascending so that
/// `(A, B)` and `(B, A)` map to the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    #[serde(rename = "userLo")]
    pub user_lo: i64,
    #[serde(rename = "userHi")]
    pub user_hi: i64,
    #[serde(rename = "matchedAt")]
    pub matched_at: chrono::DateTime<chrono::Utc>,
}

impl Match {
    pub fn contains(&self, user_id: i64) -> bool {
        self.user_lo == user_id || self.user_hi == user_id
    }

    /// The other participant of the pair.
    pub fn partner_of(&self, user_id: i64) -> Option<i64> {
        if self.user_lo == user_id {
            Some(self.user_hi)
        } else if self.user_hi == user_id {
            Some(self.user_lo)
        } else {
            None
        }
    }
}

/// Canonical ordering of an unordered user pair.
pub fn canonical_pair(a: i64, b: i64) -> (i64, i64) {
    if a < b { (a, b) } else { (b, a) }
}

/// Denormalized per-user aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatistics {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "likesReceived")]
    pub likes_received: i64,
    #[serde(rename = "totalMatches")]
    pub total_matches: i64,
    #[serde(rename = "likesGiven")]
    pub likes_given: i64,
    #[serde(rename = "successRate")]
    pub success_rate: f64,
    #[serde(rename = "refreshedAt")]
    pub refreshed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Platform-wide totals, computed by scanning current state, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalStatistics {
    #[serde(rename = "totalUsers")]
    pub total_users: i64,
    #[serde(rename = "totalInteractions")]
    pub total_interactions: i64,
    #[serde(rename = "totalLikes")]
    pub total_likes: i64,
    #[serde(rename = "totalDislikes")]
    pub total_dislikes: i64,
    #[serde(rename = "totalMatches")]
    pub total_matches: i64,
}

/// Candidate row handed to the ranking strategies: the profile plus the
/// interaction-derived signals the strategies order by.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CandidateProfile {
    pub id: i64,
    pub display_name: String,
    pub age: Option<i16>,
    pub interests: Option<String>,
    pub city: Option<String>,
    pub department: Option<String>,
    /// Whether the requesting user has already interacted with this profile.
    pub already_interacted: bool,
    /// Recomputed count of likes this candidate has received.
    pub likes_received: i64,
}

/// What a ranking strategy returns for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub age: Option<i16>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(rename = "alreadyInteracted")]
    pub already_interacted: bool,
}

/// The closed set of interchangeable ranking policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankingPolicy {
    AgeProximity,
    SharedInterests,
    GeoProximity,
}

impl RankingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingPolicy::AgeProximity => "ageProximity",
            RankingPolicy::SharedInterests => "sharedInterests",
            RankingPolicy::GeoProximity => "geoProximity",
        }
    }
}

/// Outcome of match evaluation after a positive decision.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// The other user has not liked back (yet).
    NoMatch,
    /// A mutual like was detected and the match row was created.
    MatchCreated(Match),
    /// A match for this pair already exists; idempotent no-op.
    AlreadyMatched,
}

impl MatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::NoMatch => "noMatch",
            MatchOutcome::MatchCreated(_) => "matchCreated",
            MatchOutcome::AlreadyMatched => "alreadyMatched",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_pair_orders_ascending() {
        assert_eq!(canonical_pair(7, 3), (3, 7));
        assert_eq!(canonical_pair(3, 7), (3, 7));
    }

    #[test]
    fn test_match_partner_of() {
        let m = Match {
            user_lo: 1,
            user_hi: 2,
            matched_at: chrono::Utc::now(),
        };
        assert_eq!(m.partner_of(1), Some(2));
        assert_eq!(m.partner_of(2), Some(1));
        assert_eq!(m.partner_of(3), None);
        assert!(m.contains(1) && m.contains(2) && !m.contains(3));
    }

    #[test]
    fn test_likes_remaining_floors_at_zero() {
        let mut profile = UserProfile {
            id: 1,
            display_name: "Test".to_string(),
            age: Some(20),
            interests: None,
            city: None,
            department: None,
            likes_used_today: 12,
            daily_like_quota: 10,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(profile.likes_remaining(), 0);
        profile.likes_used_today = 4;
        assert_eq!(profile.likes_remaining(), 6);
    }
}
