use std::cmp::Reverse;

use rand::seq::SliceRandom;

use crate::config::MatchingSettings;
use crate::models::{CandidateProfile, ProfileSummary, RankingPolicy, UserProfile};

/// One interchangeable candidate-ordering policy.
///
/// Strategies are pure over pre-fetched candidate rows: the services layer
/// queries current state on every call, so results are finite and not
/// restartable. A strategy whose precondition data is missing on the
/// requester returns an empty list rather than an error.
pub trait RankingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produce at most `count` candidates for `requester`, best first.
    fn rank(
        &self,
        requester: &UserProfile,
        candidates: Vec<CandidateProfile>,
        count: usize,
    ) -> Vec<ProfileSummary>;
}

/// Select the strategy for a policy, parameterized from configuration.
pub fn strategy_for(policy: RankingPolicy, matching: &MatchingSettings) -> Box<dyn RankingStrategy> {
    match policy {
        RankingPolicy::AgeProximity => Box::new(AgeProximity {
            window: matching.age_window,
            minimum_age: matching.minimum_age,
        }),
        RankingPolicy::SharedInterests => Box::new(SharedInterests),
        RankingPolicy::GeoProximity => Box::new(GeoProximity),
    }
}

/// Candidates whose age lies within a symmetric window of the requester's,
/// floored at the platform minimum age; closest age first.
pub struct AgeProximity {
    pub window: i16,
    pub minimum_age: i16,
}

impl RankingStrategy for AgeProximity {
    fn name(&self) -> &'static str {
        "ageProximity"
    }

    fn rank(
        &self,
        requester: &UserProfile,
        candidates: Vec<CandidateProfile>,
        count: usize,
    ) -> Vec<ProfileSummary> {
        let Some(age) = requester.age else {
            return Vec::new();
        };

        let lower = (age - self.window).max(self.minimum_age);
        let upper = age + self.window;

        let scored: Vec<_> = candidates
            .into_iter()
            .filter(|c| c.id != requester.id)
            .filter_map(|c| {
                let candidate_age = c.age?;
                if candidate_age < lower || candidate_age > upper {
                    return None;
                }
                Some(((candidate_age - age).abs() as i64, c))
            })
            .collect();

        order_and_truncate(scored, count)
    }
}

/// Candidates sharing at least one interest token with the requester,
/// ordered by interaction-derived popularity (received likes), then by how
/// many tokens they share.
pub struct SharedInterests;

impl RankingStrategy for SharedInterests {
    fn name(&self) -> &'static str {
        "sharedInterests"
    }

    fn rank(
        &self,
        requester: &UserProfile,
        candidates: Vec<CandidateProfile>,
        count: usize,
    ) -> Vec<ProfileSummary> {
        let tokens = tokenize_interests(requester.interests.as_deref().unwrap_or(""));
        if tokens.is_empty() {
            return Vec::new();
        }

        let scored: Vec<_> = candidates
            .into_iter()
            .filter(|c| c.id != requester.id)
            .filter_map(|c| {
                let interests = c.interests.as_deref()?.to_lowercase();
                let shared = tokens
                    .iter()
                    .filter(|token| interests.contains(token.as_str()))
                    .count();
                if shared == 0 {
                    return None;
                }
                Some(((Reverse(c.likes_received), Reverse(shared)), c))
            })
            .collect();

        order_and_truncate(scored, count)
    }
}

/// All other users, tiered by locality: same city, then same department,
/// then everyone else.
pub struct GeoProximity;

impl RankingStrategy for GeoProximity {
    fn name(&self) -> &'static str {
        "geoProximity"
    }

    fn rank(
        &self,
        requester: &UserProfile,
        candidates: Vec<CandidateProfile>,
        count: usize,
    ) -> Vec<ProfileSummary> {
        if requester.city.is_none() && requester.department.is_none() {
            return Vec::new();
        }

        let scored: Vec<_> = candidates
            .into_iter()
            .filter(|c| c.id != requester.id)
            .map(|c| (locality_tier(requester, &c), c))
            .collect();

        order_and_truncate(scored, count)
    }
}

fn locality_tier(requester: &UserProfile, candidate: &CandidateProfile) -> i64 {
    if requester.city.is_some() && requester.city == candidate.city {
        1
    } else if requester.department.is_some() && requester.department == candidate.department {
        2
    } else {
        3
    }
}

/// Split a free-text interest field into lowercase tokens on whitespace and
/// commas.
pub fn tokenize_interests(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Shared ordering tail for every strategy: primary key ascending, then
/// not-yet-interacted profiles before already-interacted ones (re-surfacing
/// allowed, never excluded), then random order for what remains. The shuffle
/// runs before a stable sort, so equal keys keep the shuffled order.
fn order_and_truncate<K: Ord>(
    mut scored: Vec<(K, CandidateProfile)>,
    count: usize,
) -> Vec<ProfileSummary> {
    let mut rng = rand::rng();
    scored.shuffle(&mut rng);

    scored.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.already_interacted.cmp(&b.1.already_interacted))
    });

    scored.truncate(count);

    scored
        .into_iter()
        .map(|(_, c)| ProfileSummary {
            user_id: c.id,
            display_name: c.display_name,
            age: c.age,
            city: c.city,
            already_interacted: c.already_interacted,
        })
        .collect()
}
