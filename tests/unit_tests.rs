// Unit tests for the CampusMatch engine (pure, no database)

use campus_match::config::MatchingSettings;
use campus_match::engine::ranking::tokenize_interests;
use campus_match::engine::{compute_success_rate, strategy_for};
use campus_match::models::{canonical_pair, CandidateProfile, RankingPolicy, UserProfile};
use chrono::Utc;

fn create_requester(
    age: Option<i16>,
    interests: Option<&str>,
    city: Option<&str>,
    department: Option<&str>,
) -> UserProfile {
    UserProfile {
        id: 1,
        display_name: "Requester".to_string(),
        age,
        interests: interests.map(str::to_string),
        city: city.map(str::to_string),
        department: department.map(str::to_string),
        likes_used_today: 0,
        daily_like_quota: 10,
        created_at: Utc::now(),
    }
}

fn create_candidate(id: i64, age: Option<i16>, interests: Option<&str>) -> CandidateProfile {
    CandidateProfile {
        id,
        display_name: format!("User {}", id),
        age,
        interests: interests.map(str::to_string),
        city: None,
        department: None,
        already_interacted: false,
        likes_received: 0,
    }
}

#[test]
fn test_age_proximity_scenario() {
    // A 20-year-old requester with candidates aged 17, 19, 23, 30 sees only
    // the 19- and 23-year-olds, closest first: 17 is below the age-18 floor
    // and 30 is outside the +/-3 window.
    let matching = MatchingSettings::default();
    let strategy = strategy_for(RankingPolicy::AgeProximity, &matching);
    let requester = create_requester(Some(20), None, None, None);

    let candidates = vec![
        create_candidate(2, Some(17), None),
        create_candidate(3, Some(19), None),
        create_candidate(4, Some(23), None),
        create_candidate(5, Some(30), None),
    ];

    let ranked = strategy.rank(&requester, candidates, 10);

    let ids: Vec<i64> = ranked.iter().map(|p| p.user_id).collect();
    assert_eq!(ids, vec![3, 4]);
}

#[test]
fn test_shared_interests_scenario() {
    // A "music, hiking" requester keeps the "reading, music" candidate and
    // drops the "cooking" one.
    let matching = MatchingSettings::default();
    let strategy = strategy_for(RankingPolicy::SharedInterests, &matching);
    let requester = create_requester(Some(20), Some("music, hiking"), None, None);

    let candidates = vec![
        create_candidate(2, Some(21), Some("reading, music")),
        create_candidate(3, Some(21), Some("cooking")),
    ];

    let ranked = strategy.rank(&requester, candidates, 10);

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].user_id, 2);
}

#[test]
fn test_every_strategy_excludes_requester_and_caps_count() {
    let matching = MatchingSettings::default();
    let requester = create_requester(
        Some(21),
        Some("music"),
        Some("Toulouse"),
        Some("Haute-Garonne"),
    );

    let candidates: Vec<CandidateProfile> = (1..=30)
        .map(|id| {
            let mut c = create_candidate(id, Some(21), Some("music"));
            c.city = Some("Toulouse".to_string());
            c.department = Some("Haute-Garonne".to_string());
            c
        })
        .collect();

    for policy in [
        RankingPolicy::AgeProximity,
        RankingPolicy::SharedInterests,
        RankingPolicy::GeoProximity,
    ] {
        let strategy = strategy_for(policy, &matching);
        let ranked = strategy.rank(&requester, candidates.clone(), 7);

        assert!(ranked.len() <= 7, "{} exceeded count", strategy.name());
        assert!(
            ranked.iter().all(|p| p.user_id != requester.id),
            "{} returned the requester",
            strategy.name()
        );
    }
}

#[test]
fn test_missing_precondition_data_yields_empty_not_error() {
    let matching = MatchingSettings::default();
    // No age, no interests, no location on the requester.
    let requester = create_requester(None, None, None, None);
    let candidates = vec![create_candidate(2, Some(21), Some("music"))];

    for policy in [
        RankingPolicy::AgeProximity,
        RankingPolicy::SharedInterests,
        RankingPolicy::GeoProximity,
    ] {
        let strategy = strategy_for(policy, &matching);
        assert!(strategy.rank(&requester, candidates.clone(), 10).is_empty());
    }
}

#[test]
fn test_interest_tokens_split_on_whitespace_and_commas() {
    assert_eq!(
        tokenize_interests("Music,hiking board-games"),
        vec!["music", "hiking", "board-games"]
    );
    assert!(tokenize_interests("").is_empty());
}

#[test]
fn test_canonical_pair_is_order_insensitive() {
    assert_eq!(canonical_pair(12, 5), canonical_pair(5, 12));
    assert_eq!(canonical_pair(5, 12), (5, 12));
}

#[test]
fn test_success_rate() {
    assert_eq!(compute_success_rate(10, 3), 30.0);
    assert_eq!(compute_success_rate(0, 0), 0.0);
}

#[test]
fn test_ranking_policy_wire_names() {
    assert_eq!(RankingPolicy::AgeProximity.as_str(), "ageProximity");
    assert_eq!(
        serde_json::from_str::<RankingPolicy>("\"sharedInterests\"").unwrap(),
        RankingPolicy::SharedInterests
    );
}
