// Criterion benchmarks for the CampusMatch ranking pipeline

use campus_match::config::MatchingSettings;
use campus_match::engine::{strategy_for, RankingStrategy};
use campus_match::models::{CandidateProfile, RankingPolicy, UserProfile};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_candidate(id: usize) -> CandidateProfile {
    CandidateProfile {
        id: id as i64 + 2,
        display_name: format!("User {}", id),
        age: Some(18 + (id % 15) as i16),
        interests: Some(
            match id % 4 {
                0 => "music, hiking",
                1 => "reading, music",
                2 => "cooking",
                _ => "football, gaming",
            }
            .to_string(),
        ),
        city: Some(if id % 3 == 0 { "Toulouse" } else { "Blagnac" }.to_string()),
        department: Some("Haute-Garonne".to_string()),
        already_interacted: id % 5 == 0,
        likes_received: (id % 20) as i64,
    }
}

fn create_requester() -> UserProfile {
    UserProfile {
        id: 1,
        display_name: "Requester".to_string(),
        age: Some(22),
        interests: Some("music, hiking".to_string()),
        city: Some("Toulouse".to_string()),
        department: Some("Haute-Garonne".to_string()),
        likes_used_today: 0,
        daily_like_quota: 10,
        created_at: Utc::now(),
    }
}

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_interests", |b| {
        b.iter(|| {
            campus_match::engine::ranking::tokenize_interests(black_box(
                "music, hiking  board-games, cinema",
            ))
        });
    });
}

fn bench_ranking_strategies(c: &mut Criterion) {
    let matching = MatchingSettings::default();
    let requester = create_requester();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 100, 1000].iter() {
        let candidates: Vec<CandidateProfile> =
            (0..*candidate_count).map(create_candidate).collect();

        for policy in [
            RankingPolicy::AgeProximity,
            RankingPolicy::SharedInterests,
            RankingPolicy::GeoProximity,
        ] {
            let strategy: Box<dyn RankingStrategy> = strategy_for(policy, &matching);

            group.bench_with_input(
                BenchmarkId::new(strategy.name(), candidate_count),
                candidate_count,
                |b, _| {
                    b.iter(|| {
                        strategy.rank(
                            black_box(&requester),
                            black_box(candidates.clone()),
                            black_box(20),
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_ranking_strategies);

criterion_main!(benches);
