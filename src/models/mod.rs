// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    canonical_pair, CandidateProfile, GlobalStatistics, Interaction, Match, MatchOutcome,
    ProfileSummary, RankingPolicy, UserProfile, UserStatistics,
};
pub use requests::{FindCandidatesRequest, RecordInteractionRequest};
pub use responses::{
    CandidatesResponse, ErrorResponse, HealthResponse, InteractionResponse, ResetQuotasResponse,
};
