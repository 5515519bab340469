use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::engine::{Engine, EngineError};
use crate::models::{
    CandidatesResponse, ErrorResponse, FindCandidatesRequest, HealthResponse, InteractionResponse,
    MatchOutcome, RecordInteractionRequest, ResetQuotasResponse,
};
use crate::services::Database;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub engine: Arc<Engine>,
}

/// Configure all engine routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/interactions", web::post().to(record_interaction))
        .route("/candidates/find", web::post().to(find_candidates))
        .route("/statistics/global", web::get().to(global_statistics))
        .route("/statistics/{userId}", web::get().to(user_statistics))
        .route("/admin/reset-quotas", web::post().to(reset_quotas));
}

/// Map engine failures to discriminated HTTP error bodies.
///
/// Quota exhaustion is a normal-flow outcome the client surfaces as "come
/// back tomorrow"; it must stay distinguishable from storage failures.
fn engine_error_response(err: EngineError) -> HttpResponse {
    match err {
        EngineError::QuotaExceeded(user_id) => {
            HttpResponse::TooManyRequests().json(ErrorResponse {
                error: "quota_exceeded".to_string(),
                message: format!("daily like quota exhausted for user {}", user_id),
                status_code: 429,
            })
        }
        EngineError::InvalidInput(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_input".to_string(),
            message,
            status_code: 400,
        }),
        EngineError::Storage(e) => {
            tracing::error!("Storage failure: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "storage_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.db.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Record a like/dislike decision
///
/// POST /api/v1/interactions
///
/// Request body:
/// ```json
/// {
///   "actorId": 1,
///   "targetId": 2,
///   "liked": true
/// }
/// ```
async fn record_interaction(
    state: web::Data<AppState>,
    req: web::Json<RecordInteractionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    tracing::info!(
        "Recording decision: {} -> {} (liked: {})",
        req.actor_id,
        req.target_id,
        req.liked
    );

    match state
        .engine
        .record_decision(req.actor_id, req.target_id, req.liked)
        .await
    {
        Ok(outcome) => {
            let created_match = match &outcome.match_outcome {
                Some(MatchOutcome::MatchCreated(m)) => Some(m.clone()),
                _ => None,
            };

            HttpResponse::Ok().json(InteractionResponse {
                interaction_id: outcome.interaction.id,
                liked: outcome.interaction.liked,
                outcome: outcome.match_outcome.map(|o| o.as_str().to_string()),
                created_match,
            })
        }
        Err(e) => engine_error_response(e),
    }
}

/// Rank candidates for the next browsing session
///
/// POST /api/v1/candidates/find
///
/// Request body:
/// ```json
/// {
///   "userId": 1,
///   "policy": "sharedInterests",
///   "count": 20
/// }
/// ```
async fn find_candidates(
    state: web::Data<AppState>,
    req: web::Json<FindCandidatesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .engine
        .find_candidates(req.user_id, req.policy, req.count)
        .await
    {
        Ok((policy, candidates, total_candidates)) => HttpResponse::Ok().json(CandidatesResponse {
            candidates,
            policy: policy.as_str().to_string(),
            total_candidates,
        }),
        Err(e) => engine_error_response(e),
    }
}

/// Per-user aggregates with derived success rate
///
/// GET /api/v1/statistics/{userId}
async fn user_statistics(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.engine.user_statistics(user_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => engine_error_response(e),
    }
}

/// Platform-wide totals, scanned from current state
///
/// GET /api/v1/statistics/global
async fn global_statistics(state: web::Data<AppState>) -> impl Responder {
    match state.engine.global_statistics().await {
        Ok(totals) => HttpResponse::Ok().json(totals),
        Err(e) => engine_error_response(e),
    }
}

/// Reset all daily like counters to zero
///
/// POST /api/v1/admin/reset-quotas
///
/// Hook for the external scheduled collaborator; the engine never triggers
/// this on its own.
async fn reset_quotas(state: web::Data<AppState>) -> impl Responder {
    match state.db.reset_daily_quotas().await {
        Ok(users_reset) => HttpResponse::Ok().json(ResetQuotasResponse { users_reset }),
        Err(e) => engine_error_response(EngineError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_quota_error_maps_to_429() {
        let response = engine_error_response(EngineError::QuotaExceeded(7));
        assert_eq!(response.status().as_u16(), 429);
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let response = engine_error_response(EngineError::InvalidInput("bad".to_string()));
        assert_eq!(response.status().as_u16(), 400);
    }
}
