//! Leaderboard handlers
//!
//! JSON view of the score ledger.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::AppState;
use crate::error::AppError;
use crate::models::{LeaderboardParams, LeaderboardResponse};

pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

/// Standard API response wrapper
#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    data: T,
    meta: ResponseMeta,
}

#[derive(Serialize)]
struct ResponseMeta {
    request_id: String,
}

impl<T: Serialize> ApiResponse<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta {
                request_id: uuid::Uuid::new_v4().to_string(),
            },
        }
    }
}

/// GET /v1/leaderboard
///
/// Query Parameters:
/// - limit: Maximum number of entries. Default: `LEADERBOARD_SIZE`, clamped to 1..=100
pub async fn get_leaderboard(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardParams>,
) -> Result<HttpResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or_else(|| state.leaderboard.size())
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let entries = state.leaderboard.top(limit).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(LeaderboardResponse::from_entries(entries))))
}

pub fn configure_leaderboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/v1").route("/leaderboard", web::get().to(get_leaderboard)));
}
