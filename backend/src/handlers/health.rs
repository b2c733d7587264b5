//! Health handler

use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::services::{HealthService, HealthStatus};

/// GET /health
///
/// 200 while the ledger answers queries, 503 otherwise.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let report = HealthService::new(state.ledger.pool().clone()).check().await;

    match report.status {
        HealthStatus::Healthy => HttpResponse::Ok().json(report),
        HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(report),
    }
}

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
