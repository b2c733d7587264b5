//! GitHub webhook handler
//!
//! `POST /github-webhook`. Authenticates the delivery, then hands it to the
//! ingest service. Only authentication failures change the status code;
//! everything else is acknowledged with 204 so GitHub does not retry.

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, info};

use crate::AppState;
use crate::error::AppError;
use crate::services::ScoringOutcome;
use crate::services::signature::SIGNATURE_HEADER;

/// GitHub caps deliveries at 25 MB; PR events are far smaller
pub const MAX_WEBHOOK_BYTES: usize = 5 * 1024 * 1024;

const EVENT_HEADER: &str = "X-GitHub-Event";
const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// POST /github-webhook
///
/// Responses:
/// - 400 when `X-Hub-Signature-256` is missing or malformed
/// - 403 when the signature does not match the body
/// - 204 otherwise, whether or not points were awarded
pub async fn github_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let delivery = header(&req, DELIVERY_HEADER).unwrap_or("-");

    // Signature check runs on the raw bytes, before anything parses them
    state
        .webhook_verifier
        .verify(header(&req, SIGNATURE_HEADER), &body)
        .inspect_err(|e| info!(delivery, error = %e, "Rejected webhook delivery"))?;

    let outcome = state
        .ingest
        .handle_delivery(header(&req, EVENT_HEADER), &body)
        .await;

    match &outcome {
        ScoringOutcome::Awarded { .. } => info!(delivery, ?outcome, "Webhook delivery scored"),
        _ => debug!(delivery, ?outcome, "Webhook delivery handled"),
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Configure webhook routes
pub fn configure_webhook_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/github-webhook")
            .app_data(web::PayloadConfig::new(MAX_WEBHOOK_BYTES))
            .route(web::post().to(github_webhook)),
    );
}
