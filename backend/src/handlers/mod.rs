pub mod health;
pub mod interactions;
pub mod leaderboard;
pub mod webhook;




use actix_web::web;

use crate::services::InteractionVerifier;

pub use health::configure_health_routes;
pub use interactions::configure_interaction_routes;
pub use leaderboard::configure_leaderboard_routes;
pub use webhook::configure_webhook_routes;

/// Mount every route. The interactions endpoint only exists when a Discord
/// public key is configured.
pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    interaction_verifier: Option<web::Data<InteractionVerifier>>,
) {
    cfg.configure(configure_health_routes)
        .configure(configure_webhook_routes)
        .configure(configure_leaderboard_routes);

    if let Some(verifier) = interaction_verifier {
        cfg.app_data(verifier)
            .configure(configure_interaction_routes);
    }
}
