//! Discord interactions handler
//!
//! `POST /discord/interactions` receives slash commands over HTTP. Every
//! request is signed with the application's Ed25519 key; unsigned or
//! mis-signed requests get 401, which Discord also uses to probe the
//! endpoint when it is registered.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::AppState;
use crate::error::AppError;
use crate::models::ChatMessage;
use crate::services::InteractionVerifier;
use crate::services::commands::ChatCommand;
use crate::services::crypto::{SIGNATURE_HEADER, TIMESTAMP_HEADER};

const INTERACTION_PING: u8 = 1;
const INTERACTION_APPLICATION_COMMAND: u8 = 2;

const RESPONSE_PONG: u8 = 1;
const RESPONSE_CHANNEL_MESSAGE: u8 = 4;

#[derive(Debug, Deserialize)]
struct Interaction {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    data: Option<CommandData>,
}

#[derive(Debug, Deserialize)]
struct CommandData {
    name: String,
}

#[derive(Debug, Serialize)]
struct InteractionResponse {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ChatMessage>,
}

impl InteractionResponse {
    fn pong() -> Self {
        Self {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    fn message(message: ChatMessage) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(message),
        }
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// POST /discord/interactions
pub async fn discord_interaction(
    state: web::Data<AppState>,
    verifier: web::Data<InteractionVerifier>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    verifier
        .verify(header(&req, SIGNATURE_HEADER), header(&req, TIMESTAMP_HEADER), &body)
        .inspect_err(|e| info!(error = %e, "Rejected interaction"))?;

    let interaction: Interaction = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid interaction payload: {e}")))?;

    match interaction.kind {
        INTERACTION_PING => Ok(HttpResponse::Ok().json(InteractionResponse::pong())),
        INTERACTION_APPLICATION_COMMAND => {
            let name = interaction
                .data
                .map(|d| d.name)
                .ok_or_else(|| AppError::Validation("Missing command data".to_string()))?;

            let message = match ChatCommand::from_name(&name) {
                Some(command) => state.commands.dispatch(command).await?,
                None => {
                    debug!(command = %name, "Unknown command");
                    ChatMessage::text(format!("Unknown command: {name}"))
                }
            };

            Ok(HttpResponse::Ok().json(InteractionResponse::message(message)))
        }
        other => Err(AppError::Validation(format!(
            "Unsupported interaction type: {other}"
        ))),
    }
}

pub fn configure_interaction_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/discord/interactions", web::post().to(discord_interaction));
}
