use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mergeboard::handlers;
use mergeboard::{
    AppComponents, AppState, ChatCommand, ChatLoop, Config, DiscordClient, GitHubIssueResolver,
    InteractionVerifier, LedgerService, Notifier,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mergeboard=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()
        .map_err(|e| io::Error::other(format!("Failed to load configuration: {e}")))?;

    info!("Starting Mergeboard server on {}:{}", config.host, config.port);

    let ledger = LedgerService::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| io::Error::other(format!("Failed to open score ledger: {e}")))?;

    info!(database_url = %config.database_url, "Score ledger ready");

    let resolver = GitHubIssueResolver::new(
        &config.github_api_url,
        &config.repository,
        config.github_token.clone(),
        config.github_timeout,
    )
    .map_err(|e| io::Error::other(format!("Failed to build GitHub client: {e}")))?;

    info!(repository = %config.repository, "Resolving issues against GitHub");

    let discord = config
        .discord_token
        .as_deref()
        .map(|token| DiscordClient::new(&config.discord_api_url, token))
        .transpose()
        .map_err(|e| io::Error::other(format!("Failed to build Discord client: {e}")))?;

    match (&discord, config.discord_application_id) {
        (Some(client), Some(application_id)) => {
            match client
                .register_commands(application_id, &ChatCommand::definitions())
                .await
            {
                Ok(()) => info!(application_id, "Registered slash commands"),
                Err(e) => warn!(application_id, error = %e, "Failed to register slash commands"),
            }
        }
        _ => warn!("DISCORD_TOKEN or DISCORD_APPLICATION_ID not set. Slash commands are not registered."),
    }

    // Announcements only run when both a bot token and a channel are configured
    let (notifier, chat_loop) = match (discord, config.announcement_channel_id) {
        (Some(client), Some(channel_id)) => {
            let (notifier, rx) = Notifier::channel(config.announcement_queue_capacity);
            let handle = ChatLoop::new(Arc::new(client), channel_id, rx).start();
            (notifier, Some(handle))
        }
        _ => {
            warn!("DISCORD_TOKEN or LEADERBOARD_CHANNEL_ID not set. Merge announcements are disabled.");
            (Notifier::disabled(), None)
        }
    };

    let interaction_verifier = match &config.discord_public_key {
        Some(key) => {
            let verifier = InteractionVerifier::from_hex(key)
                .map_err(|e| io::Error::other(format!("Invalid DISCORD_PUBLIC_KEY: {e}")))?;
            info!("Discord interactions endpoint enabled");
            Some(web::Data::new(verifier))
        }
        None => {
            warn!("DISCORD_PUBLIC_KEY not set. /discord/interactions is unavailable.");
            None
        }
    };

    let app_state = web::Data::new(AppState::new(AppComponents {
        ledger,
        webhook_secret: config.webhook_secret.clone(),
        resolver: Arc::new(resolver),
        label_policy: config.label_policy.clone(),
        notifier,
        leaderboard_size: config.leaderboard_size,
    }));

    info!(label_points = %config.label_policy, "Label policy loaded");

    let server_addr = format!("{}:{}", config.host, config.port);

    let result = HttpServer::new(move || {
        let interaction_verifier = interaction_verifier.clone();
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(|cfg| handlers::configure_routes(cfg, interaction_verifier))
    })
    .bind(&server_addr)?
    .run()
    .await;

    if let Some(handle) = chat_loop {
        handle.shutdown().await;
    }

    result
}
