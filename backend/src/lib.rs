//! Mergeboard - points for merged pull requests
//!
//! Receives GitHub pull request webhooks, awards points to the author of
//! every merged pull request that closes a labelled issue, and publishes the
//! standings to Discord.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, ConfigError, RepositoryTarget};
pub use error::AppError;

pub use models::{Announcement, ChatMessage, LeaderboardEntry, MergeEvent, ScoreRecord};

pub use services::{
    AnnounceStatus, ChatCommand, ChatLoop, CommandDispatcher, DiscordClient, GitHubIssueResolver,
    InteractionVerifier, IssueResolver, LabelPolicy, LeaderboardService, LedgerService, Notifier,
    ScoringOutcome, WebhookIngest, WebhookSignatureVerifier,
};

/// Application state shared across handlers
pub struct AppState {
    pub ledger: LedgerService,
    pub webhook_verifier: WebhookSignatureVerifier,
    pub ingest: WebhookIngest,
    pub commands: CommandDispatcher,
    pub leaderboard: LeaderboardService,
}

/// Components that vary between deployments and tests
pub struct AppComponents {
    pub ledger: LedgerService,
    pub webhook_secret: String,
    pub resolver: Arc<dyn IssueResolver>,
    pub label_policy: LabelPolicy,
    pub notifier: Notifier,
    pub leaderboard_size: u32,
}

impl AppState {
    pub fn new(components: AppComponents) -> Self {
        let AppComponents {
            ledger,
            webhook_secret,
            resolver,
            label_policy,
            notifier,
            leaderboard_size,
        } = components;

        let leaderboard = LeaderboardService::new(ledger.clone(), leaderboard_size);
        Self {
            webhook_verifier: WebhookSignatureVerifier::new(webhook_secret),
            ingest: WebhookIngest::new(resolver, label_policy, ledger.clone(), notifier),
            commands: CommandDispatcher::new(leaderboard.clone()),
            leaderboard,
            ledger,
        }
    }
}
