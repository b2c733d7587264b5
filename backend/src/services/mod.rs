pub mod announcer;
pub mod commands;
pub mod crypto;
pub mod discord;
pub mod health;
pub mod ingest;
pub mod issue_reference;
pub mod issue_resolver;
pub mod label_policy;
pub mod leaderboard;
pub mod ledger;
pub mod signature;

pub use announcer::{AnnounceStatus, ChatLoop, ChatLoopHandle, Notifier};
pub use commands::{ChatCommand, CommandDispatcher};
pub use crypto::{InteractionError, InteractionVerifier};
pub use discord::{ChatError, ChatSink, DiscordClient};
pub use health::{DatabaseHealth, HealthService, HealthStatus, SystemHealth};
pub use ingest::{IgnoredReason, ScoringOutcome, WebhookIngest};
pub use issue_reference::extract_issue_reference;
pub use issue_resolver::{GitHubIssueResolver, IssueResolver, ResolverError};
pub use label_policy::{LabelPolicy, LabelPolicyError, LabelRule};
pub use leaderboard::{LeaderboardService, render_leaderboard};
pub use ledger::{AwardOutcome, LedgerError, LedgerService};
pub use signature::{SignatureError, WebhookSignatureVerifier};
