use std::env;
use std::time::Duration;

use crate::services::label_policy::{LabelPolicy, LabelPolicyError};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL for the score ledger
    pub database_url: String,
    /// Maximum database connections in pool
    pub database_max_connections: u32,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Shared secret configured on the GitHub webhook
    pub webhook_secret: String,
    /// The single repository whose issues are resolved
    pub repository: RepositoryTarget,
    /// GitHub REST API base URL
    pub github_api_url: String,
    /// Optional token for private repositories and higher rate limits
    pub github_token: Option<String>,
    /// Timeout for issue lookups
    pub github_timeout: Duration,
    /// Discord bot token used to post announcements
    pub discord_token: Option<String>,
    /// Channel that receives merge announcements
    pub announcement_channel_id: Option<u64>,
    /// Hex-encoded application public key for the interactions endpoint
    pub discord_public_key: Option<String>,
    /// Application whose slash commands are registered at startup
    pub discord_application_id: Option<u64>,
    /// Discord REST API base URL
    pub discord_api_url: String,
    /// Label to points rules, in precedence order
    pub label_policy: LabelPolicy,
    /// Number of rows rendered by the leaderboard command
    pub leaderboard_size: u32,
    /// Capacity of the announcement queue
    pub announcement_queue_capacity: usize,
}

/// `owner/name` of the repository the webhook is installed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub owner: String,
    pub name: String,
}

impl std::str::FromStr for RepositoryTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidValue("GITHUB_REPO")),
        }
    }
}

impl std::fmt::Display for RepositoryTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://scores.db".to_string());

        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 5)?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = parse_or("PORT", 5000)?;

        let webhook_secret = required("GITHUB_WEBHOOK_SECRET")?;

        let repository = required("GITHUB_REPO")?.parse()?;

        let github_api_url =
            env::var("GITHUB_API_URL").unwrap_or_else(|_| "https://api.github.com".to_string());

        let github_timeout = Duration::from_secs(parse_or("GITHUB_TIMEOUT_SECS", 10)?);

        let announcement_channel_id = parse_optional("LEADERBOARD_CHANNEL_ID")?;

        let discord_application_id = parse_optional("DISCORD_APPLICATION_ID")?;

        let discord_api_url = env::var("DISCORD_API_URL")
            .unwrap_or_else(|_| "https://discord.com/api/v10".to_string());

        let label_policy = match optional("LABEL_POINTS") {
            Some(raw) => raw.parse().map_err(ConfigError::LabelPolicy)?,
            None => LabelPolicy::default(),
        };

        let leaderboard_size = parse_or("LEADERBOARD_SIZE", 10)?;
        if leaderboard_size == 0 {
            return Err(ConfigError::InvalidValue("LEADERBOARD_SIZE"));
        }

        let announcement_queue_capacity = parse_or("ANNOUNCEMENT_QUEUE_CAPACITY", 64)?;
        if announcement_queue_capacity == 0 {
            return Err(ConfigError::InvalidValue("ANNOUNCEMENT_QUEUE_CAPACITY"));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            webhook_secret,
            repository,
            github_api_url,
            github_token: optional("GITHUB_TOKEN"),
            github_timeout,
            discord_token: optional("DISCORD_TOKEN"),
            announcement_channel_id,
            discord_public_key: optional("DISCORD_PUBLIC_KEY"),
            discord_application_id,
            discord_api_url,
            label_policy,
            leaderboard_size,
            announcement_queue_capacity,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingEnvVar(name))
}

/// Unset and blank variables are treated the same.
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue(name)),
        None => Ok(default),
    }
}

fn parse_optional<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    optional(name)
        .map(|raw| raw.parse().map_err(|_| ConfigError::InvalidValue(name)))
        .transpose()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
    #[error("Invalid LABEL_POINTS: {0}")]
    LabelPolicy(#[from] LabelPolicyError),
}
