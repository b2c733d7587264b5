//! Chat commands
//!
//! Commands are Discord slash commands. They are registered with the
//! application at startup and arrive through the interactions endpoint,
//! where the command name resolves to a [`ChatCommand`] answered by the
//! [`CommandDispatcher`].

use tracing::debug;

use crate::models::{ApplicationCommand, ChatMessage};
use crate::services::leaderboard::LeaderboardService;
use crate::services::ledger::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Leaderboard,
}

impl ChatCommand {
    pub const ALL: [ChatCommand; 1] = [ChatCommand::Leaderboard];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Leaderboard => "leaderboard",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Leaderboard => "Show the top contributors",
        }
    }

    /// Look a command up by its registered name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Registration payload for this command
    pub fn definition(&self) -> ApplicationCommand {
        ApplicationCommand::chat_input(self.name(), self.description())
    }

    /// Every command, as registered with Discord
    pub fn definitions() -> Vec<ApplicationCommand> {
        Self::ALL.iter().map(ChatCommand::definition).collect()
    }
}

#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    leaderboard: LeaderboardService,
}

impl CommandDispatcher {
    pub fn new(leaderboard: LeaderboardService) -> Self {
        Self { leaderboard }
    }

    pub async fn dispatch(&self, command: ChatCommand) -> Result<ChatMessage, LedgerError> {
        debug!(command = command.name(), "Dispatching chat command");
        match command {
            ChatCommand::Leaderboard => self.leaderboard.render().await,
        }
    }
}
