//! Leaderboard Query
//!
//! Read-only view of the ledger rendered for chat.

use crate::models::{ChatMessage, COLOR_GOLD, Embed, LeaderboardEntry};
use crate::services::ledger::{LedgerError, LedgerService};

/// Sent instead of an empty embed when nobody has scored yet
pub const EMPTY_LEADERBOARD_MESSAGE: &str = "The leaderboard is currently empty!";

const LEADERBOARD_TITLE: &str = "🏆 Open Source Event Leaderboard 🏆";

#[derive(Debug, Clone)]
pub struct LeaderboardService {
    ledger: LedgerService,
    size: u32,
}

impl LeaderboardService {
    pub fn new(ledger: LedgerService, size: u32) -> Self {
        Self { ledger, size }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub async fn top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, LedgerError> {
        self.ledger.top_n(limit).await
    }

    /// Top entries formatted as a chat message
    pub async fn render(&self) -> Result<ChatMessage, LedgerError> {
        let entries = self.ledger.top_n(self.size).await?;
        Ok(render_leaderboard(&entries))
    }
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> ChatMessage {
    if entries.is_empty() {
        return ChatMessage::text(EMPTY_LEADERBOARD_MESSAGE);
    }

    let description: String = entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("**{}.** {} - `{} points`\n", i + 1, e.github_username, e.points))
        .collect();

    ChatMessage::embed(Embed {
        title: LEADERBOARD_TITLE.to_string(),
        description: Some(description),
        color: COLOR_GOLD,
        fields: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, points: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            github_username: name.to_string(),
            points,
        }
    }

    #[test]
    fn empty_leaderboard_is_plain_text() {
        let message = render_leaderboard(&[]);
        assert_eq!(message.content.as_deref(), Some(EMPTY_LEADERBOARD_MESSAGE));
        assert!(message.embeds.is_empty());
    }

    #[test]
    fn ranks_entries_in_order() {
        let message = render_leaderboard(&[entry("alice", 30), entry("bob", 10)]);
        assert!(message.content.is_none());
        let embed = &message.embeds[0];
        assert_eq!(embed.title, LEADERBOARD_TITLE);
        assert_eq!(embed.color, COLOR_GOLD);
        assert_eq!(
            embed.description.as_deref(),
            Some("**1.** alice - `30 points`\n**2.** bob - `10 points`\n")
        );
    }
}
