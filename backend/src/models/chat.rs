//! Chat message types
//!
//! Serialize to the JSON shape Discord accepts for both
//! `POST /channels/{id}/messages` and interaction responses.

use serde::{Deserialize, Serialize};

/// Discord's `Color.gold()`
pub const COLOR_GOLD: u32 = 0xF1C40F;

/// Discord's `Color.green()`
pub const COLOR_GREEN: u32 = 0x2ECC71;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl ChatMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

/// `CHAT_INPUT`: a slash command typed in the message box
pub const APPLICATION_COMMAND_CHAT_INPUT: u8 = 1;

/// Slash command definition sent to Discord's command registration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

impl ApplicationCommand {
    pub fn chat_input(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: APPLICATION_COMMAND_CHAT_INPUT,
        }
    }
}

/// Summary of an awarded merge, queued for the announcement channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub url: String,
    pub contributor: String,
    pub points: u32,
}

impl Announcement {
    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::embed(Embed {
            title: "🎉 New Contribution Merged! 🎉".to_string(),
            description: Some(format!("**[{}]({})**", self.title, self.url)),
            color: COLOR_GREEN,
            fields: vec![
                EmbedField {
                    name: "Contributor".to_string(),
                    value: format!("**{}**", self.contributor),
                    inline: true,
                },
                EmbedField {
                    name: "Points Awarded".to_string(),
                    value: format!("**{}**", self.points),
                    inline: true,
                },
            ],
        })
    }
}
