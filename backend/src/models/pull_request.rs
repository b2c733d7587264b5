//! Pull request webhook payload
//!
//! Only the fields the scoring pipeline reads are modelled; GitHub sends many
//! more and serde ignores them.

use serde::{Deserialize, Serialize};

/// `action` of a `pull_request` webhook delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    Opened,
    Closed,
    #[serde(other)]
    Other,
}

/// Body of a `pull_request` webhook delivery
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub pull_request: PullRequestPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    #[serde(default)]
    pub merged: bool,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
    pub user: GitHubUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// A pull request that was closed by merging it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeEvent {
    pub author: String,
    pub pr_number: u64,
    pub title: String,
    pub url: String,
    pub body: Option<String>,
}

impl PullRequestEvent {
    /// Returns the merge, or `None` for any other kind of pull request event.
    pub fn into_merge_event(self) -> Option<MergeEvent> {
        if self.action != PullRequestAction::Closed || !self.pull_request.merged {
            return None;
        }

        let pr = self.pull_request;
        Some(MergeEvent {
            author: pr.user.login,
            pr_number: pr.number,
            title: pr.title,
            url: pr.html_url,
            body: pr.body,
        })
    }
}

impl MergeEvent {
    /// PR description, empty when GitHub sends `null`
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}
