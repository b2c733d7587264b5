//! Issue Resolver
//!
//! Looks up the labels of an issue in the configured GitHub repository.
//! Lookups never fail the caller: a timeout, transport error, non-200 status
//! or undecodable body all resolve to an empty label set, logged with enough
//! context (URL, status, issue number) to diagnose a misconfigured repo.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RepositoryTarget;
use crate::models::LabelSet;

const USER_AGENT: &str = concat!("mergeboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Unexpected status code {0}")]
    UnexpectedStatus(StatusCode),

    #[error("Invalid issue payload: {0}")]
    Decode(reqwest::Error),
}

impl ResolverError {
    fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus(status) => Some(status.as_u16()),
            _ => None,
        }
    }
}

/// Source of issue labels
#[async_trait]
pub trait IssueResolver: Send + Sync {
    /// Lower-cased labels of `issue_number`; empty when the lookup fails.
    async fn fetch_labels(&self, issue_number: u64) -> LabelSet;
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    #[serde(default)]
    labels: Vec<IssueLabel>,
}

#[derive(Debug, Deserialize)]
struct IssueLabel {
    name: String,
}

/// Resolver backed by the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubIssueResolver {
    client: Client,
    issues_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl GitHubIssueResolver {
    /// # Arguments
    /// * `api_url` - REST API base, e.g. `https://api.github.com`
    /// * `repository` - the single repository whose issues are looked up
    /// * `token` - optional token sent as a bearer credential
    /// * `timeout` - upper bound for the whole request
    pub fn new(
        api_url: &str,
        repository: &RepositoryTarget,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ResolverError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ResolverError::Client)?;

        Ok(Self {
            client,
            issues_url: format!(
                "{}/repos/{}/{}/issues",
                api_url.trim_end_matches('/'),
                repository.owner,
                repository.name
            ),
            token,
            timeout,
        })
    }

    pub fn issue_url(&self, issue_number: u64) -> String {
        format!("{}/{issue_number}", self.issues_url)
    }

    /// Fetch labels, surfacing the failure instead of swallowing it.
    pub async fn try_fetch_labels(&self, issue_number: u64) -> Result<LabelSet, ResolverError> {
        let mut request = self
            .client
            .get(self.issue_url(issue_number))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ResolverError::Timeout(self.timeout)
            } else {
                ResolverError::Request(e)
            }
        })?;

        if response.status() != StatusCode::OK {
            return Err(ResolverError::UnexpectedStatus(response.status()));
        }

        let issue: IssueResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ResolverError::Timeout(self.timeout)
            } else {
                ResolverError::Decode(e)
            }
        })?;

        Ok(issue
            .labels
            .into_iter()
            .map(|label| label.name.to_lowercase())
            .collect())
    }
}

#[async_trait]
impl IssueResolver for GitHubIssueResolver {
    async fn fetch_labels(&self, issue_number: u64) -> LabelSet {
        match self.try_fetch_labels(issue_number).await {
            Ok(labels) => {
                debug!(issue_number, ?labels, "Resolved issue labels");
                labels
            }
            Err(e) => {
                warn!(
                    issue_number,
                    url = %self.issue_url(issue_number),
                    status = e.status(),
                    error = %e,
                    "Failed to fetch issue labels; awarding no points"
                );
                LabelSet::new()
            }
        }
    }
}
