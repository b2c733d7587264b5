//! Webhook Ingest
//!
//! Turns an authenticated webhook delivery into a scoring decision:
//! parse the pull request event, find the linked issue, resolve its labels,
//! price them with the label policy, record the award and queue an
//! announcement. Every step degrades to "no points" instead of failing, so
//! the sender always gets its acknowledgement.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::models::{Announcement, MergeEvent, PullRequestEvent};
use crate::services::announcer::{AnnounceStatus, Notifier};
use crate::services::issue_reference::extract_issue_reference;
use crate::services::issue_resolver::IssueResolver;
use crate::services::label_policy::LabelPolicy;
use crate::services::ledger::{AwardOutcome, LedgerService};

/// `X-GitHub-Event` value of the only event type that is scored
pub const PULL_REQUEST_EVENT: &str = "pull_request";

/// Why a delivery was acknowledged without scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Some other event type, e.g. `ping` or `issues`
    NotPullRequestEvent(String),
    /// Body is not a pull request event
    Malformed(String),
    /// Pull request event other than a merge
    NotMerged,
}

/// Result of handling one delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringOutcome {
    Ignored(IgnoredReason),
    /// PR body has no closing keyword
    NoIssueReference { pr_number: u64 },
    /// Linked issue carries no scoring label, or its lookup failed
    NoPoints { pr_number: u64, issue_number: u64 },
    Awarded {
        pr_number: u64,
        issue_number: u64,
        points: u32,
        total: i64,
        announcement: AnnounceStatus,
    },
    /// This PR was scored by an earlier delivery
    AlreadyAwarded { pr_number: u64, issue_number: u64 },
    /// Points were due but could not be stored
    LedgerUnavailable { pr_number: u64, issue_number: u64 },
}

#[derive(Clone)]
pub struct WebhookIngest {
    resolver: Arc<dyn IssueResolver>,
    policy: LabelPolicy,
    ledger: LedgerService,
    notifier: Notifier,
}

impl WebhookIngest {
    pub fn new(
        resolver: Arc<dyn IssueResolver>,
        policy: LabelPolicy,
        ledger: LedgerService,
        notifier: Notifier,
    ) -> Self {
        Self {
            resolver,
            policy,
            ledger,
            notifier,
        }
    }

    /// Handle an already authenticated delivery.
    ///
    /// `event_kind` is the `X-GitHub-Event` header, when present.
    pub async fn handle_delivery(&self, event_kind: Option<&str>, body: &[u8]) -> ScoringOutcome {
        if let Some(kind) = event_kind {
            if kind != PULL_REQUEST_EVENT {
                debug!(event = kind, "Ignoring non pull request event");
                return ScoringOutcome::Ignored(IgnoredReason::NotPullRequestEvent(
                    kind.to_string(),
                ));
            }
        }

        let event: PullRequestEvent = match serde_json::from_slice(body) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "Ignoring payload that is not a pull request event");
                return ScoringOutcome::Ignored(IgnoredReason::Malformed(e.to_string()));
            }
        };

        match event.into_merge_event() {
            Some(merge) => self.score_merge(merge).await,
            None => {
                debug!("Ignoring pull request event that is not a merge");
                ScoringOutcome::Ignored(IgnoredReason::NotMerged)
            }
        }
    }

    pub async fn score_merge(&self, merge: MergeEvent) -> ScoringOutcome {
        let pr_number = merge.pr_number;

        let Some(issue_number) = extract_issue_reference(merge.body_text()) else {
            info!(
                pr_number,
                author = %merge.author,
                "Could not find a linked issue number (e.g. 'Fixes #123') in the PR body; no points assigned"
            );
            return ScoringOutcome::NoIssueReference { pr_number };
        };

        let labels = self.resolver.fetch_labels(issue_number).await;
        let points = self.policy.points_for(&labels);

        if points == 0 {
            info!(pr_number, issue_number, ?labels, "Linked issue has no scoring label");
            return ScoringOutcome::NoPoints {
                pr_number,
                issue_number,
            };
        }

        let total = match self
            .ledger
            .award_pull_request(pr_number, &merge.author, i64::from(points))
            .await
        {
            Ok(AwardOutcome::Awarded { total }) => total,
            Ok(AwardOutcome::AlreadyAwarded) => {
                return ScoringOutcome::AlreadyAwarded {
                    pr_number,
                    issue_number,
                };
            }
            Err(e) => {
                error!(
                    pr_number,
                    issue_number,
                    author = %merge.author,
                    points,
                    error = %e,
                    "Failed to record points"
                );
                return ScoringOutcome::LedgerUnavailable {
                    pr_number,
                    issue_number,
                };
            }
        };

        let announcement = self.notifier.announce(Announcement {
            title: merge.title,
            url: merge.url,
            contributor: merge.author,
            points,
        });

        ScoringOutcome::Awarded {
            pr_number,
            issue_number,
            points,
            total,
            announcement,
        }
    }
}
