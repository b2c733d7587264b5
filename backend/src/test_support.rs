//! Shared test fixtures

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;

use crate::models::LabelSet;
use crate::services::{IssueResolver, LabelPolicy, LedgerService, Notifier};
use crate::{AppComponents, AppState};

pub const TEST_SECRET: &str = "s3cr3t";

/// Resolver returning fixed labels per issue and recording lookups
#[derive(Default)]
pub struct FakeResolver {
    labels: HashMap<u64, Vec<&'static str>>,
    calls: Mutex<Vec<u64>>,
}

impl FakeResolver {
    pub fn with(issue: u64, labels: &[&'static str]) -> Self {
        Self::with_issues(&[(issue, labels)])
    }

    pub fn with_issues(issues: &[(u64, &[&'static str])]) -> Self {
        Self {
            labels: issues
                .iter()
                .map(|(issue, labels)| (*issue, labels.to_vec()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<u64> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueResolver for FakeResolver {
    async fn fetch_labels(&self, issue_number: u64) -> LabelSet {
        self.calls.lock().unwrap().push(issue_number);
        self.labels
            .get(&issue_number)
            .map(|l| l.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }
}

/// In-memory ledger; a single long-lived connection keeps the database alive
pub async fn memory_ledger() -> LedgerService {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    let ledger = LedgerService::new(pool);
    ledger.migrate().await.expect("Failed to run migrations");
    ledger
}

pub fn app_state(
    ledger: LedgerService,
    resolver: Arc<dyn IssueResolver>,
    notifier: Notifier,
) -> web::Data<AppState> {
    web::Data::new(AppState::new(AppComponents {
        ledger,
        webhook_secret: TEST_SECRET.to_string(),
        resolver,
        label_policy: LabelPolicy::default(),
        notifier,
        leaderboard_size: 10,
    }))
}
