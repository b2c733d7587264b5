//! Score ledger records and leaderboard types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;

/// Lower-cased label names of one issue
pub type LabelSet = BTreeSet<String>;

/// Cumulative points of one contributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ScoreRecord {
    pub github_username: String,
    pub points: i64,
    pub updated_at: DateTime<Utc>,
}

/// One row of the leaderboard, ranked from 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub github_username: String,
    pub points: i64,
}

/// Query parameters for GET /v1/leaderboard
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<u32>,
}

/// Response for GET /v1/leaderboard
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<RankedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    pub github_username: String,
    pub points: i64,
}

impl LeaderboardResponse {
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .enumerate()
                .map(|(i, e)| RankedEntry {
                    rank: i + 1,
                    github_username: e.github_username,
                    points: e.points,
                })
                .collect(),
        }
    }
}
