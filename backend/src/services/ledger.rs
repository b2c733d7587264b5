//! Score Ledger
//!
//! Durable contributor → points aggregate. Every write goes through
//! [`LedgerService::accumulate`] or [`LedgerService::award_pull_request`],
//! both of which add to the stored total with a single upsert so concurrent
//! deliveries for the same contributor never lose an update.

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::info;

use crate::models::{LeaderboardEntry, ScoreRecord};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Points to add must be positive, got {0}")]
    InvalidDelta(i64),

    #[error("Leaderboard size must be positive")]
    InvalidLimit,

    #[error("Pull request number {0} is out of range")]
    InvalidPullRequest(u64),
}

impl From<sqlx::migrate::MigrateError> for LedgerError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Database(err.into())
    }
}

/// Result of scoring a merged pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    /// Points were added; `total` is the contributor's new score
    Awarded { total: i64 },
    /// The pull request was scored by an earlier delivery
    AlreadyAwarded,
}

#[derive(Debug, Clone)]
pub struct LedgerService {
    pool: SqlitePool,
}

impl LedgerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the SQLite database at `database_url` and
    /// bring its schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, LedgerError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let ledger = Self::new(pool);
        ledger.migrate().await?;
        Ok(ledger)
    }

    pub async fn migrate(&self) -> Result<(), LedgerError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Add `delta` points to `identity`, creating the record on first use.
    ///
    /// Returns the contributor's new total.
    pub async fn accumulate(&self, identity: &str, delta: i64) -> Result<i64, LedgerError> {
        if delta <= 0 {
            return Err(LedgerError::InvalidDelta(delta));
        }

        let mut conn = self.pool.acquire().await?;
        let total = upsert_points(&mut *conn, identity, delta).await?;

        info!(identity, delta, total, "Accumulated points");
        Ok(total)
    }

    /// Score a merged pull request exactly once.
    ///
    /// The PR marker and the score update commit together, so a redelivered
    /// webhook for the same PR returns [`AwardOutcome::AlreadyAwarded`]
    /// without touching the score.
    pub async fn award_pull_request(
        &self,
        pr_number: u64,
        identity: &str,
        delta: i64,
    ) -> Result<AwardOutcome, LedgerError> {
        if delta <= 0 {
            return Err(LedgerError::InvalidDelta(delta));
        }
        let pr_key =
            i64::try_from(pr_number).map_err(|_| LedgerError::InvalidPullRequest(pr_number))?;

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO awarded_pull_requests (pr_number, github_username, points, awarded_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (pr_number) DO NOTHING
            "#,
        )
        .bind(pr_key)
        .bind(identity)
        .bind(delta)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            info!(pr_number, identity, "Pull request already awarded; skipping");
            return Ok(AwardOutcome::AlreadyAwarded);
        }

        let total = upsert_points(&mut *tx, identity, delta).await?;
        tx.commit().await?;

        info!(pr_number, identity, delta, total, "Awarded points for merged pull request");
        Ok(AwardOutcome::Awarded { total })
    }

    /// Highest scores first; ties ordered by username so the ranking is stable.
    pub async fn top_n(&self, n: u32) -> Result<Vec<LeaderboardEntry>, LedgerError> {
        if n == 0 {
            return Err(LedgerError::InvalidLimit);
        }

        let rows = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT github_username, points
            FROM scores
            ORDER BY points DESC, github_username ASC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(n))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get(&self, identity: &str) -> Result<Option<ScoreRecord>, LedgerError> {
        let record = sqlx::query_as::<_, ScoreRecord>(
            r#"
            SELECT github_username, points, updated_at
            FROM scores
            WHERE github_username = ?1
            "#,
        )
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

async fn upsert_points(
    conn: &mut SqliteConnection,
    identity: &str,
    delta: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO scores (github_username, points, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (github_username)
        DO UPDATE SET points = scores.points + excluded.points, updated_at = excluded.updated_at
        RETURNING points
        "#,
    )
    .bind(identity)
    .bind(delta)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
}
