//! Health Service
//!
//! Reports whether the score ledger is reachable.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub service: &'static str,
    pub database: DatabaseHealth,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: HealthStatus,
    /// Latency of a trivial query in milliseconds
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HealthService {
    pool: SqlitePool,
}

impl HealthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn check(&self) -> SystemHealth {
        let database = self.check_database().await;
        SystemHealth {
            status: database.status,
            service: "mergeboard",
            database,
            checked_at: Utc::now(),
        }
    }

    async fn check_database(&self) -> DatabaseHealth {
        let started = Instant::now();
        match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => DatabaseHealth {
                status: HealthStatus::Healthy,
                latency_ms: Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
                error: None,
            },
            Err(e) => DatabaseHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}
