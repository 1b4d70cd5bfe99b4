use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use admission::{JobStatus, JobUpdate};

/// ScrapeJob - one registry scrape, created by the trigger and finalized by its callback
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScrapeJob {
    pub id: Uuid,
    pub registry_source: Option<String>,
    pub status: String, // 'pending', 'running', 'completed', 'failed'
    pub records_fetched: i32,
    pub records_processed: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScrapeJob {
    pub fn job_status(&self) -> Result<JobStatus> {
        self.status.parse().map_err(anyhow::Error::msg)
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl ScrapeJob {
    /// Create a pending job (what the scrape trigger does before the scraper runs)
    pub async fn create(id: Uuid, registry_source: Option<&str>, pool: &PgPool) -> Result<Self> {
        let job = sqlx::query_as::<_, ScrapeJob>(
            r#"
            INSERT INTO scrape_jobs (id, registry_source, status)
            VALUES ($1, $2, 'pending')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(registry_source)
        .fetch_one(pool)
        .await?;
        Ok(job)
    }

    /// Find job by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        let job = sqlx::query_as::<_, ScrapeJob>("SELECT * FROM scrape_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(job)
    }

    /// Write the final state of a callback. Returns false if the job does not exist.
    ///
    /// `completed_at` is only ever set, never cleared.
    pub async fn apply_update(update: &JobUpdate, conn: &mut PgConnection) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE scrape_jobs
            SET status = $2,
                records_fetched = $3,
                records_processed = $4,
                error_message = $5,
                completed_at = COALESCE($6, completed_at),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(update.job_id)
        .bind(update.status.as_str())
        .bind(update.records_fetched)
        .bind(update.records_processed)
        .bind(update.error_message.as_deref())
        .bind(update.completed_at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
