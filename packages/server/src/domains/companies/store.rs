//! Postgres-backed admission store.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use admission::{AdmissionError, AdmissionStore, BatchCommit};

use super::models::{Company, ScrapeJob};

/// Writes each callback's results in one transaction.
#[derive(Clone)]
pub struct PgAdmissionStore {
    pool: PgPool,
}

impl PgAdmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn commit_in_tx(&self, batch: &BatchCommit) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        for source in batch.replaced_sources() {
            let removed = Company::delete_unsaved_for_source(source, &mut *tx).await?;
            debug!(source = %source, removed, "Replaced unsaved companies");
        }

        for entity in &batch.admitted {
            Company::upsert(entity, &mut *tx).await?;
        }

        if !ScrapeJob::apply_update(&batch.job, &mut *tx).await? {
            // Dropping the transaction rolls back the entity writes
            return Err(anyhow!("scrape job {} not found", batch.job.job_id));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl AdmissionStore for PgAdmissionStore {
    async fn commit(&self, batch: &BatchCommit) -> admission::Result<()> {
        self.commit_in_tx(batch)
            .await
            .map_err(AdmissionError::storage)
    }
}
