//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

use crate::error::{AdmissionError, Result};
use crate::traits::store::{AdmissionStore, BatchCommit};
use crate::types::job::JobRecord;
use crate::types::record::AdmittedEntity;

/// A stored company row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCompany {
    pub entity: AdmittedEntity,
    /// Saved rows survive stale-replace.
    pub is_saved: bool,
}

#[derive(Default)]
struct State {
    jobs: HashMap<Uuid, JobRecord>,
    companies: HashMap<String, StoredCompany>,
}

/// In-memory job and company storage.
///
/// The whole state sits behind one lock so a commit is applied as a unit.
/// Not suitable for production as data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job the way the scraper trigger would before calling back.
    pub fn insert_job(&self, record: JobRecord) {
        self.write().jobs.insert(record.id, record);
    }

    pub fn job(&self, id: Uuid) -> Option<JobRecord> {
        self.read().jobs.get(&id).cloned()
    }

    pub fn company(&self, registry_id: &str) -> Option<StoredCompany> {
        self.read().companies.get(registry_id).cloned()
    }

    pub fn company_count(&self) -> usize {
        self.read().companies.len()
    }

    /// Insert a row directly, as if written by an earlier batch.
    pub fn insert_company(&self, entity: AdmittedEntity, is_saved: bool) {
        self.write()
            .companies
            .insert(entity.registry_id().to_string(), StoredCompany { entity, is_saved });
    }

    /// Flag a row as saved by a user. Returns false if it does not exist.
    pub fn mark_saved(&self, registry_id: &str) -> bool {
        match self.write().companies.get_mut(registry_id) {
            Some(row) => {
                row.is_saved = true;
                true
            }
            None => false,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AdmissionStore for MemoryStore {
    async fn commit(&self, batch: &BatchCommit) -> Result<()> {
        let mut state = self.write();

        if !state.jobs.contains_key(&batch.job.job_id) {
            return Err(AdmissionError::storage(format!(
                "scrape job {} not found",
                batch.job.job_id
            )));
        }

        let replaced = batch.replaced_sources();
        state
            .companies
            .retain(|_, row| row.is_saved || !replaced.contains(&row.entity.source));

        for entity in &batch.admitted {
            let key = entity.registry_id().to_string();
            let is_saved = state.companies.get(&key).is_some_and(|row| row.is_saved);
            state.companies.insert(
                key,
                StoredCompany {
                    entity: entity.clone(),
                    is_saved,
                },
            );
        }

        if let Some(job) = state.jobs.get_mut(&batch.job.job_id) {
            batch.job.apply_to(job);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::job::{JobStatus, JobUpdate};
    use crate::types::record::{EntityStatus, RawEntityRecord, RegistrySource};

    fn admitted(id: &str, source: RegistrySource) -> AdmittedEntity {
        AdmittedEntity {
            record: RawEntityRecord::new(format!("Company {}", id), id, source.as_str()),
            source,
            status: EntityStatus::Active,
            score: 50,
            domain_available: true,
        }
    }

    #[tokio::test]
    async fn test_commit_requires_job_row() {
        let store = MemoryStore::new();
        let batch = BatchCommit::job_only(JobUpdate::new(Uuid::new_v4(), JobStatus::Completed));
        assert!(matches!(store.commit(&batch).await, Err(AdmissionError::Storage(_))));
    }

    #[tokio::test]
    async fn test_commit_is_idempotent() {
        let store = MemoryStore::new();
        let job_id = Uuid::new_v4();
        store.insert_job(JobRecord::pending(job_id));

        let batch = BatchCommit {
            job: JobUpdate::new(job_id, JobStatus::Completed).with_counts(2, 2),
            admitted: vec![
                admitted("1", RegistrySource::Gleif),
                admitted("2", RegistrySource::Gleif),
            ],
        };
        store.commit(&batch).await.unwrap();
        store.commit(&batch).await.unwrap();

        assert_eq!(store.company_count(), 2);
        let job = store.job(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.records_processed, 2);
        assert!(job.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_stale_replace_keeps_saved_and_other_sources() {
        let store = MemoryStore::new();
        let job_id = Uuid::new_v4();
        store.insert_job(JobRecord::pending(job_id));
        store.insert_company(admitted("old", RegistrySource::Gleif), false);
        store.insert_company(admitted("kept", RegistrySource::Gleif), true);
        store.insert_company(admitted("asic", RegistrySource::Asic), false);

        let batch = BatchCommit {
            job: JobUpdate::new(job_id, JobStatus::Completed).with_counts(1, 1),
            admitted: vec![admitted("new", RegistrySource::Gleif)],
        };
        store.commit(&batch).await.unwrap();

        assert!(store.company("old").is_none());
        assert!(store.company("kept").unwrap().is_saved);
        assert!(store.company("asic").is_some());
        assert!(store.company("new").is_some());
    }
}
