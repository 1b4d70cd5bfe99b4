//! Persistence contract for admitted entities and job status.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::job::JobUpdate;
use crate::types::record::{AdmittedEntity, RegistrySource};

/// Everything one callback writes, applied as a unit.
#[derive(Debug, Clone)]
pub struct BatchCommit {
    pub job: JobUpdate,
    pub admitted: Vec<AdmittedEntity>,
}

impl BatchCommit {
    pub fn job_only(job: JobUpdate) -> Self {
        Self {
            job,
            admitted: Vec::new(),
        }
    }

    /// Sources whose unsaved rows are replaced by this batch.
    pub fn replaced_sources(&self) -> BTreeSet<RegistrySource> {
        self.admitted.iter().map(|e| e.source).collect()
    }
}

/// Storage backend for the admission pipeline.
///
/// `commit` must, atomically:
/// 1. for every source in [`BatchCommit::replaced_sources`], delete stored
///    entities from that source that a user has not saved
/// 2. upsert each admitted entity keyed by `registry_id`
/// 3. write the job update
///
/// A missing job row is an error.
#[async_trait]
pub trait AdmissionStore: Send + Sync {
    async fn commit(&self, batch: &BatchCommit) -> Result<()>;
}
