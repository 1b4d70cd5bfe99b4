//! Scrape job records and the single update written per callback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a scrape job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

/// A scrape job as stored by the persistence adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    pub id: Uuid,
    pub status: JobStatus,
    pub records_fetched: i32,
    pub records_processed: i32,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn pending(id: Uuid) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            records_fetched: 0,
            records_processed: 0,
            error_message: None,
            completed_at: None,
        }
    }
}

/// The final job state written once at the end of a callback.
#[derive(Debug, Clone, PartialEq)]
pub struct JobUpdate {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub records_fetched: i32,
    pub records_processed: i32,
    pub error_message: Option<String>,
    /// Set only when `status` is terminal.
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    pub fn new(job_id: Uuid, status: JobStatus) -> Self {
        Self {
            job_id,
            status,
            records_fetched: 0,
            records_processed: 0,
            error_message: None,
            completed_at: status.is_terminal().then(Utc::now),
        }
    }

    pub fn with_counts(mut self, fetched: usize, processed: usize) -> Self {
        self.records_fetched = i32::try_from(fetched).unwrap_or(i32::MAX);
        self.records_processed = i32::try_from(processed).unwrap_or(i32::MAX);
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Apply this update to a stored record.
    pub fn apply_to(&self, record: &mut JobRecord) {
        record.status = self.status;
        record.records_fetched = self.records_fetched;
        record.records_processed = self.records_processed;
        record.error_message = self.error_message.clone();
        if self.completed_at.is_some() {
            record.completed_at = self.completed_at;
        }
    }
}
