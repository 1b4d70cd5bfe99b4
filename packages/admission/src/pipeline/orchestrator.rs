//! Admission orchestrator.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clients::RateLimitedClassifier;
use crate::error::{AdmissionError, Result, ValidationError};
use crate::normalize::normalize;
use crate::scoring;
use crate::stages::{
    AdverseMediaAnalyzer, DomainAvailabilityChecker, LegalStatusVerifier, RejectReason,
    StageOutcome, WebsitePresenceProber,
};
use crate::traits::{
    classifier::ZeroShotClassifier, news::NewsSource, prober::SiteProber,
    registrar::DomainRegistrar, registry::CompanyRegistry, searcher::WebSearcher,
    store::{AdmissionStore, BatchCommit},
};
use crate::types::{
    callback::CallbackPayload,
    config::AdmissionConfig,
    job::{JobStatus, JobUpdate},
    record::{AdmittedEntity, EntityStatus, RawEntityRecord, RegistrySource},
};

/// External collaborators available to the pipeline.
///
/// Only the site prober is mandatory. A missing collaborator makes its stage
/// fall back to its unverifiable default.
#[derive(Clone)]
pub struct Collaborators {
    pub prober: Arc<dyn SiteProber>,
    pub searcher: Option<Arc<dyn WebSearcher>>,
    pub registrar: Option<Arc<dyn DomainRegistrar>>,
    pub registry: Option<Arc<dyn CompanyRegistry>>,
    pub news: Option<Arc<dyn NewsSource>>,
    pub classifier: Option<Arc<dyn ZeroShotClassifier>>,
}

impl Collaborators {
    pub fn new(prober: Arc<dyn SiteProber>) -> Self {
        Self {
            prober,
            searcher: None,
            registrar: None,
            registry: None,
            news: None,
            classifier: None,
        }
    }

    pub fn with_searcher(mut self, searcher: Arc<dyn WebSearcher>) -> Self {
        self.searcher = Some(searcher);
        self
    }

    pub fn with_registrar(mut self, registrar: Arc<dyn DomainRegistrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn CompanyRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_news(mut self, news: Arc<dyn NewsSource>) -> Self {
        self.news = Some(news);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }
}

/// Per-entity progress through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    NameValidated,
    WebsiteChecked,
    StatusChecked,
    DomainChecked,
    SentimentChecked,
    Scored,
    Admitted,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::NameValidated => "name_validated",
            Stage::WebsiteChecked => "website_checked",
            Stage::StatusChecked => "status_checked",
            Stage::DomainChecked => "domain_checked",
            Stage::SentimentChecked => "sentiment_checked",
            Stage::Scored => "scored",
            Stage::Admitted => "admitted",
        }
    }
}

/// Final outcome for one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityDecision {
    Admitted(AdmittedEntity),
    Rejected {
        registry_id: String,
        reason: RejectReason,
    },
}

impl EntityDecision {
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            EntityDecision::Admitted(_) => None,
            EntityDecision::Rejected { reason, .. } => Some(*reason),
        }
    }
}

/// Summary of one processed callback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub records_fetched: usize,
    pub records_processed: usize,
    pub rejections: BTreeMap<RejectReason, usize>,
    pub error_message: Option<String>,
    #[serde(skip)]
    pub admitted: Vec<AdmittedEntity>,
}

impl BatchReport {
    fn without_entities(update: &JobUpdate, fetched: usize) -> Self {
        Self {
            job_id: update.job_id,
            status: update.status,
            records_fetched: fetched,
            records_processed: 0,
            rejections: BTreeMap::new(),
            error_message: update.error_message.clone(),
            admitted: Vec::new(),
        }
    }
}

/// Runs callbacks through the filter stages and commits the result.
pub struct Admission {
    config: Arc<AdmissionConfig>,
    website: WebsitePresenceProber,
    legal: LegalStatusVerifier,
    domain: DomainAvailabilityChecker,
    sentiment: AdverseMediaAnalyzer,
    store: Arc<dyn AdmissionStore>,
    score_date: Option<NaiveDate>,
}

impl Admission {
    /// Wire the stages. Classification calls are spaced by
    /// `config.classify_interval` across every entity in flight.
    pub fn new(
        config: AdmissionConfig,
        collaborators: Collaborators,
        store: Arc<dyn AdmissionStore>,
    ) -> Self {
        let config = Arc::new(config);
        let interval = config.classify_interval;
        let classifier = collaborators.classifier.map(|c| {
            Arc::new(RateLimitedClassifier::new(c, interval)) as Arc<dyn ZeroShotClassifier>
        });

        Self {
            website: WebsitePresenceProber::new(
                collaborators.prober,
                collaborators.searcher,
                config.clone(),
            ),
            legal: LegalStatusVerifier::new(collaborators.registry),
            domain: DomainAvailabilityChecker::new(collaborators.registrar),
            sentiment: AdverseMediaAnalyzer::new(collaborators.news, classifier, config.clone()),
            config,
            store,
            score_date: None,
        }
    }

    /// Score against a fixed date instead of today.
    pub fn with_score_date(mut self, date: NaiveDate) -> Self {
        self.score_date = Some(date);
        self
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Run one entity through every stage, stopping at the first rejection.
    pub async fn evaluate(&self, record: &RawEntityRecord) -> EntityDecision {
        let registry_id = record.registry_id.as_str();
        trace_stage(registry_id, Stage::Received);

        let source = match record.registry_source.parse::<RegistrySource>() {
            Ok(source) => source,
            Err(_) => return rejected(record, Stage::Received, RejectReason::InvalidSource),
        };
        let name = normalize(&record.legal_name);
        trace_stage(registry_id, Stage::NameValidated);

        let probe = self.website.probe(&name).await;
        if let StageOutcome::Reject(reason) = WebsitePresenceProber::gate(&probe) {
            return rejected(record, Stage::NameValidated, reason);
        }
        trace_stage(registry_id, Stage::WebsiteChecked);

        let legal = self.legal.verify(&record.legal_name).await;
        if let StageOutcome::Reject(reason) = LegalStatusVerifier::gate(&legal) {
            return rejected(record, Stage::WebsiteChecked, reason);
        }
        if let Some(note) = &legal.note {
            debug!(registry_id, note = %note, "Legal status unverified");
        }
        trace_stage(registry_id, Stage::StatusChecked);

        let domain = name.registrable_domain();
        let availability = self.domain.check(domain.as_deref()).await;
        if let StageOutcome::Reject(reason) = DomainAvailabilityChecker::gate(availability) {
            return rejected(record, Stage::StatusChecked, reason);
        }
        trace_stage(registry_id, Stage::DomainChecked);

        let report = self.sentiment.analyze(&record.legal_name).await;
        if let StageOutcome::Reject(reason) = AdverseMediaAnalyzer::gate(&report) {
            return rejected(record, Stage::DomainChecked, reason);
        }
        trace_stage(registry_id, Stage::SentimentChecked);

        let status = EntityStatus::normalize(record.status.as_deref());
        let as_of = self.score_date.unwrap_or_else(|| Utc::now().date_naive());
        let score = scoring::score(record, status, as_of);
        trace_stage(registry_id, Stage::Scored);

        info!(registry_id, score, stage = Stage::Admitted.as_str(), "Entity admitted");
        EntityDecision::Admitted(AdmittedEntity {
            record: record.clone(),
            source,
            status,
            score,
            domain_available: true,
        })
    }

    /// Evaluate a batch with at most `max_concurrency` entities in flight.
    /// Decisions come back in input order.
    pub async fn evaluate_batch(&self, records: &[RawEntityRecord]) -> Vec<EntityDecision> {
        let pending: Vec<_> = records.iter().map(|record| self.evaluate(record)).collect();
        stream::iter(pending)
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await
    }

    /// Process one scraper callback end to end and write the job update once.
    ///
    /// Exceeding the batch deadline or cancelling aborts every in-flight
    /// entity and marks the job failed without persisting any entity.
    pub async fn process_callback(
        &self,
        payload: CallbackPayload,
        cancel: CancellationToken,
    ) -> Result<BatchReport> {
        payload.validate()?;
        let job_id = payload.job_id;
        let fetched = payload.entities().len();
        if fetched > self.config.max_batch_size {
            return Err(ValidationError::TooManyEntities {
                count: fetched,
                max: self.config.max_batch_size,
            }
            .into());
        }

        info!(
            job_id = %job_id,
            status = %payload.status,
            entities = fetched,
            "Processing scrape callback"
        );

        if payload.status == JobStatus::Failed {
            let message = payload
                .error_message
                .clone()
                .unwrap_or_else(|| "scrape failed".to_string());
            let update = JobUpdate::new(job_id, JobStatus::Failed)
                .with_counts(fetched, 0)
                .with_error(message);
            self.store.commit(&BatchCommit::job_only(update.clone())).await?;
            warn!(job_id = %job_id, "Scraper reported failure, entities skipped");
            return Ok(BatchReport::without_entities(&update, fetched));
        }

        let deadline = self.config.batch_deadline;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AdmissionError::Cancelled),
            result = tokio::time::timeout(deadline, self.evaluate_batch(payload.entities())) => {
                result.map_err(|_| AdmissionError::DeadlineExceeded { secs: deadline.as_secs() })
            }
        };

        let decisions = match outcome {
            Ok(decisions) => decisions,
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Batch aborted, marking job failed");
                let update = JobUpdate::new(job_id, JobStatus::Failed)
                    .with_counts(fetched, 0)
                    .with_error(e.to_string());
                self.store.commit(&BatchCommit::job_only(update.clone())).await?;
                return Ok(BatchReport::without_entities(&update, fetched));
            }
        };

        let mut rejections = BTreeMap::new();
        let mut admitted = Vec::new();
        for decision in decisions {
            match decision {
                EntityDecision::Admitted(entity) => admitted.push(entity),
                EntityDecision::Rejected { reason, .. } => {
                    *rejections.entry(reason).or_insert(0) += 1;
                }
            }
        }

        let update = JobUpdate::new(job_id, payload.status).with_counts(fetched, admitted.len());
        let commit = BatchCommit {
            job: update,
            admitted,
        };
        self.store.commit(&commit).await?;

        info!(
            job_id = %job_id,
            fetched,
            processed = commit.admitted.len(),
            rejections = ?rejections,
            "Callback committed"
        );

        Ok(BatchReport {
            job_id,
            status: commit.job.status,
            records_fetched: fetched,
            records_processed: commit.admitted.len(),
            rejections,
            error_message: None,
            admitted: commit.admitted,
        })
    }
}

fn trace_stage(registry_id: &str, stage: Stage) {
    debug!(registry_id, stage = stage.as_str(), "Stage passed");
}

fn rejected(record: &RawEntityRecord, after: Stage, reason: RejectReason) -> EntityDecision {
    info!(
        registry_id = %record.registry_id,
        after = after.as_str(),
        reason = %reason,
        "Entity rejected"
    );
    EntityDecision::Rejected {
        registry_id: record.registry_id.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::testing::{
        MockClassifier, MockNewsSource, MockRegistrar, MockRegistry, MockSiteProber,
    };
    use crate::types::job::JobRecord;
    use std::time::Duration;

    fn admission(store: Arc<MemoryStore>) -> Admission {
        let collaborators = Collaborators::new(Arc::new(MockSiteProber::new()))
            .with_registrar(Arc::new(MockRegistrar::always(true)))
            .with_registry(Arc::new(MockRegistry::active()))
            .with_news(Arc::new(MockNewsSource::new()))
            .with_classifier(Arc::new(MockClassifier::new()));
        Admission::new(
            AdmissionConfig::default().with_classify_interval(Duration::ZERO),
            collaborators,
            store,
        )
    }

    #[tokio::test]
    async fn test_invalid_source_rejected_before_any_call() {
        let prober = Arc::new(MockSiteProber::new());
        let admission = Admission::new(
            AdmissionConfig::default(),
            Collaborators::new(prober.clone()),
            Arc::new(MemoryStore::new()),
        );

        let record = RawEntityRecord::new("Acme", "1", "OPENCORPORATES");
        let decision = admission.evaluate(&record).await;
        assert_eq!(decision.reason(), Some(RejectReason::InvalidSource));
        assert!(prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order() {
        let admission = admission(Arc::new(MemoryStore::new()));
        let records: Vec<_> = (0..20)
            .map(|i| RawEntityRecord::new(format!("Company {}", i), i.to_string(), "GLEIF"))
            .collect();

        let decisions = admission.evaluate_batch(&records).await;
        let ids: Vec<_> = decisions
            .iter()
            .map(|d| match d {
                EntityDecision::Admitted(e) => e.registry_id().to_string(),
                EntityDecision::Rejected { registry_id, .. } => registry_id.clone(),
            })
            .collect();
        let expected: Vec<_> = (0..20).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_failed_callback_skips_entities() {
        let store = Arc::new(MemoryStore::new());
        let job_id = Uuid::new_v4();
        store.insert_job(JobRecord::pending(job_id));

        let payload = CallbackPayload::new(job_id, JobStatus::Failed)
            .with_entities(vec![RawEntityRecord::new("Acme", "1", "GLEIF")])
            .with_error_message("upstream 503");
        let report = admission(store.clone())
            .process_callback(payload, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.status, JobStatus::Failed);
        assert_eq!(report.records_processed, 0);
        assert_eq!(store.company_count(), 0);
        let job = store.job(job_id).unwrap();
        assert_eq!(job.error_message.as_deref(), Some("upstream 503"));
        assert!(job.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_cancelled_batch_marks_job_failed() {
        let store = Arc::new(MemoryStore::new());
        let job_id = Uuid::new_v4();
        store.insert_job(JobRecord::pending(job_id));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let payload = CallbackPayload::new(job_id, JobStatus::Completed)
            .with_entities(vec![RawEntityRecord::new("Acme", "1", "GLEIF")]);
        let report = admission(store.clone())
            .process_callback(payload, cancel)
            .await
            .unwrap();

        assert_eq!(report.status, JobStatus::Failed);
        assert_eq!(store.company_count(), 0);
        assert_eq!(
            store.job(job_id).unwrap().error_message.as_deref(),
            Some("operation cancelled")
        );
    }

    #[tokio::test]
    async fn test_missing_job_row_is_storage_error() {
        let payload = CallbackPayload::new(Uuid::new_v4(), JobStatus::Completed);
        let result = admission(Arc::new(MemoryStore::new()))
            .process_callback(payload, CancellationToken::new())
            .await;
        assert!(matches!(result, Err(AdmissionError::Storage(_))));
    }

    #[tokio::test]
    async fn test_batch_over_configured_size_is_rejected_untouched() {
        let store = Arc::new(MemoryStore::new());
        let job_id = Uuid::new_v4();
        store.insert_job(JobRecord::pending(job_id));
        let admission = Admission::new(
            AdmissionConfig::default().with_max_batch_size(2),
            Collaborators::new(Arc::new(MockSiteProber::new())),
            store.clone(),
        );

        let records = (0..3)
            .map(|i| RawEntityRecord::new("Acme", i.to_string(), "GLEIF"))
            .collect();
        let payload = CallbackPayload::new(job_id, JobStatus::Completed).with_entities(records);
        let result = admission
            .process_callback(payload, CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(AdmissionError::Validation(ValidationError::TooManyEntities {
                count: 3,
                max: 2
            }))
        ));
        assert_eq!(store.job(job_id).unwrap().status, JobStatus::Pending);
    }
}
