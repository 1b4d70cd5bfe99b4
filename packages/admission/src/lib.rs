//! Company Record Admission Pipeline
//!
//! Decides which raw company records scraped from official registries are
//! admitted into the curated dataset, and scores the ones that are.
//!
//! An entity is admitted only if it has no web presence, is legally active,
//! its brand `.com` domain (legal suffixes dropped) is free, and it has no negative press:
//!
//! - Website presence and domain availability fail **closed**: an
//!   unverifiable answer rejects.
//! - Legal status and adverse media fail **open**: an unverifiable answer
//!   passes, with a note.
//!
//! # Usage
//!
//! ```rust,ignore
//! use admission::{Admission, AdmissionConfig, Collaborators, MemoryStore};
//! use admission::testing::{MockRegistrar, MockSiteProber};
//!
//! let collaborators = Collaborators::new(Arc::new(MockSiteProber::new()))
//!     .with_registrar(Arc::new(MockRegistrar::always(true)));
//! let admission = Admission::new(AdmissionConfig::default(), collaborators, Arc::new(MemoryStore::new()));
//!
//! let payload = CallbackPayload::parse(&body)?;
//! let report = admission.process_callback(payload, CancellationToken::new()).await?;
//! ```
//!
//! # Modules
//!
//! - [`normalize`] - Company name to canonical form and candidate domains
//! - [`stages`] - The four filter stages and their gates
//! - [`scoring`] - Deterministic 0-100 quality score
//! - [`pipeline`] - Orchestrator: stages, batching, deadline, commit
//! - [`traits`] - Collaborator and storage abstractions
//! - [`clients`] - HTTP implementations of the collaborator traits
//! - [`stores`] - Storage implementations (MemoryStore)
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod clients;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod scoring;
pub mod security;
pub mod stages;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AdmissionError, ClientError, ClientResult, Result, ValidationError};
pub use normalize::{normalize, CandidateDomainSet, NormalizedName};
pub use pipeline::{Admission, BatchReport, Collaborators, EntityDecision, Stage};
pub use scoring::{score, ScoreBreakdown, COMPLETENESS_FIELDS};
pub use security::{ApiCredential, SecretString};
pub use stages::{
    AdverseMediaAnalyzer, DomainAvailabilityChecker, LegalStatus, LegalStatusVerifier,
    RejectReason, StageOutcome, WebsitePresenceProber,
};
pub use stores::MemoryStore;
pub use traits::{
    classifier::{LabelScore, ZeroShotClassifier},
    news::NewsSource,
    prober::SiteProber,
    registrar::DomainRegistrar,
    registry::{CompanyRegistry, RegistryMatch},
    searcher::{SearchResult, WebSearcher},
    store::{AdmissionStore, BatchCommit},
};
pub use types::{
    callback::{CallbackPayload, MAX_CALLBACK_ENTITIES, MAX_ERROR_MESSAGE_CHARS},
    config::{AdmissionConfig, NEGATIVE_LABELS},
    job::{JobRecord, JobStatus, JobUpdate},
    probe::{ProbeResult, SimilarMatch, SimilarityReason},
    record::{AdmittedEntity, EntityStatus, RawEntityRecord, RegistrySource},
    sentiment::{Article, SentimentHit, SentimentReport},
};

// Re-export clients
pub use clients::{
    ApiLimiter, GoDaddyRegistrar, HttpSiteProber, HuggingFaceClassifier, NewsApiSource,
    OpenCorporatesRegistry, RateLimitedClassifier, RetryPolicy, TavilyWebSearcher,
};

// Re-export cancellation so callers need not depend on tokio-util directly
pub use tokio_util::sync::CancellationToken;
