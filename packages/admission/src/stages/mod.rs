//! Filter stages.
//!
//! Each stage turns its collaborator answers into a typed result and exposes
//! a `gate` that says whether the entity may continue. The orchestrator
//! composes the gates with early return.

pub mod domain;
pub mod legal_status;
pub mod sentiment;
pub mod website;

use serde::{Deserialize, Serialize};

pub use domain::DomainAvailabilityChecker;
pub use legal_status::{LegalStatus, LegalStatusVerifier};
pub use sentiment::AdverseMediaAnalyzer;
pub use website::WebsitePresenceProber;

/// Why an entity was kept out of the dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidSource,
    WebsitePresent,
    Inactive,
    DomainUnavailable,
    DomainUnknown,
    NegativePress,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::InvalidSource => "invalid_source",
            RejectReason::WebsitePresent => "website_present",
            RejectReason::Inactive => "inactive",
            RejectReason::DomainUnavailable => "domain_unavailable",
            RejectReason::DomainUnknown => "domain_unknown",
            RejectReason::NegativePress => "negative_press",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single stage gate.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Accept(T),
    Reject(RejectReason),
}

impl<T> StageOutcome<T> {
    pub fn is_accept(&self) -> bool {
        matches!(self, StageOutcome::Accept(_))
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            StageOutcome::Accept(_) => None,
            StageOutcome::Reject(reason) => Some(*reason),
        }
    }
}
