//! Legal status verifier.
//!
//! Fails open: without a registry credential, or when the lookup errors, the
//! entity is assumed active and the result carries a note saying so. This is
//! the opposite of the domain checker's policy; both are kept as-is.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{RejectReason, StageOutcome};
use crate::traits::registry::{CompanyRegistry, RegistryMatch};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegalStatus {
    pub active: bool,
    pub source: String,
    pub matches: Option<Vec<RegistryMatch>>,
    pub note: Option<String>,
}

impl LegalStatus {
    fn assumed_active(source: &str, note: String) -> Self {
        Self {
            active: true,
            source: source.to_string(),
            matches: None,
            note: Some(note),
        }
    }
}

#[derive(Clone)]
pub struct LegalStatusVerifier {
    registry: Option<Arc<dyn CompanyRegistry>>,
}

impl LegalStatusVerifier {
    pub fn new(registry: Option<Arc<dyn CompanyRegistry>>) -> Self {
        Self { registry }
    }

    pub async fn verify(&self, name: &str) -> LegalStatus {
        let Some(registry) = &self.registry else {
            return LegalStatus::assumed_active(
                "unverified",
                "registry credential not configured; assumed active".to_string(),
            );
        };

        match registry.search(name).await {
            Ok(matches) => LegalStatus {
                active: matches.iter().any(RegistryMatch::is_active),
                source: registry.source().to_string(),
                matches: Some(matches),
                note: None,
            },
            Err(e) => {
                warn!(name, stage = "legal_status", error = %e, "Registry lookup failed");
                LegalStatus::assumed_active(
                    registry.source(),
                    format!("registry lookup failed ({}); assumed active", e),
                )
            }
        }
    }

    pub fn gate(status: &LegalStatus) -> StageOutcome<()> {
        if status.active {
            StageOutcome::Accept(())
        } else {
            StageOutcome::Reject(RejectReason::Inactive)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegistry;

    #[tokio::test]
    async fn test_unconfigured_registry_assumes_active() {
        let status = LegalStatusVerifier::new(None).verify("Acme").await;
        assert!(status.active);
        assert!(status.note.unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_lookup_failure_assumes_active() {
        let verifier = LegalStatusVerifier::new(Some(Arc::new(MockRegistry::new().failing())));
        let status = verifier.verify("Acme").await;
        assert!(status.active);
        assert_eq!(status.source, "mock-registry");
        assert!(status.note.is_some());
    }

    #[tokio::test]
    async fn test_any_active_match_is_enough() {
        let registry = MockRegistry::new().with_matches(
            "Acme",
            vec![
                RegistryMatch::new("ACME HOLDINGS", Some("Dissolved")),
                RegistryMatch::new("ACME LTD", Some("Active")),
            ],
        );
        let status = LegalStatusVerifier::new(Some(Arc::new(registry))).verify("Acme").await;
        assert!(status.active);
        assert_eq!(status.matches.map(|m| m.len()), Some(2));
    }

    #[tokio::test]
    async fn test_no_active_match_rejects() {
        let registry = MockRegistry::new().with_matches(
            "Acme",
            vec![RegistryMatch::new("ACME LTD", Some("Liquidation"))],
        );
        let status = LegalStatusVerifier::new(Some(Arc::new(registry))).verify("Acme").await;
        assert!(!status.active);
        assert_eq!(
            LegalStatusVerifier::gate(&status),
            StageOutcome::Reject(RejectReason::Inactive)
        );
    }
}
