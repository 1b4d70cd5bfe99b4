//! Domain availability checker.
//!
//! Fails closed: only an explicit "available" answer lets an entity through.

use std::sync::Arc;

use tracing::warn;

use super::{RejectReason, StageOutcome};
use crate::traits::registrar::DomainRegistrar;

#[derive(Clone)]
pub struct DomainAvailabilityChecker {
    registrar: Option<Arc<dyn DomainRegistrar>>,
}

impl DomainAvailabilityChecker {
    pub fn new(registrar: Option<Arc<dyn DomainRegistrar>>) -> Self {
        Self { registrar }
    }

    /// `Some(true)` available, `Some(false)` taken, `None` when the registrar
    /// is not configured, the call failed, or there is no domain to ask about.
    pub async fn check(&self, domain: Option<&str>) -> Option<bool> {
        let registrar = self.registrar.as_ref()?;
        let domain = domain?;
        match registrar.is_available(domain).await {
            Ok(available) => Some(available),
            Err(e) => {
                warn!(domain, stage = "domain", error = %e, "Registrar lookup failed");
                None
            }
        }
    }

    pub fn gate(availability: Option<bool>) -> StageOutcome<()> {
        match availability {
            Some(true) => StageOutcome::Accept(()),
            Some(false) => StageOutcome::Reject(RejectReason::DomainUnavailable),
            None => StageOutcome::Reject(RejectReason::DomainUnknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegistrar;

    #[tokio::test]
    async fn test_unconfigured_registrar_is_unknown() {
        let checker = DomainAvailabilityChecker::new(None);
        let availability = checker.check(Some("acme.com")).await;
        assert_eq!(availability, None);
        assert_eq!(
            DomainAvailabilityChecker::gate(availability),
            StageOutcome::Reject(RejectReason::DomainUnknown)
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_is_unknown() {
        let checker =
            DomainAvailabilityChecker::new(Some(Arc::new(MockRegistrar::new().with_failure("acme.com"))));
        assert_eq!(checker.check(Some("acme.com")).await, None);
    }

    #[tokio::test]
    async fn test_taken_domain_rejects() {
        let checker = DomainAvailabilityChecker::new(Some(Arc::new(
            MockRegistrar::new().with_availability("acme.com", false),
        )));
        let availability = checker.check(Some("acme.com")).await;
        assert_eq!(
            DomainAvailabilityChecker::gate(availability),
            StageOutcome::Reject(RejectReason::DomainUnavailable)
        );
    }

    #[tokio::test]
    async fn test_no_domain_is_unknown() {
        let registrar = Arc::new(MockRegistrar::always(true));
        let checker = DomainAvailabilityChecker::new(Some(registrar.clone()));
        assert_eq!(checker.check(None).await, None);
        assert!(registrar.calls().is_empty());
    }

    #[test]
    fn test_only_explicit_true_accepts() {
        assert!(DomainAvailabilityChecker::gate(Some(true)).is_accept());
    }
}
