//! Domain registrar availability lookups.

use async_trait::async_trait;

use crate::error::ClientResult;

#[async_trait]
pub trait DomainRegistrar: Send + Sync {
    /// `true` when the domain can be registered, `false` when it is taken.
    async fn is_available(&self, domain: &str) -> ClientResult<bool>;
}
