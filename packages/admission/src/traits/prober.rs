//! Lightweight website existence probe.

use async_trait::async_trait;

use crate::error::ClientResult;

#[async_trait]
pub trait SiteProber: Send + Sync {
    /// Issue a HEAD (or equivalent) request and return the response status.
    ///
    /// Redirects are not followed; a 3xx already proves the host serves a site.
    async fn probe(&self, url: &str) -> ClientResult<u16>;
}
