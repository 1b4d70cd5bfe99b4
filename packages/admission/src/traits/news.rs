//! News article search.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::types::sentiment::Article;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Up to `limit` articles mentioning `query`, most recent first.
    async fn recent_articles(&self, query: &str, limit: usize) -> ClientResult<Vec<Article>>;
}
