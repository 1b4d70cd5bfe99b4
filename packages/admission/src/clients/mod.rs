//! HTTP clients for the collaborator traits.

pub mod godaddy;
pub mod http;
pub mod huggingface;
pub mod newsapi;
pub mod opencorporates;
pub mod rate_limited;
pub mod tavily;

pub use godaddy::GoDaddyRegistrar;
pub use http::{HttpSiteProber, RetryPolicy};
pub use huggingface::HuggingFaceClassifier;
pub use newsapi::NewsApiSource;
pub use opencorporates::OpenCorporatesRegistry;
pub use rate_limited::{ApiLimiter, RateLimitedClassifier};
pub use tavily::TavilyWebSearcher;
