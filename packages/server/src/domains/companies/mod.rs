//! Companies domain - scrape jobs and the companies admitted from them

pub mod models;
pub mod store;

pub use models::{Company, ScrapeJob};
pub use store::PgAdmissionStore;
