// Company Admission Service - API Core
//
// Receives registry scraper callbacks, runs each batch through the admission
// pipeline and persists admitted companies to Postgres.
//
// SQL lives only in domains/*/models/.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
