//! Admission pipeline.
//!
//! The orchestrator runs every entity of a callback through the filter
//! stages in order, scores the survivors and commits the batch:
//! - Normalize name, check registry source
//! - Website presence (reject if found)
//! - Legal status (reject if inactive)
//! - Domain availability (reject unless available)
//! - Adverse media (reject on negative press)
//! - Score and persist

pub mod orchestrator;

pub use orchestrator::{Admission, BatchReport, Collaborators, EntityDecision, Stage};
