//! Data types flowing through the admission pipeline.

pub mod callback;
pub mod config;
pub mod job;
pub mod probe;
pub mod record;
pub mod sentiment;
