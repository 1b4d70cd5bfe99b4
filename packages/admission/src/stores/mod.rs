//! Storage implementations for the admission pipeline.
//!
//! `MemoryStore` lives here; the Postgres adapter belongs to the server.

pub mod memory;

pub use memory::MemoryStore;
