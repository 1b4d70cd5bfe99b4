//! Kernel module - server infrastructure and dependencies.

pub mod deps;

pub use deps::{build_collaborators, CollaboratorStatus, ServerDeps};
