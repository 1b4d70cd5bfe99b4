//! Narrow collaborator traits.
//!
//! Each external API the pipeline consults sits behind one of these so stage
//! logic can run against fakes (see [`crate::testing`]).

pub mod classifier;
pub mod news;
pub mod prober;
pub mod registrar;
pub mod registry;
pub mod searcher;
pub mod store;
