#![forbid(unsafe_code)]
//! Index coordinator (C7): the optimistic-concurrency protocol that
//! serializes concurrent workers merging vectors into a single knowledge
//! base's index (spec §4.7).

mod blob;
mod error;
mod merge;

pub use blob::load_for_query;
pub use error::{CoordinatorError, CoordinatorResult};
pub use merge::IndexCoordinator;

pub const TRACING_TARGET: &str = "kbrag_coordinator";
