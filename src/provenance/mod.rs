//! Image provenance reconstruction
//!
//! Answers "which commit, build and release produced this image digest" by
//! walking the Konflux release graph:
//!
//! 1. [`admission::matching_admissions`] picks the ReleasePlanAdmissions
//!    whose mapping publishes the image's repository.
//! 2. [`engine::depth_first_search`] descends plan -> release -> snapshot
//!    -> application, extending one [`ProvenancePath`] per branch.
//! 3. Only complete paths are returned.
//!
//! The walk is read-only, sequential and fail-fast: the first failed read
//! aborts it without partial results.

pub mod admission;
pub mod engine;
pub mod node;
pub mod path;
pub mod reader;
pub mod render;

pub use admission::{AdmissionMapping, matching_admissions};
pub use engine::{TraversalOptions, depth_first_search, find_provenance};
pub use node::{
    AdmissionNode, ApplicationNode, Node, PlanNode, ReleaseNode, SnapshotNode, UNKNOWN_ADVISORY,
};
pub use path::ProvenancePath;
pub use reader::{Lookup, ReadError, ResourceReader};
pub use render::{OutputFormat, render_paths};

/// Why a traversal stopped without a result
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("traversal cancelled")]
    Cancelled,
}
