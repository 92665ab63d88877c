//! Konflux platform records
//!
//! Rust types for the `appstudio.redhat.com/v1alpha1` resources that make up
//! an image's release chain:
//! - `release.rs` - ReleasePlanAdmission, ReleasePlan and Release
//! - `application.rs` - Snapshot and Application
//! - `conditions.rs` - status conditions and the condition lookup helper
//!
//! Only the fields the provenance walk reads are modelled. Every field is
//! defaulted so records written by newer controllers still decode.

pub mod application;
pub mod conditions;
pub mod release;

pub use application::{
    Application, ApplicationSpec, ApplicationStatus, ComponentSource, GitSource, Snapshot,
    SnapshotComponent, SnapshotSpec, SnapshotStatus,
};
pub use conditions::{Condition, HasConditions, MATCHED, RELEASED, is_condition_true};
pub use release::{
    MatchedReleasePlan, MatchedReleasePlanAdmission, Release, ReleasePlan,
    ReleasePlanAdmission, ReleasePlanAdmissionSpec, ReleasePlanAdmissionStatus,
    ReleasePlanSpec, ReleasePlanStatus, ReleaseSpec, ReleaseStatus,
};

/// API group shared by every Konflux record
pub const API_GROUP: &str = "appstudio.redhat.com";

/// API version of the modelled records
pub const API_VERSION: &str = "v1alpha1";
