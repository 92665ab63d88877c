//! Status conditions
//!
//! Konflux controllers report state through the standard Kubernetes
//! condition list. The walk only ever asks one question of it: is a given
//! condition currently `True`.

use serde::{Deserialize, Serialize};

/// Condition set on a ReleasePlan once an admission accepts it
pub const MATCHED: &str = "Matched";

/// Condition set on a Release once its pipeline finished successfully
pub const RELEASED: &str = "Released";

/// A single status condition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

impl Condition {
    /// Build a condition with the given type and status
    pub fn new(type_: &str, status: &str) -> Self {
        Self {
            type_: type_.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }
}

/// Records exposing a status condition list
pub trait HasConditions {
    /// Conditions from the record status (empty when the status is unset)
    fn conditions(&self) -> &[Condition];
}

/// Returns true if `record` carries a condition of `condition_type` whose
/// status is exactly `"True"`
pub fn is_condition_true<R: HasConditions + ?Sized>(record: &R, condition_type: &str) -> bool {
    record
        .conditions()
        .iter()
        .any(|c| c.type_ == condition_type && c.status == "True")
}
