//! Release service records
//!
//! ReleasePlanAdmission (managed side), ReleasePlan (tenant side) and the
//! Release that executes a plan against one Snapshot.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::conditions::{Condition, HasConditions};

/// Admission rule accepting release plans into a managed namespace
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[kube(
    group = "appstudio.redhat.com",
    version = "v1alpha1",
    kind = "ReleasePlanAdmission",
    plural = "releaseplanadmissions",
    namespaced,
    status = "ReleasePlanAdmissionStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePlanAdmissionSpec {
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default)]
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// Free-form payload; carries the component to repository mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePlanAdmissionStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Plans matched by this admission, named `namespace/name`
    #[serde(default)]
    pub release_plans: Vec<MatchedReleasePlan>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchedReleasePlan {
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// Tenant-side release contract for one application
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[kube(
    group = "appstudio.redhat.com",
    version = "v1alpha1",
    kind = "ReleasePlan",
    plural = "releaseplans",
    namespaced,
    status = "ReleasePlanStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePlanSpec {
    #[serde(default)]
    pub application: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePlanStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_plan_admission: Option<MatchedReleasePlanAdmission>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchedReleasePlanAdmission {
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// One execution of a ReleasePlan against a Snapshot
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[kube(
    group = "appstudio.redhat.com",
    version = "v1alpha1",
    kind = "Release",
    plural = "releases",
    namespaced,
    status = "ReleaseStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSpec {
    #[serde(default)]
    pub snapshot: String,
    #[serde(default)]
    pub release_plan: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Pipeline output; carries the advisory published for the release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<serde_json::Value>,
}

impl HasConditions for ReleasePlanAdmission {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl HasConditions for ReleasePlan {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl HasConditions for Release {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}
