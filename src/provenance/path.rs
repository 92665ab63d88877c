//! Provenance path accumulator

use serde::{Deserialize, Serialize};

/// One release chain reconstructed for an image, built up node by node
///
/// Every scalar stays `None` until the node that owns it is visited.
/// Cloning copies the tag list, so sibling branches never share state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenancePath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_plan_admission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_revision: Option<String>,
    #[serde(rename = "sourceURL", default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(rename = "advisoryURL", default, skip_serializing_if = "Option::is_none")]
    pub advisory_url: Option<String>,
    #[serde(default)]
    pub image_tags: Vec<String>,
}

impl ProvenancePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once every field is filled in and at least one tag is known
    pub fn is_complete(&self) -> bool {
        self.release_plan_admission.is_some()
            && self.release_plan.is_some()
            && self.release.is_some()
            && self.application.is_some()
            && self.snapshot.is_some()
            && self.component_name.is_some()
            && self.source_revision.is_some()
            && self.source_url.is_some()
            && self.advisory_url.is_some()
            && !self.image_tags.is_empty()
    }
}
