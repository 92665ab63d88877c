//! Nodes of the release graph
//!
//! Each variant wraps one fetched record and knows two things: which path
//! fields it fills in, and how to find the next records in the chain:
//!
//! ```text
//! ReleasePlanAdmission -> ReleasePlan -> Release -> Snapshot -> Application
//! ```
//!
//! References between records are plain `namespace`/`name` strings, so
//! every step down the chain is another read through the [`Lookup`].

use kube::ResourceExt;
use serde::Deserialize;

use super::TraversalError;
use super::path::ProvenancePath;
use super::reader::Lookup;
use crate::image::ImageReference;
use crate::models::{
    Application, MATCHED, RELEASED, Release, ReleasePlan, ReleasePlanAdmission, Snapshot,
    SnapshotComponent, is_condition_true,
};

/// Advisory value used when a release published none (or it cannot be read)
pub const UNKNOWN_ADVISORY: &str = "unknown";

/// A record in the release graph
#[derive(Debug, Clone)]
pub enum Node {
    Admission(AdmissionNode),
    Plan(PlanNode),
    Release(ReleaseNode),
    Snapshot(SnapshotNode),
    Application(ApplicationNode),
}

impl Node {
    /// Kind and namespaced name, for logs
    pub fn describe(&self) -> String {
        match self {
            Node::Admission(n) => describe("ReleasePlanAdmission", &n.record),
            Node::Plan(n) => describe("ReleasePlan", &n.record),
            Node::Release(n) => describe("Release", &n.record),
            Node::Snapshot(n) => describe("Snapshot", &n.record),
            Node::Application(n) => describe("Application", &n.record),
        }
    }

    /// Write the fields this record contributes into `path`
    pub fn apply(&self, path: &mut ProvenancePath) {
        match self {
            Node::Admission(n) => n.apply(path),
            Node::Plan(n) => n.apply(path),
            Node::Release(n) => n.apply(path),
            Node::Snapshot(n) => n.apply(path),
            Node::Application(n) => n.apply(path),
        }
    }

    /// Fetch and filter the next records in the chain
    pub async fn children(&self, lookup: &Lookup<'_>) -> Result<Vec<Node>, TraversalError> {
        match self {
            Node::Admission(n) => n.children(lookup).await,
            Node::Plan(n) => n.children(lookup).await,
            Node::Release(n) => n.children(lookup).await,
            Node::Snapshot(n) => n.children(lookup).await,
            Node::Application(_) => Ok(Vec::new()),
        }
    }
}

fn describe<K: ResourceExt>(kind: &str, record: &K) -> String {
    format!("{}: {}/{}", kind, namespace_of(record), record.name_any())
}

fn namespace_of<K: ResourceExt>(record: &K) -> String {
    record.namespace().unwrap_or_default()
}

/// Parse a `namespace/name` reference, defaulting the namespace.
/// `None` when a part is empty or the name itself contains a `/`.
fn parse_namespaced_name(reference: &str, default_ns: &str) -> Option<(String, String)> {
    let (ns, name) = reference.split_once('/').unwrap_or((default_ns, reference));
    if ns.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((ns.to_string(), name.to_string()))
}

/// Admission whose mapping publishes the target repository
#[derive(Debug, Clone)]
pub struct AdmissionNode {
    record: ReleasePlanAdmission,
    image_tags: Vec<String>,
}

impl AdmissionNode {
    /// `image_tags` are the tags the mapping publishes for the target repository
    pub fn new(record: ReleasePlanAdmission, image_tags: Vec<String>) -> Self {
        Self { record, image_tags }
    }

    fn apply(&self, path: &mut ProvenancePath) {
        path.release_plan_admission = Some(self.record.name_any());
        path.image_tags = self.image_tags.clone();
    }

    /// Every plan listed in the admission status that is still matched.
    /// A plan that cannot be read fails the whole walk.
    async fn children(&self, lookup: &Lookup<'_>) -> Result<Vec<Node>, TraversalError> {
        let own_ns = namespace_of(&self.record);
        let references = self
            .record
            .status
            .as_ref()
            .map(|s| s.release_plans.as_slice())
            .unwrap_or_default();

        let mut plans = Vec::with_capacity(references.len());
        for reference in references {
            let Some((namespace, name)) = parse_namespaced_name(&reference.name, &own_ns) else {
                tracing::debug!(
                    "Skipping malformed ReleasePlan reference '{}' on {}",
                    reference.name,
                    describe("ReleasePlanAdmission", &self.record)
                );
                continue;
            };
            plans.push(lookup.get_plan(&namespace, &name).await?);
        }

        Ok(plans
            .into_iter()
            .filter(|plan| {
                let matched = is_condition_true(plan, MATCHED);
                if !matched {
                    tracing::debug!("Skipping unmatched {}", describe("ReleasePlan", plan));
                }
                matched
            })
            .map(|plan| Node::Plan(PlanNode::new(plan)))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct PlanNode {
    record: ReleasePlan,
}

impl PlanNode {
    pub fn new(record: ReleasePlan) -> Self {
        Self { record }
    }

    fn apply(&self, path: &mut ProvenancePath) {
        path.release_plan = Some(self.record.name_any());
    }

    /// Released releases of this plan, in the order the reader listed them
    async fn children(&self, lookup: &Lookup<'_>) -> Result<Vec<Node>, TraversalError> {
        let plan_name = self.record.name_any();
        let releases = lookup.list_releases(&namespace_of(&self.record)).await?;

        Ok(releases
            .into_iter()
            .filter(|release| {
                release.spec.release_plan == plan_name && is_condition_true(release, RELEASED)
            })
            .map(|release| Node::Release(ReleaseNode::new(release)))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct ReleaseArtifacts {
    #[serde(default)]
    advisory: Option<ReleaseAdvisory>,
}

#[derive(Debug, Deserialize)]
struct ReleaseAdvisory {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReleaseNode {
    record: Release,
}

impl ReleaseNode {
    pub fn new(record: Release) -> Self {
        Self { record }
    }

    /// Advisory URL from the release artifacts, or [`UNKNOWN_ADVISORY`]
    pub fn advisory_url(&self) -> String {
        let Some(artifacts) = self
            .record
            .status
            .as_ref()
            .and_then(|s| s.artifacts.as_ref())
        else {
            return UNKNOWN_ADVISORY.to_string();
        };

        match ReleaseArtifacts::deserialize(artifacts) {
            Ok(decoded) => decoded
                .advisory
                .and_then(|a| a.url)
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| UNKNOWN_ADVISORY.to_string()),
            Err(e) => {
                tracing::debug!(
                    "Undecodable artifacts on {}: {}",
                    describe("Release", &self.record),
                    e
                );
                UNKNOWN_ADVISORY.to_string()
            }
        }
    }

    fn apply(&self, path: &mut ProvenancePath) {
        path.release = Some(self.record.name_any());
        path.advisory_url = Some(self.advisory_url());
    }

    /// The released snapshot, if one of its components is the target image.
    /// No matching component ends this branch without an error.
    async fn children(&self, lookup: &Lookup<'_>) -> Result<Vec<Node>, TraversalError> {
        let snapshot = lookup
            .get_snapshot(&namespace_of(&self.record), &self.record.spec.snapshot)
            .await?;

        let target_digest = lookup.target().digest();
        let component = snapshot
            .spec
            .components
            .iter()
            .find(|c| {
                ImageReference::parse(&c.container_image)
                    .map(|image| image.digest() == target_digest)
                    .unwrap_or(false)
            })
            .cloned();

        match component {
            Some(component) => Ok(vec![Node::Snapshot(SnapshotNode::new(snapshot, component))]),
            None => {
                tracing::debug!(
                    "No component of {} has digest {}",
                    describe("Snapshot", &snapshot),
                    target_digest
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Snapshot together with the component built as the target image
#[derive(Debug, Clone)]
pub struct SnapshotNode {
    record: Snapshot,
    component: SnapshotComponent,
}

impl SnapshotNode {
    pub fn new(record: Snapshot, component: SnapshotComponent) -> Self {
        Self { record, component }
    }

    fn apply(&self, path: &mut ProvenancePath) {
        let git = self.component.git_source();
        path.snapshot = Some(self.record.name_any());
        path.component_name = Some(self.component.name.clone());
        path.source_revision = git.map(|g| g.revision.clone());
        path.source_url = git.map(|g| g.url.clone());
    }

    async fn children(&self, lookup: &Lookup<'_>) -> Result<Vec<Node>, TraversalError> {
        let application = lookup
            .get_application(&namespace_of(&self.record), &self.record.spec.application)
            .await?;
        Ok(vec![Node::Application(ApplicationNode::new(application))])
    }
}

#[derive(Debug, Clone)]
pub struct ApplicationNode {
    record: Application,
}

impl ApplicationNode {
    pub fn new(record: Application) -> Self {
        Self { record }
    }

    fn apply(&self, path: &mut ProvenancePath) {
        path.application = Some(self.record.name_any());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReleaseSpec, ReleaseStatus};

    fn release_with_artifacts(artifacts: Option<serde_json::Value>) -> ReleaseNode {
        let mut release = Release::new(
            "release-1",
            ReleaseSpec {
                snapshot: "snap".to_string(),
                release_plan: "plan".to_string(),
            },
        );
        release.status = Some(ReleaseStatus {
            conditions: vec![],
            artifacts,
        });
        ReleaseNode::new(release)
    }

    #[test]
    fn test_parse_namespaced_name() {
        assert_eq!(
            parse_namespaced_name("tenant/plan", "managed"),
            Some(("tenant".to_string(), "plan".to_string()))
        );
        assert_eq!(
            parse_namespaced_name("plan", "managed"),
            Some(("managed".to_string(), "plan".to_string()))
        );
    }

    #[test]
    fn test_parse_namespaced_name_rejects_malformed() {
        assert_eq!(parse_namespaced_name("a/b/c", "managed"), None);
        assert_eq!(parse_namespaced_name("tenant/", "managed"), None);
        assert_eq!(parse_namespaced_name("/plan", "managed"), None);
        assert_eq!(parse_namespaced_name("", "managed"), None);
    }

    #[test]
    fn test_advisory_url_decoded() {
        let node = release_with_artifacts(Some(serde_json::json!({
            "advisory": {
                "url": "https://access.example.com/errata/RHBA-2024:0001",
                "internal_url": "https://internal/advisory/1"
            }
        })));
        assert_eq!(
            node.advisory_url(),
            "https://access.example.com/errata/RHBA-2024:0001"
        );
    }

    #[test]
    fn test_advisory_url_defaults_to_unknown() {
        assert_eq!(release_with_artifacts(None).advisory_url(), UNKNOWN_ADVISORY);
        assert_eq!(
            release_with_artifacts(Some(serde_json::json!({}))).advisory_url(),
            UNKNOWN_ADVISORY
        );
        assert_eq!(
            release_with_artifacts(Some(serde_json::json!({ "advisory": "not-an-object" })))
                .advisory_url(),
            UNKNOWN_ADVISORY
        );
        assert_eq!(
            release_with_artifacts(Some(serde_json::json!({ "advisory": { "url": "" } })))
                .advisory_url(),
            UNKNOWN_ADVISORY
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let node = Node::Release(release_with_artifacts(None));
        let mut once = ProvenancePath::new();
        node.apply(&mut once);
        let mut twice = once.clone();
        node.apply(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(once.release.as_deref(), Some("release-1"));
    }

    #[test]
    fn test_describe() {
        let mut release = release_with_artifacts(None).record;
        release.metadata.namespace = Some("tenant".to_string());
        assert_eq!(
            Node::Release(ReleaseNode::new(release)).describe(),
            "Release: tenant/release-1"
        );
    }
}
