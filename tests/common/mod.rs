//! Shared fixtures for integration tests
//!
//! `FixtureReader` serves records from memory, records every call in order
//! and can be told to fail on the Nth call.

#![allow(dead_code)]

use async_trait::async_trait;
use kube::ResourceExt;
use serde_json::{Value, json};
use std::sync::Mutex;

use konfluxctl::ImageReference;
use konfluxctl::models::{
    Application, ApplicationSpec, ComponentSource, Condition, GitSource, MATCHED,
    MatchedReleasePlan, RELEASED, Release, ReleasePlan, ReleasePlanAdmission,
    ReleasePlanAdmissionSpec, ReleasePlanAdmissionStatus, ReleasePlanSpec, ReleasePlanStatus,
    ReleaseSpec, ReleaseStatus, Snapshot, SnapshotComponent, SnapshotSpec,
};
use konfluxctl::provenance::{ReadError, ResourceReader};

pub const MANAGED_NS: &str = "rhtap-releng-tenant";
pub const TARGET_REPO: &str = "registry.io/ns/app";
pub const TARGET_DIGEST: &str =
    "sha256:4c3d1a4bbe2b8a7b0f1d3f9e8b6c2a1d0e9f8a7b6c5d4e3f2a1b0c9d8e7f6a5b";
pub const OTHER_DIGEST: &str =
    "sha256:0000000000000000000000000000000000000000000000000000000000000001";

pub fn target() -> ImageReference {
    ImageReference::parse(&format!("{}@{}", TARGET_REPO, TARGET_DIGEST)).unwrap()
}

/// Image pull spec for `repository` pinned to `digest`
pub fn image(repository: &str, digest: &str) -> String {
    format!("{}@{}", repository, digest)
}

/// Flat admission mapping publishing one repository
pub fn mapping(component: &str, repository: &str, tags: &[&str]) -> Value {
    json!({
        "mapping": {
            "components": [
                { "name": component, "repository": repository, "tags": tags }
            ]
        }
    })
}

pub fn admission(name: &str, data: Option<Value>, plan_refs: &[&str]) -> ReleasePlanAdmission {
    let mut rpa = ReleasePlanAdmission::new(
        name,
        ReleasePlanAdmissionSpec {
            applications: vec!["app1".to_string()],
            origin: "tenant".to_string(),
            policy: Some("standard".to_string()),
            data,
        },
    );
    rpa.metadata.namespace = Some(MANAGED_NS.to_string());
    rpa.status = Some(ReleasePlanAdmissionStatus {
        conditions: vec![],
        release_plans: plan_refs
            .iter()
            .map(|r| MatchedReleasePlan {
                name: r.to_string(),
                active: true,
            })
            .collect(),
    });
    rpa
}

pub fn plan(name: &str, namespace: &str, matched: bool) -> ReleasePlan {
    let mut plan = ReleasePlan::new(
        name,
        ReleasePlanSpec {
            application: "app1".to_string(),
            target: Some(MANAGED_NS.to_string()),
            data: None,
        },
    );
    plan.metadata.namespace = Some(namespace.to_string());
    plan.status = Some(ReleasePlanStatus {
        conditions: vec![Condition::new(
            MATCHED,
            if matched { "True" } else { "False" },
        )],
        release_plan_admission: None,
    });
    plan
}

pub fn release(
    name: &str,
    namespace: &str,
    plan: &str,
    snapshot: &str,
    released: bool,
    advisory: Option<&str>,
) -> Release {
    let mut release = Release::new(
        name,
        ReleaseSpec {
            snapshot: snapshot.to_string(),
            release_plan: plan.to_string(),
        },
    );
    release.metadata.namespace = Some(namespace.to_string());
    release.status = Some(ReleaseStatus {
        conditions: vec![Condition::new(
            RELEASED,
            if released { "True" } else { "False" },
        )],
        artifacts: advisory.map(|url| json!({ "advisory": { "url": url } })),
    });
    release
}

pub fn component(name: &str, container_image: &str, url: &str, revision: &str) -> SnapshotComponent {
    SnapshotComponent {
        name: name.to_string(),
        container_image: container_image.to_string(),
        source: Some(ComponentSource {
            git: Some(GitSource {
                url: url.to_string(),
                revision: revision.to_string(),
                context: None,
                dockerfile_url: None,
            }),
        }),
    }
}

pub fn snapshot(
    name: &str,
    namespace: &str,
    application: &str,
    components: Vec<SnapshotComponent>,
) -> Snapshot {
    let mut snapshot = Snapshot::new(
        name,
        SnapshotSpec {
            application: application.to_string(),
            components,
        },
    );
    snapshot.metadata.namespace = Some(namespace.to_string());
    snapshot
}

pub fn application(name: &str, namespace: &str) -> Application {
    let mut app = Application::new(
        name,
        ApplicationSpec {
            display_name: name.to_string(),
            description: None,
        },
    );
    app.metadata.namespace = Some(namespace.to_string());
    app
}

/// In-memory reader with a call log
#[derive(Default)]
pub struct FixtureReader {
    pub admissions: Vec<ReleasePlanAdmission>,
    pub plans: Vec<ReleasePlan>,
    pub releases: Vec<Release>,
    pub snapshots: Vec<Snapshot>,
    pub applications: Vec<Application>,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<String>>,
}

impl FixtureReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`th call (1-based) fail
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    /// Calls made so far, e.g. `get_plan tenant/plan`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, kind: &'static str, namespace: &str, call: String) -> Result<(), ReadError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        if Some(calls.len()) == self.fail_on_call {
            return Err(ReadError::Unavailable {
                kind,
                namespace: namespace.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn find<K: ResourceExt + Clone>(
        records: &[K],
        kind: &'static str,
        namespace: &str,
        name: &str,
    ) -> Result<K, ReadError> {
        records
            .iter()
            .find(|r| r.namespace().as_deref() == Some(namespace) && r.name_any() == name)
            .cloned()
            .ok_or_else(|| ReadError::NotFound {
                kind,
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    fn in_namespace<K: ResourceExt + Clone>(records: &[K], namespace: &str) -> Vec<K> {
        records
            .iter()
            .filter(|r| r.namespace().as_deref() == Some(namespace))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ResourceReader for FixtureReader {
    async fn list_admissions(
        &self,
        namespace: &str,
    ) -> Result<Vec<ReleasePlanAdmission>, ReadError> {
        self.record(
            "ReleasePlanAdmission",
            namespace,
            format!("list_admissions {}", namespace),
        )?;
        Ok(Self::in_namespace(&self.admissions, namespace))
    }

    async fn get_plan(&self, namespace: &str, name: &str) -> Result<ReleasePlan, ReadError> {
        self.record(
            "ReleasePlan",
            namespace,
            format!("get_plan {}/{}", namespace, name),
        )?;
        Self::find(&self.plans, "ReleasePlan", namespace, name)
    }

    async fn list_releases(&self, namespace: &str) -> Result<Vec<Release>, ReadError> {
        self.record("Release", namespace, format!("list_releases {}", namespace))?;
        Ok(Self::in_namespace(&self.releases, namespace))
    }

    async fn get_snapshot(&self, namespace: &str, name: &str) -> Result<Snapshot, ReadError> {
        self.record(
            "Snapshot",
            namespace,
            format!("get_snapshot {}/{}", namespace, name),
        )?;
        Self::find(&self.snapshots, "Snapshot", namespace, name)
    }

    async fn get_application(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Application, ReadError> {
        self.record(
            "Application",
            namespace,
            format!("get_application {}/{}", namespace, name),
        )?;
        Self::find(&self.applications, "Application", namespace, name)
    }
}

/// Reader holding one complete chain for the target image:
/// `rpa -> tenant/plan -> release-1 -> snap-1 (comp1) -> app1`
pub fn single_chain_reader() -> FixtureReader {
    let mut reader = FixtureReader::new();
    reader.admissions.push(admission(
        "rpa",
        Some(mapping("comp1", TARGET_REPO, &["v1", "latest"])),
        &["tenant/plan"],
    ));
    reader.plans.push(plan("plan", "tenant", true));
    reader.releases.push(release(
        "release-1",
        "tenant",
        "plan",
        "snap-1",
        true,
        None,
    ));
    reader.snapshots.push(snapshot(
        "snap-1",
        "tenant",
        "app1",
        vec![component(
            "comp1",
            &image("quay.io/redhat-user-workloads/tenant/comp1", TARGET_DIGEST),
            "https://git/x",
            "abc123",
        )],
    ));
    reader.applications.push(application("app1", "tenant"));
    reader
}
