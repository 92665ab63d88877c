//! Root selection: admissions that publish the target repository
//!
//! ReleasePlanAdmissions carry a free-form `spec.data` payload whose
//! `mapping` section says which repository (and tags) each component is
//! pushed to. Two layouts exist in the wild:
//!
//! ```yaml
//! mapping:
//!   defaults:
//!     tags: ["latest"]
//!   components:
//!     - name: comp1                      # flat
//!       repository: quay.io/org/comp1
//!       tags: ["v1"]
//!     - name: comp2                      # per repository
//!       repositories:
//!         - url: quay.io/org/comp2
//!           tags: ["v2"]
//! ```
//!
//! [`AdmissionMapping::decode`] folds both into one shape so the walk only
//! sees repository entries with their resolved tags.

use kube::ResourceExt;
use serde::Deserialize;

use super::TraversalError;
use super::node::{AdmissionNode, Node};
use super::reader::Lookup;

#[derive(Debug, Deserialize)]
struct RawAdmissionData {
    #[serde(default)]
    mapping: RawMapping,
}

#[derive(Debug, Default, Deserialize)]
struct RawMapping {
    #[serde(default)]
    defaults: RawDefaults,
    #[serde(default)]
    components: Vec<RawComponent>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDefaults {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    repository: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    repositories: Vec<RawRepository>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    url: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Normalized component to repository mapping of one admission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmissionMapping {
    pub components: Vec<MappedComponent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedComponent {
    pub name: String,
    pub repositories: Vec<MappedRepository>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedRepository {
    pub url: String,
    pub tags: Vec<String>,
}

impl AdmissionMapping {
    /// Decode the `spec.data` payload of an admission
    pub fn decode(data: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw = RawAdmissionData::deserialize(data)?;
        let defaults = raw.mapping.defaults.tags;

        let components = raw
            .mapping
            .components
            .into_iter()
            .map(|component| {
                let RawComponent {
                    name,
                    repository,
                    tags,
                    repositories: raw_repositories,
                } = component;
                let fallback = tags.unwrap_or_else(|| defaults.clone());

                let mut repositories = Vec::new();
                if let Some(url) = repository {
                    repositories.push(MappedRepository {
                        url,
                        tags: dedup_tags(fallback.clone()),
                    });
                }
                for repository in raw_repositories {
                    repositories.push(MappedRepository {
                        url: repository.url,
                        tags: dedup_tags(repository.tags.unwrap_or_else(|| fallback.clone())),
                    });
                }
                MappedComponent { name, repositories }
            })
            .collect();

        Ok(Self { components })
    }

    /// Tags of the first entry publishing `repository`
    pub fn tags_for(&self, repository: &str) -> Option<&[String]> {
        self.components
            .iter()
            .flat_map(|c| c.repositories.iter())
            .find(|r| r.url == repository)
            .map(|r| r.tags.as_slice())
    }
}

/// Drop repeated tags, keeping the first occurrence
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Admissions in `namespace` that publish the target image's repository
///
/// An admission without a payload, or with one that does not decode, is
/// simply not a match.
pub async fn matching_admissions(
    lookup: &Lookup<'_>,
    namespace: &str,
) -> Result<Vec<Node>, TraversalError> {
    let repository = lookup.target().familiar_name();
    let admissions = lookup.list_admissions(namespace).await?;

    let roots: Vec<Node> = admissions
        .into_iter()
        .filter_map(|admission| {
            let data = admission.spec.data.as_ref()?;
            let mapping = match AdmissionMapping::decode(data) {
                Ok(mapping) => mapping,
                Err(e) => {
                    tracing::debug!(
                        "Ignoring ReleasePlanAdmission {}: undecodable mapping: {}",
                        admission.name_any(),
                        e
                    );
                    return None;
                }
            };
            let tags = mapping.tags_for(&repository)?.to_vec();
            Some(Node::Admission(AdmissionNode::new(admission, tags)))
        })
        .collect();

    tracing::debug!(
        "{} ReleasePlanAdmission(s) in {} publish {}",
        roots.len(),
        namespace,
        repository
    );
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_flat_mapping() {
        let mapping = AdmissionMapping::decode(&json!({
            "mapping": {
                "components": [
                    { "name": "comp1", "repository": "registry.io/ns/app", "tags": ["v1", "latest"] }
                ]
            }
        }))
        .unwrap();

        assert_eq!(
            mapping.tags_for("registry.io/ns/app"),
            Some(&["v1".to_string(), "latest".to_string()][..])
        );
        assert_eq!(mapping.tags_for("registry.io/ns/other"), None);
    }

    #[test]
    fn test_decode_per_repository_mapping() {
        let mapping = AdmissionMapping::decode(&json!({
            "mapping": {
                "components": [{
                    "name": "comp1",
                    "repositories": [
                        { "url": "quay.io/a/comp1", "tags": ["a"] },
                        { "url": "quay.io/b/comp1", "tags": ["b"] }
                    ]
                }]
            }
        }))
        .unwrap();

        assert_eq!(
            mapping.tags_for("quay.io/b/comp1"),
            Some(&["b".to_string()][..])
        );
        assert_eq!(mapping.components[0].repositories.len(), 2);
    }

    #[test]
    fn test_default_tags_fill_missing_entries() {
        let mapping = AdmissionMapping::decode(&json!({
            "mapping": {
                "defaults": { "tags": ["latest", "{{ git_sha }}"] },
                "components": [
                    { "name": "comp1", "repository": "quay.io/org/comp1" },
                    { "name": "comp2", "repositories": [{ "url": "quay.io/org/comp2" }] }
                ]
            }
        }))
        .unwrap();

        let expected = ["latest".to_string(), "{{ git_sha }}".to_string()];
        assert_eq!(mapping.tags_for("quay.io/org/comp1"), Some(&expected[..]));
        assert_eq!(mapping.tags_for("quay.io/org/comp2"), Some(&expected[..]));
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let mapping = AdmissionMapping::decode(&json!({
            "mapping": {
                "components": [
                    { "name": "first", "repository": "quay.io/org/app", "tags": ["one"] },
                    { "name": "second", "repository": "quay.io/org/app", "tags": ["two"] }
                ]
            }
        }))
        .unwrap();

        assert_eq!(
            mapping.tags_for("quay.io/org/app"),
            Some(&["one".to_string()][..])
        );
    }

    #[test]
    fn test_tags_are_deduplicated_in_order() {
        assert_eq!(
            dedup_tags(vec![
                "v1".to_string(),
                "latest".to_string(),
                "v1".to_string()
            ]),
            vec!["v1".to_string(), "latest".to_string()]
        );
    }

    #[test]
    fn test_unnamed_component_does_not_hide_others() {
        let mapping = AdmissionMapping::decode(&json!({
            "mapping": {
                "components": [
                    { "repository": "quay.io/x/other", "tags": ["a"] },
                    { "name": "comp1", "repository": "registry.io/ns/app", "tags": ["v1"] }
                ]
            }
        }))
        .unwrap();

        assert_eq!(mapping.components[0].name, "");
        assert_eq!(
            mapping.tags_for("registry.io/ns/app"),
            Some(&["v1".to_string()][..])
        );
    }

    #[test]
    fn test_decode_failure() {
        assert!(AdmissionMapping::decode(&json!({ "mapping": { "components": "oops" } })).is_err());
        assert!(AdmissionMapping::decode(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_missing_mapping_decodes_empty() {
        let mapping = AdmissionMapping::decode(&json!({ "releaseNotes": {} })).unwrap();
        assert!(mapping.components.is_empty());
    }
}
