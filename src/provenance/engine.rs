//! Depth-first walk over the release graph

use tokio_util::sync::CancellationToken;

use super::TraversalError;
use super::admission::matching_admissions;
use super::node::Node;
use super::path::ProvenancePath;
use super::reader::{Lookup, ResourceReader};
use crate::image::ImageReference;

/// Namespace holding the ReleasePlanAdmissions of the managed release pipeline
pub const DEFAULT_ADMISSION_NAMESPACE: &str = "rhtap-releng-tenant";

/// Knobs for a provenance lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Namespace searched for ReleasePlanAdmissions
    pub admission_namespace: String,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            admission_namespace: DEFAULT_ADMISSION_NAMESPACE.to_string(),
        }
    }
}

/// Reconstruct every complete release chain that produced `target`
///
/// An empty result is a valid answer: nothing released this digest.
pub async fn find_provenance(
    reader: &dyn ResourceReader,
    target: &ImageReference,
    options: &TraversalOptions,
    cancel: &CancellationToken,
) -> Result<Vec<ProvenancePath>, TraversalError> {
    let lookup = Lookup::new(reader, target, cancel);
    lookup.ensure_active()?;

    let roots = matching_admissions(&lookup, &options.admission_namespace).await?;
    depth_first_search(&lookup, roots).await
}

/// Walk from `roots` and collect the complete paths
///
/// Uses an explicit stack: a node's children are pushed in enumeration
/// order and popped before anything pushed earlier, so one branch is
/// followed to its leaf before its siblings and before the next root.
pub async fn depth_first_search(
    lookup: &Lookup<'_>,
    roots: Vec<Node>,
) -> Result<Vec<ProvenancePath>, TraversalError> {
    let mut stack: Vec<(Node, ProvenancePath)> = roots
        .into_iter()
        .rev()
        .map(|node| (node, ProvenancePath::new()))
        .collect();
    let mut complete = Vec::new();

    while let Some((node, mut path)) = stack.pop() {
        lookup.ensure_active()?;
        tracing::debug!("Visiting {}", node.describe());

        node.apply(&mut path);
        let children = node.children(lookup).await?;
        for child in children {
            stack.push((child, path.clone()));
        }

        if path.is_complete() {
            tracing::debug!("Complete path ending at {}", node.describe());
            complete.push(path);
        }
    }

    Ok(complete)
}
