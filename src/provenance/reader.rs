//! Read-only access to platform records
//!
//! The walk never talks to the Kubernetes API directly. It goes through
//! [`ResourceReader`], which the CLI backs with a kube client and the tests
//! back with in-memory fixtures.

use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use super::TraversalError;
use crate::image::ImageReference;
use crate::models::{Application, Release, ReleasePlan, ReleasePlanAdmission, Snapshot};

/// Failure of a single read against the platform
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("failed to read {kind} in namespace {namespace}: {source}")]
    Api {
        kind: &'static str,
        namespace: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to read {kind} in namespace {namespace}: {message}")]
    Unavailable {
        kind: &'static str,
        namespace: String,
        message: String,
    },
}

/// Namespace-scoped reads of the five record kinds
#[async_trait]
pub trait ResourceReader: Send + Sync {
    async fn list_admissions(
        &self,
        namespace: &str,
    ) -> Result<Vec<ReleasePlanAdmission>, ReadError>;

    async fn get_plan(&self, namespace: &str, name: &str) -> Result<ReleasePlan, ReadError>;

    async fn list_releases(&self, namespace: &str) -> Result<Vec<Release>, ReadError>;

    async fn get_snapshot(&self, namespace: &str, name: &str) -> Result<Snapshot, ReadError>;

    async fn get_application(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Application, ReadError>;
}

/// Everything a node needs to enumerate its children
///
/// Every read is raced against the cancellation token, so a cancelled
/// walk stops at the next await point even if the reader is blocked.
pub struct Lookup<'a> {
    reader: &'a dyn ResourceReader,
    target: &'a ImageReference,
    cancel: &'a CancellationToken,
}

impl<'a> Lookup<'a> {
    pub fn new(
        reader: &'a dyn ResourceReader,
        target: &'a ImageReference,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            reader,
            target,
            cancel,
        }
    }

    /// Image whose provenance is being reconstructed
    pub fn target(&self) -> &ImageReference {
        self.target
    }

    /// Fail with [`TraversalError::Cancelled`] if the caller gave up
    pub fn ensure_active(&self) -> Result<(), TraversalError> {
        if self.cancel.is_cancelled() {
            Err(TraversalError::Cancelled)
        } else {
            Ok(())
        }
    }

    async fn guarded<T, F>(&self, read: F) -> Result<T, TraversalError>
    where
        F: Future<Output = Result<T, ReadError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TraversalError::Cancelled),
            result = read => result.map_err(TraversalError::from),
        }
    }

    pub async fn list_admissions(
        &self,
        namespace: &str,
    ) -> Result<Vec<ReleasePlanAdmission>, TraversalError> {
        tracing::debug!("Listing ReleasePlanAdmissions in {}", namespace);
        self.guarded(self.reader.list_admissions(namespace)).await
    }

    pub async fn get_plan(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ReleasePlan, TraversalError> {
        tracing::debug!("Fetching ReleasePlan {}/{}", namespace, name);
        self.guarded(self.reader.get_plan(namespace, name)).await
    }

    pub async fn list_releases(&self, namespace: &str) -> Result<Vec<Release>, TraversalError> {
        tracing::debug!("Listing Releases in {}", namespace);
        self.guarded(self.reader.list_releases(namespace)).await
    }

    pub async fn get_snapshot(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Snapshot, TraversalError> {
        tracing::debug!("Fetching Snapshot {}/{}", namespace, name);
        self.guarded(self.reader.get_snapshot(namespace, name)).await
    }

    pub async fn get_application(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Application, TraversalError> {
        tracing::debug!("Fetching Application {}/{}", namespace, name);
        self.guarded(self.reader.get_application(namespace, name))
            .await
    }
}
