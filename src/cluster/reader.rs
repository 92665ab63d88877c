//! [`ResourceReader`] backed by the Kubernetes API

use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::api::ListParams;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::models::{Application, Release, ReleasePlan, ReleasePlanAdmission, Snapshot};
use crate::provenance::{ReadError, ResourceReader};

/// Reads Konflux records through a kube client
#[derive(Clone)]
pub struct KubeReader {
    client: Client,
}

impl KubeReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn list<K>(&self, kind: &'static str, namespace: &str) -> Result<Vec<K>, ReadError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug
            + Send
            + Sync
            + 'static,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.list(&ListParams::default())
            .await
            .map(|list| list.items)
            .map_err(|e| read_error(kind, namespace, None, e))
    }

    async fn get<K>(&self, kind: &'static str, namespace: &str, name: &str) -> Result<K, ReadError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug
            + Send
            + Sync
            + 'static,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| read_error(kind, namespace, Some(name), e))
    }
}

/// 404s on a named read become `NotFound`; everything else keeps the kube error
fn read_error(
    kind: &'static str,
    namespace: &str,
    name: Option<&str>,
    error: kube::Error,
) -> ReadError {
    match (&error, name) {
        (kube::Error::Api(response), Some(name)) if response.code == 404 => ReadError::NotFound {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        _ => ReadError::Api {
            kind,
            namespace: namespace.to_string(),
            source: error,
        },
    }
}

#[async_trait]
impl ResourceReader for KubeReader {
    async fn list_admissions(
        &self,
        namespace: &str,
    ) -> Result<Vec<ReleasePlanAdmission>, ReadError> {
        self.list("ReleasePlanAdmission", namespace).await
    }

    async fn get_plan(&self, namespace: &str, name: &str) -> Result<ReleasePlan, ReadError> {
        self.get("ReleasePlan", namespace, name).await
    }

    async fn list_releases(&self, namespace: &str) -> Result<Vec<Release>, ReadError> {
        self.list("Release", namespace).await
    }

    async fn get_snapshot(&self, namespace: &str, name: &str) -> Result<Snapshot, ReadError> {
        self.get("Snapshot", namespace, name).await
    }

    async fn get_application(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Application, ReadError> {
        self.get("Application", namespace, name).await
    }
}
