//! Kubernetes cluster access
//!
//! Builds the kube client and exposes it to the provenance walk as a
//! [`ResourceReader`](crate::provenance::ResourceReader).
//!
//! Supports HTTP/HTTPS proxy configuration via standard environment variables
//! (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY`), handled by kube-rs itself.

mod reader;

pub use reader::KubeReader;

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

/// Initialize and return a Kubernetes client
///
/// Without an explicit context the default loading strategy applies:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client(context: Option<&str>) -> Result<Client> {
    let config = match context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("Failed to load kubeconfig context '{}'", context))?
        }
        None => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    tracing::debug!("Connecting to Kubernetes API at {}", config.cluster_url);
    Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Name of the kubeconfig's current context, if one is set
pub fn current_context() -> Option<String> {
    Kubeconfig::read().ok().and_then(|kc| kc.current_context)
}
