//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};

use crate::provenance::OutputFormat;
use crate::provenance::engine::DEFAULT_ADMISSION_NAMESPACE;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace searched for ReleasePlanAdmissions
    #[serde(default = "default_admission_namespace")]
    pub admission_namespace: String,

    /// Default rendering for `image metadata`
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Kubeconfig context to use instead of the current one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn default_admission_namespace() -> String {
    DEFAULT_ADMISSION_NAMESPACE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admission_namespace: default_admission_namespace(),
            output_format: OutputFormat::default(),
            context: None,
        }
    }
}
