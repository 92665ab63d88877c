//! Output formatting for provenance paths

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::path::ProvenancePath;

const ABSENT: &str = "<none>";

/// Supported renderings of a provenance result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(anyhow::anyhow!(
                "Unknown output format '{}': expected yaml, json or text",
                other
            )),
        }
    }
}

/// Render a list of paths in the requested format
pub fn render_paths(paths: &[ProvenancePath], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(paths).context("Failed to serialize provenance to JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(paths).context("Failed to serialize provenance to YAML")
        }
        OutputFormat::Text => {
            if paths.is_empty() {
                return Ok("No provenance found\n".to_string());
            }
            let blocks: Vec<String> = paths.iter().map(render_text).collect();
            Ok(blocks.join("\n"))
        }
    }
}

/// Human-readable block for one path
pub fn render_text(path: &ProvenancePath) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or(ABSENT).to_string();
    let tags = if path.image_tags.is_empty() {
        ABSENT.to_string()
    } else {
        path.image_tags.join(",")
    };

    format!(
        "ReleasePlanAdmission: {}\n\
         ReleasePlan: {}\n\
         Release: {}\n\
         Advisory: {}\n\
         Application: {}\n\
         Snapshot: {}\n\
         Component: {}\n\
         Source URL: {}\n\
         Source Revision: {}\n\
         Image Tags: {}\n",
        field(&path.release_plan_admission),
        field(&path.release_plan),
        field(&path.release),
        field(&path.advisory_url),
        field(&path.application),
        field(&path.snapshot),
        field(&path.component_name),
        field(&path.source_url),
        field(&path.source_revision),
        tags,
    )
}
