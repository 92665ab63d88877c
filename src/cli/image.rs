//! `image` command: provenance of a published image

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::cluster::{self, KubeReader};
use crate::config::ConfigLoader;
use crate::image::ImageReference;
use crate::provenance::{OutputFormat, TraversalOptions, find_provenance, render_paths};

/// Docker/OCI image subcommands
#[derive(Subcommand, Debug)]
pub enum ImageSubcommand {
    /// Show which release produced an image digest
    Metadata(MetadataArgs),
}

#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Image pull spec pinned by digest (e.g. quay.io/org/app@sha256:...)
    #[arg(long)]
    pub image: String,

    /// Output format
    #[arg(short = 'o', long = "output-format", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Namespace holding the ReleasePlanAdmissions
    #[arg(long)]
    pub admission_namespace: Option<String>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,
}

/// Handle image subcommands
pub async fn handle_image_command(cmd: ImageSubcommand) -> Result<()> {
    match cmd {
        ImageSubcommand::Metadata(args) => run_metadata(args).await,
    }
}

async fn run_metadata(args: MetadataArgs) -> Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;

    let target = ImageReference::parse(&args.image)
        .with_context(|| format!("Invalid image reference '{}'", args.image))?;
    let format = args.output_format.unwrap_or(config.output_format);
    let options = TraversalOptions {
        admission_namespace: args
            .admission_namespace
            .unwrap_or(config.admission_namespace),
    };
    let context = args.context.or(config.context);

    tracing::debug!(
        "Looking up provenance of {} (repository {}, context {})",
        target,
        target.familiar_name(),
        context
            .clone()
            .or_else(cluster::current_context)
            .unwrap_or_else(|| "<in-cluster>".to_string())
    );

    let client = cluster::create_client(context.as_deref()).await?;
    let reader = KubeReader::new(client);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupted, cancelling traversal");
                cancel.cancel();
            }
        })
    };

    let result = find_provenance(&reader, &target, &options, &cancel).await;
    interrupt.abort();

    let paths =
        result.with_context(|| format!("Failed to reconstruct provenance of {}", target))?;
    tracing::debug!("Found {} complete provenance path(s)", paths.len());

    let rendered = render_paths(&paths, format)?;
    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}
