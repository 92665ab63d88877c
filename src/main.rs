//! konfluxctl - Konflux release provenance for container images
//!
//! `konfluxctl image metadata --image <ref>` answers which commit, snapshot
//! and release produced an image digest.

use anyhow::Result;
use clap::{Parser, Subcommand};
use konfluxctl::cli::{self, ConfigSubcommand, ImageSubcommand};

/// konfluxctl - Konflux release provenance for container images
#[derive(Parser, Debug)]
#[command(name = "konfluxctl")]
#[command(about = "Konflux release provenance for container images", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Docker/OCI image related utility
    Image {
        #[command(subcommand)]
        subcommand: ImageSubcommand,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Print the version number of konfluxctl
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Print log file location to stderr so it doesn't mix with rendered output
    if let Some(log_path) = cli::init_logging(args.debug)? {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
        tracing::debug!("Debug logging enabled");
    }

    match args.command {
        Command::Image { subcommand } => cli::handle_image_command(subcommand).await,
        Command::Config { subcommand } => cli::handle_config_command(subcommand),
        Command::Version => {
            cli::display_version();
            Ok(())
        }
    }
}
