//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod image;
mod logging;
mod version;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use image::{ImageSubcommand, MetadataArgs, handle_image_command};
pub use logging::init_logging;
pub use version::{display_version, version_line};
