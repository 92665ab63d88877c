//! konfluxctl library
//!
//! Reconstructs the provenance of Konflux-built container images: given an
//! image digest, find the source commit, build snapshot and release that
//! produced it. Used by the `konfluxctl` binary and by the tests.

pub mod cli;
pub mod cluster;
pub mod config;
pub mod image;
pub mod models;
pub mod provenance;

// Re-export commonly used types for convenience
pub use image::{ImageReference, ImageReferenceError};
pub use provenance::{
    OutputFormat, ProvenancePath, ReadError, ResourceReader, TraversalError, TraversalOptions,
    find_provenance, render_paths,
};
