//! # Sdist Publisher
//!
//! A reliable tool for building and publishing Python source distributions
//! from a disposable container. The `bootstrap` command builds a throwaway
//! container image, runs the `publish` command inside it, and removes the
//! image afterward; the `publish` command builds the sdist and uploads it
//! to the configured package registry.
//!
//! ## Features
//!
//! - Ephemeral, reproducible build environments (docker or podman)
//! - Guaranteed image removal on every exit path, including failures
//! - Source metadata validation before any tooling runs
//! - Distinct packaging vs. upload error reporting
//! - Professional error handling and logging
//!
//! ## Example
//!
//! ```no_run
//! use sdist_publisher::core::metadata::MetadataReader;
//!
//! let reader = MetadataReader::new()?;
//! let metadata = reader.read(".")?;
//! println!("Package: {}-{}", metadata.name, metadata.version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
