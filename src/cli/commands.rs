//! Command implementations for the CLI

use crate::{
    cli::Command,
    config::Config,
    core::{bootstrap::Bootstrapper, publish::Publisher},
};
use anyhow::Context;
use tracing::{info, instrument};

/// Execute the appropriate command based on CLI arguments
#[instrument(skip(config))]
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Bootstrap { .. } => execute_bootstrap_command(config),
        Command::Publish { .. } => execute_publish_command(config),
    }
}

/// Execute the bootstrap command
#[instrument(skip(config))]
fn execute_bootstrap_command(config: &Config) -> anyhow::Result<()> {
    info!("Publishing from a disposable build environment...");

    let bootstrapper = Bootstrapper::new(config.clone());
    bootstrapper.run().map_err(|e| {
        if let Some(code) = e.process_exit_code() {
            anyhow::Error::new(e).context(format!("Publish step failed with exit code {code}"))
        } else {
            anyhow::Error::new(e)
        }
    })?;

    info!("Publish pipeline completed successfully");
    Ok(())
}

/// Execute the publish command
#[instrument(skip(config))]
fn execute_publish_command(config: &Config) -> anyhow::Result<()> {
    info!(
        "Building and uploading the source distribution from: {}",
        config.publish.dist_dir.display()
    );

    let publisher = Publisher::new(config.clone());
    publisher
        .run()
        .context("Failed to build and upload the source distribution")?;

    info!("Source distribution published successfully");
    Ok(())
}
