//! Ephemeral build image lifecycle
//!
//! Owns the disposable container image for one invocation. The image is
//! removed when the handle is dropped, so every exit path of the bootstrap
//! scope tears the environment down, including errors and panics.

use crate::{
    config::{CONTAINER_MARKER, Config},
    error::{PublisherError, Result},
    utils::process::ProcessRunner,
};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Handle to a disposable container image, removed on drop
pub struct EphemeralImage {
    tag: String,
    engine: String,
    runner: ProcessRunner,
}

impl EphemeralImage {
    /// Derive a per-invocation image tag from the configured prefix.
    ///
    /// The timestamp plus process id keeps concurrent invocations from
    /// sharing an image.
    pub fn generate_tag(prefix: &str) -> String {
        format!(
            "{}-{}-{}",
            prefix,
            Utc::now().format("%Y%m%d%H%M%S"),
            std::process::id()
        )
    }

    /// Build the ephemeral image described by the configuration.
    ///
    /// On success the returned handle owns the image; nothing is created
    /// (and nothing will be removed) when the build fails.
    #[instrument(skip(config))]
    pub fn build(config: &Config) -> Result<Self> {
        let build_file = &config.image.build_file;
        if !config.work_dir.join(build_file).exists() && !build_file.exists() {
            return Err(PublisherError::environment(format!(
                "Build description not found: {}",
                build_file.display()
            )));
        }

        let tag = Self::generate_tag(&config.image.name_prefix);
        let runner = ProcessRunner::new(config.debug);

        info!("Building ephemeral image: {}", tag);

        let build_file_str = build_file.to_string_lossy();
        let work_dir_str = config.work_dir.to_string_lossy();
        runner
            .run_command(
                &config.image.engine,
                &["build", "-f", &build_file_str, "-t", &tag, &work_dir_str],
            )
            .map_err(|e| PublisherError::EnvironmentConstruction {
                message: format!("Image build failed for {tag}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            tag,
            engine: config.image.engine.clone(),
            runner,
        })
    }

    /// Tag of the owned image
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Run the publish phase inside a container of this image.
    ///
    /// The source tree is mounted at /workspace, the container marker is set,
    /// and stdio is inherited so build and upload logs stream to the caller.
    #[instrument(skip(self, config))]
    pub fn run_publisher(&self, config: &Config) -> Result<()> {
        let work_dir = std::fs::canonicalize(&config.work_dir)
            .map_err(|e| PublisherError::file_system("canonicalize", &config.work_dir, e))?;
        let mount = format!("{}:/workspace", work_dir.display());
        let marker = format!("{}=1", CONTAINER_MARKER);

        let mut args: Vec<&str> = vec![
            "run",
            "--rm",
            "-e",
            &marker,
            "-v",
            &mount,
            "-w",
            "/workspace",
            &self.tag,
            "publisher",
            "publish",
        ];
        if config.debug {
            args.push("--debug");
        }

        info!("Running publish inside container of {}", self.tag);

        let timeout = config.image.timeout_secs.map(Duration::from_secs);
        self.runner
            .run_command_with_timeout(&config.image.engine, &args, timeout)
    }
}

impl Drop for EphemeralImage {
    fn drop(&mut self) {
        debug!("Removing ephemeral image: {}", self.tag);

        // Best effort: a leaked image does not invalidate the publish outcome
        match self
            .runner
            .run_command_with_output(&self.engine, &["rmi", "-f", &self.tag])
        {
            Ok(_) => info!("Removed ephemeral image: {}", self.tag),
            Err(e) => warn!(
                "Failed to remove ephemeral image {} (remove it manually): {}",
                self.tag, e
            ),
        }
    }
}

/// Locate the engine binary, failing with a construction error when absent
pub fn ensure_engine(config: &Config) -> Result<()> {
    let runner = ProcessRunner::new(config.debug);

    if !runner.tool_available(&config.image.engine) {
        return Err(PublisherError::environment(format!(
            "Container engine not available: {}",
            config.image.engine
        )));
    }
    Ok(())
}
