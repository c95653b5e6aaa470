//! Container-side publish phase
//!
//! Builds a source distribution from the mounted tree and uploads every
//! artifact in the output directory to the configured registry.

use crate::{
    config::Config,
    core::metadata::MetadataReader,
    error::{PublisherError, Result},
    utils::process::ProcessRunner,
};
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Builds and uploads the source distribution
pub struct Publisher {
    config: Config,
    process_runner: ProcessRunner,
}

impl Publisher {
    /// Create a new publisher with the given configuration
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            process_runner: ProcessRunner::new(config.debug),
            config,
        }
    }

    /// Build the sdist and upload it.
    ///
    /// Refuses to run outside the ephemeral container. The upload step never
    /// runs after a failed build, and artifacts stay on disk after a failed
    /// upload so a rerun can republish them.
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<()> {
        if !self.config.inside_container {
            return Err(PublisherError::validation(
                "Refusing to package on the host; \
                 run `publisher bootstrap` to publish from a disposable container",
            ));
        }

        let reader = MetadataReader::new()?;
        let metadata = reader.read(&self.config.work_dir)?;
        info!("Publishing {}-{}", metadata.name, metadata.version);

        self.ensure_upload_tool()?;
        self.build_sdist()?;

        let artifacts = self.collect_artifacts()?;
        for artifact in &artifacts {
            if let Some(name) = artifact.file_name().and_then(|n| n.to_str()) {
                if !name.starts_with(&metadata.sdist_basename()) {
                    warn!(
                        "Artifact {} does not match expected {}-* naming",
                        name,
                        metadata.sdist_basename()
                    );
                }
            }
        }

        self.upload(&artifacts)?;

        info!(
            "Published {} artifact(s) for {}-{}",
            artifacts.len(),
            metadata.name,
            metadata.version
        );
        Ok(())
    }

    /// Make sure the upload tool is present, installing it when missing
    #[instrument(skip(self))]
    fn ensure_upload_tool(&self) -> Result<()> {
        if self.process_runner.tool_available(&self.config.publish.twine) {
            debug!("Upload tool {} already available", self.config.publish.twine);
            return Ok(());
        }

        info!(
            "Upload tool {} not found, installing it",
            self.config.publish.twine
        );
        self.process_runner
            .run_command_in_dir(
                &self.config.work_dir,
                &self.config.publish.python,
                &["-m", "pip", "install", &self.config.publish.twine],
            )
            .map_err(|e| PublisherError::Packaging {
                message: format!("Failed to install {}", self.config.publish.twine),
                source: Some(Box::new(e)),
            })
    }

    /// Build the source distribution into the output directory
    #[instrument(skip(self))]
    fn build_sdist(&self) -> Result<()> {
        let (cmd, args) = self.config.get_sdist_cmd();
        let args_str: Vec<&str> = args.iter().map(String::as_str).collect();

        info!("Building source distribution");
        self.process_runner
            .run_command_in_dir(&self.config.work_dir, &cmd, &args_str)
            .map_err(|e| PublisherError::Packaging {
                message: "Source distribution build failed".to_string(),
                source: Some(Box::new(e)),
            })
    }

    /// Find every artifact in the output directory
    fn collect_artifacts(&self) -> Result<Vec<PathBuf>> {
        let dist_dir = self.config.work_dir.join(&self.config.publish.dist_dir);
        let pattern = dist_dir.join("*").to_string_lossy().to_string();

        let mut artifacts = Vec::new();
        let paths = glob::glob(&pattern).map_err(|e| {
            PublisherError::packaging(format!("Failed to search for artifacts: {e}"))
        })?;
        for path in paths.flatten() {
            if path.is_file() {
                debug!("Found artifact: {}", path.display());
                artifacts.push(path);
            }
        }

        if artifacts.is_empty() {
            return Err(PublisherError::packaging(format!(
                "No artifacts found in {} after the build",
                dist_dir.display()
            )));
        }

        // Sort for consistent upload order
        artifacts.sort();
        Ok(artifacts)
    }

    /// Upload the given artifacts to the configured registry
    #[instrument(skip(self, artifacts))]
    fn upload(&self, artifacts: &[PathBuf]) -> Result<()> {
        let (cmd, mut args) = self.config.get_upload_cmd();
        for artifact in artifacts {
            args.push(artifact.to_string_lossy().to_string());
        }
        let args_str: Vec<&str> = args.iter().map(String::as_str).collect();

        info!("Uploading {} artifact(s) to the registry", artifacts.len());
        self.process_runner
            .run_command_in_dir(&self.config.work_dir, &cmd, &args_str)
            .map_err(|e| PublisherError::Publish {
                message: "Registry rejected the upload; artifacts were kept on disk".to_string(),
                artifacts: artifacts.to_vec(),
                source: Some(Box::new(e)),
            })
    }
}
