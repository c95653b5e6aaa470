//! Configuration management for the publisher
//!
//! Centralizes configuration options and provides validation.

use crate::{cli::Args, error::PublisherError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment marker set inside the ephemeral build container.
///
/// Presence alone counts; the value is ignored.
pub const CONTAINER_MARKER: &str = "SDIST_PUBLISHER_CONTAINER";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Working directory holding the source tree
    pub work_dir: PathBuf,
    /// Whether this process runs inside the ephemeral container,
    /// read once from the environment at startup
    pub inside_container: bool,
    /// Ephemeral image configuration
    pub image: ImageConfig,
    /// Packaging and upload configuration
    pub publish: PublishConfig,
}

/// Ephemeral image configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Container engine binary (docker, podman)
    pub engine: String,
    /// Name prefix for the per-invocation image tag
    pub name_prefix: String,
    /// Build description file for the image
    pub build_file: PathBuf,
    /// Upper bound in seconds for the containerized publish run
    pub timeout_secs: Option<u64>,
}

/// Packaging and upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Python interpreter used for the sdist build
    pub python: String,
    /// Upload tool binary
    pub twine: String,
    /// Output directory for built artifacts
    pub dist_dir: PathBuf,
    /// Named credential profile in the registry configuration
    pub repository: Option<String>,
    /// Registry configuration file passed to the upload tool
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            work_dir: PathBuf::from("."),
            inside_container: false,
            image: ImageConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            engine: "docker".to_string(),
            name_prefix: "sdist-publisher-build".to_string(),
            build_file: PathBuf::from("Dockerfile.publish"),
            timeout_secs: None,
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            twine: "twine".to_string(),
            dist_dir: PathBuf::from("dist"),
            repository: None,
            config_file: None,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, PublisherError> {
        let mut config = Self {
            debug: args.debug,
            inside_container: std::env::var_os(CONTAINER_MARKER).is_some(),
            ..Self::default()
        };

        // Override with command-specific options
        match args.effective_command() {
            crate::cli::Command::Bootstrap {
                engine,
                image_prefix,
                build_file,
                timeout_secs,
            } => {
                config.image.engine = engine;
                config.image.name_prefix = image_prefix;
                config.image.build_file = build_file;
                config.image.timeout_secs = timeout_secs;
            }
            crate::cli::Command::Publish {
                dist_dir,
                repository,
                config_file,
            } => {
                config.publish.dist_dir = dist_dir;
                config.publish.repository = repository;
                config.publish.config_file = config_file;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), PublisherError> {
        if !self.work_dir.exists() {
            return Err(PublisherError::validation(format!(
                "Working directory not found: {}",
                self.work_dir.display()
            )));
        }

        if self.image.name_prefix.is_empty() {
            return Err(PublisherError::validation(
                "Image name prefix must not be empty",
            ));
        }

        if let Some(0) = self.image.timeout_secs {
            return Err(PublisherError::validation(
                "Timeout must be at least one second",
            ));
        }

        Ok(())
    }

    /// Get the sdist build command with arguments
    pub fn get_sdist_cmd(&self) -> (String, Vec<String>) {
        (
            self.publish.python.clone(),
            vec![
                "setup.py".to_string(),
                "sdist".to_string(),
                "--dist-dir".to_string(),
                self.publish.dist_dir.to_string_lossy().to_string(),
            ],
        )
    }

    /// Get the upload command with arguments (artifact paths appended by the caller)
    pub fn get_upload_cmd(&self) -> (String, Vec<String>) {
        let mut args = vec!["upload".to_string()];

        if let Some(repository) = &self.publish.repository {
            args.push("--repository".to_string());
            args.push(repository.clone());
        }

        if let Some(config_file) = &self.publish.config_file {
            args.push("--config-file".to_string());
            args.push(config_file.to_string_lossy().to_string());
        }

        (self.publish.twine.clone(), args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.debug);
        assert!(!config.inside_container);
        assert_eq!(config.image.engine, "docker");
        assert_eq!(config.publish.dist_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_from_args_bootstrap_overrides() {
        let args = Args::try_parse_from([
            "publisher",
            "bootstrap",
            "--engine",
            "podman",
            "--image-prefix",
            "throwaway",
            "--timeout-secs",
            "120",
        ])
        .unwrap();

        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.image.engine, "podman");
        assert_eq!(config.image.name_prefix, "throwaway");
        assert_eq!(config.image.timeout_secs, Some(120));
    }

    #[test]
    fn test_from_args_publish_overrides() {
        let args = Args::try_parse_from([
            "publisher",
            "publish",
            "--dist-dir",
            "out",
            "--repository",
            "internal",
        ])
        .unwrap();

        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.publish.dist_dir, PathBuf::from("out"));
        assert_eq!(config.publish.repository.as_deref(), Some("internal"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.image.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut config = Config::default();
        config.image.name_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_get_upload_cmd_with_profile() {
        let mut config = Config::default();
        config.publish.repository = Some("internal".to_string());
        config.publish.config_file = Some(PathBuf::from(".pypirc"));

        let (cmd, args) = config.get_upload_cmd();
        assert_eq!(cmd, "twine");
        assert_eq!(
            args,
            vec!["upload", "--repository", "internal", "--config-file", ".pypirc"]
        );
    }

    #[test]
    fn test_get_sdist_cmd() {
        let config = Config::default();
        let (cmd, args) = config.get_sdist_cmd();
        assert_eq!(cmd, "python3");
        assert_eq!(args, vec!["setup.py", "sdist", "--dist-dir", "dist"]);
    }
}
