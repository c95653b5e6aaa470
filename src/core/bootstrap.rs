//! Host-side bootstrap phase
//!
//! Builds the disposable build environment, runs the publish phase inside
//! it, and guarantees the environment is removed afterward.

use crate::{
    config::Config,
    core::image::{EphemeralImage, ensure_engine},
    error::{PublisherError, Result},
};
use tracing::{info, instrument};

/// Orchestrates the ephemeral environment around the publish phase
pub struct Bootstrapper {
    config: Config,
}

impl Bootstrapper {
    /// Create a new bootstrapper with the given configuration
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the image, run `publish` inside it, and remove the image.
    ///
    /// The image handle is scoped to this function, so removal happens on
    /// every exit path. The publish outcome is returned unchanged after
    /// cleanup.
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<()> {
        if self.config.inside_container {
            return Err(PublisherError::validation(
                "Already inside the ephemeral build environment; \
                 bootstrap must run on the host",
            ));
        }

        ensure_engine(&self.config)?;

        let image = EphemeralImage::build(&self.config)?;
        info!("Ephemeral environment ready: {}", image.tag());

        let outcome = image.run_publisher(&self.config);

        if outcome.is_ok() {
            info!("Publish completed successfully inside {}", image.tag());
        }

        // `image` drops here, removing the environment whatever the outcome
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_stub_engine(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("engine");
        let log = dir.path().join("engine.log");
        let script = format!("#!/bin/sh\necho \"$1\" >> {}\n{}\n", log.display(), body);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn engine_calls(dir: &TempDir) -> Vec<String> {
        fs::read_to_string(dir.path().join("engine.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn create_test_config(dir: &TempDir, engine: &PathBuf) -> Config {
        let mut config = Config::default();
        config.work_dir = dir.path().to_path_buf();
        config.image.engine = engine.to_string_lossy().to_string();
        config.image.build_file = dir.path().join("Dockerfile.publish");
        fs::write(&config.image.build_file, "FROM scratch\n").unwrap();
        config
    }

    #[test]
    fn test_refuses_to_run_inside_container() {
        let dir = TempDir::new().unwrap();
        let engine = create_stub_engine(&dir, "exit 0");
        let mut config = create_test_config(&dir, &engine);
        config.inside_container = true;

        let result = Bootstrapper::new(config).run();
        assert!(matches!(result, Err(PublisherError::Validation { .. })));
        assert!(engine_calls(&dir).is_empty());
    }

    #[test]
    fn test_full_run_builds_runs_and_removes() {
        let dir = TempDir::new().unwrap();
        let engine = create_stub_engine(&dir, "exit 0");
        let config = create_test_config(&dir, &engine);

        let result = Bootstrapper::new(config).run();
        assert!(result.is_ok());
        assert_eq!(engine_calls(&dir), vec!["build", "run", "rmi"]);
    }

    #[test]
    fn test_publish_failure_still_removes_image() {
        let dir = TempDir::new().unwrap();
        let engine = create_stub_engine(&dir, "[ \"$1\" = run ] && exit 7\nexit 0");
        let config = create_test_config(&dir, &engine);

        let result = Bootstrapper::new(config).run();
        assert!(result.is_err());
        assert_eq!(engine_calls(&dir), vec!["build", "run", "rmi"]);
    }

    #[test]
    fn test_build_failure_spawns_nothing() {
        let dir = TempDir::new().unwrap();
        let engine = create_stub_engine(&dir, "[ \"$1\" = build ] && exit 1\nexit 0");
        let config = create_test_config(&dir, &engine);

        let result = Bootstrapper::new(config).run();
        assert!(matches!(
            result,
            Err(PublisherError::EnvironmentConstruction { .. })
        ));
        assert_eq!(engine_calls(&dir), vec!["build"]);
    }

    #[test]
    fn test_missing_engine_fails_before_any_call() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.work_dir = dir.path().to_path_buf();
        config.image.engine = "nonexistent_engine_12345".to_string();
        fs::write(dir.path().join("Dockerfile.publish"), "FROM scratch\n").unwrap();

        let result = Bootstrapper::new(config).run();
        assert!(matches!(
            result,
            Err(PublisherError::EnvironmentConstruction { .. })
        ));
    }
}
