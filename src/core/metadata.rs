//! Source tree metadata reading
//!
//! Reads the package name and version from the source tree before any
//! packaging tool runs, so malformed metadata fails the run early.

use crate::error::{PublisherError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Metadata extracted from the source tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SourceMetadata {
    /// Package name
    pub name: String,
    /// Package version
    pub version: String,
}

impl SourceMetadata {
    /// Expected basename of the built sdist archive (without extension)
    pub fn sdist_basename(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// Reader for the source tree's packaging metadata
pub struct MetadataReader {
    /// Regex accepting release versions with an optional pre/post/dev suffix
    re_version: Regex,
    /// Regex for the name argument in setup.py
    re_setup_name: Regex,
}

impl MetadataReader {
    /// Create a new metadata reader
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_version: Regex::new(r"^\d+(\.\d+)+((a|b|rc|\.post|\.dev)\d+)?$")
                .map_err(|e| PublisherError::config(format!("Failed to compile regex: {}", e)))?,
            re_setup_name: Regex::new(r#"name\s*=\s*["']([A-Za-z0-9._-]+)["']"#)
                .map_err(|e| PublisherError::config(format!("Failed to compile regex: {}", e)))?,
        })
    }

    /// Read and validate metadata from the given source tree
    #[instrument(skip(self))]
    pub fn read<P: AsRef<Path> + std::fmt::Debug>(&self, tree: P) -> Result<SourceMetadata> {
        let tree = tree.as_ref();

        let version = self.read_version(tree)?;
        let name = self.read_name(tree)?;

        debug!("Source metadata: name='{}', version='{}'", name, version);

        Ok(SourceMetadata { name, version })
    }

    /// Read the VERSION file and validate its contents
    fn read_version(&self, tree: &Path) -> Result<String> {
        let path = tree.join("VERSION");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| PublisherError::file_system("read", &path, e))?;

        let version = content.trim();
        if version.is_empty() {
            return Err(PublisherError::metadata("VERSION file is empty", &path));
        }

        if !self.re_version.is_match(version) {
            return Err(PublisherError::metadata(
                format!("Malformed version string: '{}'", version),
                &path,
            ));
        }

        Ok(version.to_string())
    }

    /// Extract the package name from setup.py
    fn read_name(&self, tree: &Path) -> Result<String> {
        let path = tree.join("setup.py");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| PublisherError::file_system("read", &path, e))?;

        self.re_setup_name
            .captures(&content)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                PublisherError::metadata(
                    "No name=\"...\" argument found in setup.py",
                    &path,
                )
            })
    }
}

impl Default for MetadataReader {
    fn default() -> Self {
        Self::new().expect("Failed to create default metadata reader")
    }
}
