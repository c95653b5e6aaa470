//! Command-line argument parsing and validation

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sdist Publisher - build and publish source distributions from a disposable container
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "publisher")]
pub struct Args {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to execute (defaults to `bootstrap`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the ephemeral image, run `publish` inside it, then remove the image
    Bootstrap {
        /// Container engine binary to use
        #[arg(long, default_value = "docker")]
        engine: String,

        /// Name prefix for the ephemeral image tag
        #[arg(long = "image-prefix", default_value = "sdist-publisher-build")]
        image_prefix: String,

        /// Build description file for the ephemeral image
        #[arg(long = "build-file", default_value = "Dockerfile.publish")]
        build_file: PathBuf,

        /// Upper bound in seconds for the containerized publish run
        #[arg(long = "timeout-secs")]
        timeout_secs: Option<u64>,
    },

    /// Build the sdist and upload it to the configured registry
    Publish {
        /// Output directory for built artifacts
        #[arg(short = 'd', long = "dist-dir", default_value = "dist")]
        dist_dir: PathBuf,

        /// Named credential profile in the registry configuration
        #[arg(short = 'r', long = "repository")]
        repository: Option<String>,

        /// Registry configuration file passed to the upload tool
        #[arg(long = "config-file")]
        config_file: Option<PathBuf>,
    },
}

impl Args {
    /// Resolve the command to run, defaulting to `bootstrap` when omitted
    pub fn effective_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Bootstrap {
            engine: "docker".to_string(),
            image_prefix: "sdist-publisher-build".to_string(),
            build_file: PathBuf::from("Dockerfile.publish"),
            timeout_secs: None,
        })
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
