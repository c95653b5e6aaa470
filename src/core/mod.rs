//! Core functionality for the two publish phases
//!
//! Contains the bootstrap orchestration, the ephemeral image lifecycle,
//! source metadata reading, and the packaging/upload pipeline.

pub mod bootstrap;
pub mod image;
pub mod metadata;
pub mod publish;

pub use bootstrap::Bootstrapper;
pub use image::EphemeralImage;
pub use metadata::{MetadataReader, SourceMetadata};
pub use publish::Publisher;
