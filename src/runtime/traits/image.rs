// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: Check existence and build images from a Dockerfile.

use super::sealed::Sealed;
use super::shared_types::BuildSpec;
use crate::runtime::CommandError;
use crate::types::ImageRef;
use async_trait::async_trait;

/// Image operations: check existence, build.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// Check if an image exists locally.
    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError>;

    /// Build an image, streaming the build log to the terminal.
    async fn build_image(&self, spec: &BuildSpec) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("build of {tag} failed: {status}")]
    BuildFailed { tag: String, status: String },

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl From<CommandError> for ImageError {
    fn from(err: CommandError) -> Self {
        ImageError::Runtime(err.to_string())
    }
}
