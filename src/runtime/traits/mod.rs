// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines ImageOps, ContainerOps, NetworkOps and the FullRuntime bundle.

mod container;
mod image;
mod network;
pub(crate) mod sealed;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{ImageError, ImageOps};
pub use network::{NetworkError, NetworkOps};
pub use shared_types::*;

/// Every capability the orchestrator needs from an engine.
pub trait FullRuntime: ImageOps + ContainerOps + NetworkOps {}

impl<T: ImageOps + ContainerOps + NetworkOps> FullRuntime for T {}
