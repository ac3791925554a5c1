// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Project slugs, image references, and phantom-typed resource IDs.

mod id;
mod image_ref;
mod slug;

pub use id::{ContainerId, NetworkId};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use slug::{Slug, SlugError};
