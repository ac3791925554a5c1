// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates image references while the YAML is being read.

use serde::Deserialize;

use crate::types::ImageRef;

pub fn deserialize_image_ref<'de, D>(deserializer: D) -> Result<ImageRef, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageRef::parse(&s).map_err(serde::de::Error::custom)
}
