// ABOUTME: Container image reference parsing and validation.
// ABOUTME: Accepts name, name:tag, and registry/name:tag forms.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("image reference has an empty tag: {0}")]
    EmptyTag(String),
}

/// An image as the engine CLI expects it on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: String,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = input
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_'))
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        // A colon followed by a slash belongs to a registry port, not a tag.
        let (repository, tag) = match input.rsplit_once(':') {
            Some((_, tag)) if tag.contains('/') => (input, "latest"),
            Some((_, "")) => return Err(ParseImageRefError::EmptyTag(input.to_string())),
            Some((repository, tag)) => (repository, tag),
            None => (input, "latest"),
        };

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
