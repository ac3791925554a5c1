// ABOUTME: DNS-compatible project slug derived from a human-readable name.
// ABOUTME: Lowercase ASCII alphanumerics joined by single hyphens.

use std::fmt;
use thiserror::Error;

/// Longest slug accepted, matching an RFC 1123 label.
const MAX_LEN: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("project name cannot be empty")]
    Empty,

    #[error("project name {0:?} has no characters usable in a resource name")]
    NothingToSlug(String),

    #[error("project slug exceeds maximum length of 63 characters")]
    TooLong,
}

/// Normalized identity of a project.
///
/// Two calls with the same input always produce the same slug, so resource
/// names derived from it can be looked up again on the next invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a display name such as `"Demo Site"`.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SlugError::Empty);
        }

        let mut slug = String::with_capacity(trimmed.len());
        let mut pending_separator = false;
        let mut push = |c: char| {
            if c.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        };

        for c in trimmed.chars() {
            match fold_char(c) {
                Some(folded) => folded.chars().for_each(&mut push),
                None => push(c),
            }
        }

        if slug.is_empty() {
            return Err(SlugError::NothingToSlug(trimmed.to_string()));
        }
        if slug.len() > MAX_LEN {
            return Err(SlugError::TooLong);
        }

        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fold common accented Latin letters to their ASCII spelling.
fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => "a",
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => "e",
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => "i",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => "o",
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => "u",
        'ñ' | 'Ñ' => "n",
        'ç' | 'Ç' => "c",
        'ß' => "ss",
        '&' => " and ",
        _ => return None,
    };
    Some(folded)
}
