//! URL slugs for markets.

use crate::error::{ExchangeError, Result};

/// Slug used when a question contains no usable characters.
pub const FALLBACK_SLUG: &str = "market";

/// Lower-case `value` and join its alphanumeric runs with single hyphens.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Whether `slug` is lower-case alphanumeric runs joined by single hyphens.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

/// First of `base`, `base-1`, `base-2`, … for which `exists` is false.
///
/// # Errors
///
/// Returns [`ExchangeError::SlugConflict`] once `max_attempts` candidates
/// are taken, or whatever `exists` fails with.
pub fn unique_slug<F>(base: &str, max_attempts: u32, mut exists: F) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    for attempt in 0..max_attempts {
        let candidate = if attempt == 0 {
            base.to_string()
        } else {
            format!("{base}-{attempt}")
        };
        if !exists(&candidate)? {
            return Ok(candidate);
        }
    }
    Err(ExchangeError::SlugConflict {
        slug: base.to_string(),
    }
    .into())
}
