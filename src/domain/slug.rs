//! Slug derivation and shared format checks.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ModelError, Result};

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// Derive a URL-safe slug from a title: lowercase, hyphenated,
/// everything outside [a-z0-9] collapsed to single hyphens.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_hyphen = true;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            out.push('-');
            last_hyphen = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Validate an already-derived slug.
pub fn check_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || !SLUG_RE.is_match(slug) {
        return Err(ModelError::validation(format!(
            "slug '{slug}' is not URL-safe (expected lowercase hyphenated)"
        )));
    }
    Ok(())
}

pub fn check_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(ModelError::validation(format!("malformed email '{email}'")));
    }
    Ok(())
}

/// Reject empty / whitespace-only required text fields.
pub fn check_required(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ModelError::validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Annual Reunion 2025!"), "annual-reunion-2025");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn slug_format_rejects_uppercase_and_spaces() {
        assert!(check_slug("annual-reunion-2025").is_ok());
        assert!(check_slug("Annual-Reunion").is_err());
        assert!(check_slug("two words").is_err());
        assert!(check_slug("").is_err());
        assert!(check_slug("-leading").is_err());
    }

    #[test]
    fn email_format() {
        assert!(check_email("a@x.com").is_ok());
        assert!(check_email("first.last+tag@alumni.example.org").is_ok());
        assert!(check_email("not-an-email").is_err());
        assert!(check_email("missing@tld").is_err());
    }
}
