//! URL handling module for Topical-Crawler
//!
//! This module provides URL canonicalization (the identity used to
//! deduplicate the frontier) and origin extraction for robots.txt lookups.

mod canonicalize;
mod origin;

use std::fmt;

// Re-export main functions
pub use canonicalize::{canonicalize, try_canonicalize};
pub use origin::extract_origin;

/// A URL in canonical form
///
/// Values are only produced by [`canonicalize`], so two `CanonicalUrl`s compare
/// equal exactly when they denote the same resource under the canonicalization
/// rules. The string always has the shape `scheme://host[:port]/segment/.../`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    /// Returns the canonical URL string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the scheme, either `http` or `https`
    pub fn scheme(&self) -> &str {
        self.0.split_once("://").map(|(scheme, _)| scheme).unwrap_or("")
    }

    /// Returns the host segment (including any non-default port)
    ///
    /// This is the key used to group URLs for per-host politeness.
    pub fn host(&self) -> &str {
        self.0
            .split_once("://")
            .and_then(|(_, rest)| rest.split('/').next())
            .unwrap_or("")
    }

    /// Consumes the value, returning the canonical string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
