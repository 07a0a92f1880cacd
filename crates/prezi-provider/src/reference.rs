//! Prezi references: normalization and the URLs derived from them
//!
//! A reference is whatever the caller submitted: a bare presentation ID or a
//! URL containing one. It is normalized to a [`PreziId`] for storage; the
//! stricter URL shape check happens at resolution time.

use crate::error::{InvalidReferenceError, ResolveError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Host used for both the reference and the canonical fetch URL
pub const PREZI_HOST: &str = "prezi.com";

/// Default base for metadata fetches
pub const DEFAULT_FETCH_BASE: &str = "https://prezi.com";

/// Stored provider reference for a presentation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreziId(String);

impl PreziId {
    /// Wrap an already-normalized reference without further checks
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check if the reference is a bare `[a-z0-9]+` ID
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl std::fmt::Display for PreziId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PreziId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn embedded_id_regex() -> &'static Regex {
    static EMBEDDED_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    EMBEDDED_ID_REGEX.get_or_init(|| {
        Regex::new(r"(?i)prezi\.com/(?:view/)?([a-z0-9]+)").expect("valid embedded id regex")
    })
}

fn reference_url_regex() -> &'static Regex {
    static REFERENCE_URL_REGEX: OnceLock<Regex> = OnceLock::new();
    REFERENCE_URL_REGEX.get_or_init(|| {
        // ID must end at a path, query or fragment boundary
        Regex::new(r"(?i)^https?://prezi\.com/view/([a-z0-9]+)(?:[/?#]|$)")
            .expect("valid reference url regex")
    })
}

/// Normalize a submitted reference to a [`PreziId`]
///
/// If the input contains a Prezi URL, the ID segment is extracted and the
/// rest discarded. Otherwise the trimmed input is kept as-is. Only empty
/// input is rejected.
///
/// # Examples
/// ```
/// use prezi_provider::reference::normalize;
///
/// let id = normalize("https://prezi.com/view/abc123xyz/").unwrap();
/// assert_eq!(id.as_str(), "abc123xyz");
///
/// let id = normalize("abc123xyz").unwrap();
/// assert_eq!(id.as_str(), "abc123xyz");
/// ```
pub fn normalize(raw: &str) -> Result<PreziId, InvalidReferenceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidReferenceError {
            input: raw.to_string(),
        });
    }

    let id = embedded_id_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    Ok(PreziId::new(id))
}

/// Build the user-facing reference URL, `http://prezi.com/view/{id}`
pub fn reference_url(id: &PreziId) -> String {
    format!("http://{}/view/{}", PREZI_HOST, id)
}

/// Validate a reference URL and extract the presentation ID from it
///
/// The whole URL must be `http(s)://prezi.com/view/{id}`, with the ID
/// ending at `/`, `?`, `#` or the end of the string. This is stricter than
/// an unanchored prefix match on purpose: `http://prezi.com/view/abc-def`
/// is rejected rather than silently resolved as `abc`.
pub fn parse_reference_url(url: &str) -> Result<PreziId, ResolveError> {
    reference_url_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| PreziId::new(m.as_str()))
        .ok_or_else(|| ResolveError::InvalidReference {
            url: url.to_string(),
        })
}

/// Build the metadata fetch URL, `{base}/view/{id}/`
///
/// With the default base this is the canonical
/// `https://prezi.com/view/{id}/`.
pub fn fetch_url(base: &str, id: &PreziId) -> String {
    format!("{}/view/{}/", base.trim_end_matches('/'), id)
}

/// Canonical fetch URL on the public Prezi host
pub fn canonical_url(id: &PreziId) -> String {
    fetch_url(DEFAULT_FETCH_BASE, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_id() {
        assert_eq!(normalize("abc123xyz").unwrap().as_str(), "abc123xyz");
    }

    #[test]
    fn test_normalize_view_url() {
        let id = normalize("https://prezi.com/view/abc123xyz/").unwrap();
        assert_eq!(id.as_str(), "abc123xyz");
    }

    #[test]
    fn test_normalize_url_with_trailing_parts() {
        let id = normalize("see http://PREZI.com/view/Ab12Cd/?utm=share#slide-3").unwrap();
        assert_eq!(id.as_str(), "Ab12Cd");
    }

    #[test]
    fn test_normalize_url_without_view_segment() {
        let id = normalize("https://prezi.com/q1w2e3r4/my-deck/").unwrap();
        assert_eq!(id.as_str(), "q1w2e3r4");
    }

    #[test]
    fn test_normalize_unrecognized_input_is_kept() {
        assert_eq!(normalize("  not-a-url ").unwrap().as_str(), "not-a-url");
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(normalize("").is_err());
        assert!(normalize(" \t\n").is_err());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "https://prezi.com/view/abc123xyz/",
            "http://prezi.com/view/ZZ9/",
            "prezi.com/view/deadbeef",
            "Check out https://prezi.com/p1a2b3/title-slug/ now",
        ];
        for input in inputs {
            let once = normalize(input).unwrap();
            let twice = normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_reference_url() {
        let id = PreziId::new("abc123xyz");
        assert_eq!(reference_url(&id), "http://prezi.com/view/abc123xyz");
    }

    #[test]
    fn test_parse_reference_url() {
        let id = parse_reference_url("http://prezi.com/view/abc123xyz").unwrap();
        assert_eq!(id.as_str(), "abc123xyz");

        let id = parse_reference_url("https://Prezi.com/view/ABC/extra").unwrap();
        assert_eq!(id.as_str(), "ABC");
    }

    #[test]
    fn test_parse_reference_url_rejects_garbage() {
        for url in [
            "not-a-url",
            "http://prezi.com/view/",
            "http://prezi.com/view/not-a-url",
            "http://example.com/view/abc",
            "ftp://prezi.com/view/abc",
        ] {
            let err = parse_reference_url(url).unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidReference { ref url } if !url.is_empty()),
                "expected rejection of {url}"
            );
        }
    }

    #[test]
    fn test_parse_reference_url_rejects_id_followed_by_junk_instead_of_truncating() {
        for url in [
            "http://prezi.com/view/abc-def",
            "http://prezi.com/view/abc_def/",
            "http://prezi.com/view/abc.html",
            " http://prezi.com/view/abc",
        ] {
            assert!(
                parse_reference_url(url).is_err(),
                "{url} should not resolve to a truncated id"
            );
        }

        // Boundaries after the ID are accepted
        for url in [
            "http://prezi.com/view/abc/",
            "http://prezi.com/view/abc?utm=share",
            "http://prezi.com/view/abc#slide-2",
        ] {
            assert_eq!(parse_reference_url(url).unwrap().as_str(), "abc");
        }
    }

    #[test]
    fn test_fetch_url_is_canonical() {
        for id in ["abc123xyz", "0", "q9w8e7"] {
            let id = PreziId::new(id);
            assert_eq!(canonical_url(&id), format!("https://prezi.com/view/{id}/"));
        }
    }

    #[test]
    fn test_fetch_url_custom_base() {
        let id = PreziId::new("abc");
        assert_eq!(fetch_url("http://127.0.0.1:9000/", &id), "http://127.0.0.1:9000/view/abc/");
    }

    #[test]
    fn test_well_formed() {
        assert!(PreziId::new("abc123").is_well_formed());
        assert!(!PreziId::new("abc-123").is_well_formed());
        assert!(!PreziId::new("").is_well_formed());
    }

    #[test]
    fn test_serde_transparent() {
        let id = PreziId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
