//! Download redirects
//!
//! Presentations are never proxied: a download request is answered with a
//! redirect to Prezi's own viewer.

use crate::reference::{reference_url, PreziId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP status used for download redirects
pub const REDIRECT_STATUS: u16 = 302;

/// Target of a download redirect, `http://prezi.com/view/{id}`
pub fn download_target(reference: &PreziId) -> String {
    reference_url(reference)
}

/// Description of the redirect response the host should emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRedirect {
    /// HTTP status code (always 302)
    pub status: u16,
    /// Redirect target
    pub location: String,
    /// Response headers, including `Location`
    pub headers: HashMap<String, String>,
}

/// Build the redirect response for a download request
///
/// Caller headers are kept; `Location` always points at the viewer.
pub fn download_redirect(reference: &PreziId, headers: HashMap<String, String>) -> DownloadRedirect {
    let location = download_target(reference);

    let mut headers: HashMap<String, String> = headers
        .into_iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case("location"))
        .collect();
    headers.insert("Location".to_string(), location.clone());

    DownloadRedirect {
        status: REDIRECT_STATUS,
        location,
        headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_target() {
        assert_eq!(
            download_target(&PreziId::new("abc123xyz")),
            "http://prezi.com/view/abc123xyz"
        );
    }

    #[test]
    fn test_redirect_merges_headers() {
        let headers = HashMap::from([
            ("Cache-Control".to_string(), "no-store".to_string()),
            ("location".to_string(), "http://evil.example".to_string()),
        ]);
        let redirect = download_redirect(&PreziId::new("abc"), headers);

        assert_eq!(redirect.status, 302);
        assert_eq!(redirect.location, "http://prezi.com/view/abc");
        assert_eq!(redirect.headers.get("Cache-Control"), Some(&"no-store".to_string()));
        assert_eq!(
            redirect.headers.get("Location"),
            Some(&"http://prezi.com/view/abc".to_string())
        );
        assert!(!redirect.headers.contains_key("location"));
    }

    #[test]
    fn test_redirect_without_extra_headers() {
        let redirect = download_redirect(&PreziId::new("abc"), HashMap::new());
        assert_eq!(redirect.headers.len(), 1);
    }
}
