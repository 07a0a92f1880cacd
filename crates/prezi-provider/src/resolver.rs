//! Metadata resolution for Prezi presentations
//!
//! Validates a reference, fetches the public presentation page, scrapes its
//! Open Graph tags and probes the preview image's size. Only an invalid
//! reference or a failed page fetch abort a resolution; everything after the
//! page has been retrieved degrades to empty strings and 0×0.

use crate::error::{ProbeError, ResolveError, Result};
use crate::opengraph::OpenGraph;
use crate::probe::{probe_dimensions, ImageDimensions};
use crate::reference::{fetch_url, parse_reference_url, reference_url, PreziId, DEFAULT_FETCH_BASE};
use async_trait::async_trait;
use networking::{HttpClient, HttpClientConfig, HttpRequest, NetworkError, Url};
use serde::{Deserialize, Serialize};

/// `Accept` header sent with page fetches
pub const HTML_ACCEPT: &str = "text/html;charset=UTF-8";

/// Default number of leading image bytes read while looking for the header (64 KiB)
pub const DEFAULT_IMAGE_PROBE_LIMIT: usize = 64 * 1024;

// =============================================================================
// Metadata
// =============================================================================

/// Metadata scraped from a presentation page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Preview image URL (empty if the page has none)
    pub image_url: String,
    /// Presentation title
    pub title: String,
    /// Presentation description
    pub description: String,
    /// Preview image width in pixels (0 if unknown)
    pub width: u32,
    /// Preview image height in pixels (0 if unknown)
    pub height: u32,
}

impl Metadata {
    /// Preview image dimensions
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    /// Check if the page had an `og:image`
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for [`MetadataResolver`]
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Scheme and host metadata is fetched from
    pub fetch_base: String,
    /// Most leading bytes of the preview image read for probing
    pub image_probe_limit: usize,
    /// HTTP client settings
    pub http: HttpClientConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fetch_base: DEFAULT_FETCH_BASE.to_string(),
            image_probe_limit: DEFAULT_IMAGE_PROBE_LIMIT,
            http: HttpClientConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch metadata from another base (a mirror, or a local test server)
    pub fn with_fetch_base(mut self, base: impl Into<String>) -> Self {
        self.fetch_base = base.into();
        self
    }

    /// Set how many leading image bytes may be read for probing
    pub fn with_image_probe_limit(mut self, limit: usize) -> Self {
        self.image_probe_limit = limit;
        self
    }

    /// Set the HTTP client settings
    pub fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

// =============================================================================
// Fetcher seam
// =============================================================================

/// Outbound fetches performed during a resolution
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET an HTML page and decode it as (lossy) UTF-8
    ///
    /// A page larger than the client's body limit is cut off there rather
    /// than rejected; Open Graph tags live in `<head>`.
    async fn fetch_page(&self, url: &str) -> networking::Result<String>;

    /// GET the leading bytes of an image, at most `limit` of them
    ///
    /// Implementations may stop as soon as the image header is complete.
    async fn fetch_image(&self, url: &str, limit: usize) -> networking::Result<Vec<u8>>;
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> networking::Result<String> {
        self.get_text(HttpRequest::get(url).header("Accept", HTML_ACCEPT).truncate())
            .await
    }

    async fn fetch_image(&self, url: &str, limit: usize) -> networking::Result<Vec<u8>> {
        let request = HttpRequest::get(url).max_body_size(limit).truncate();
        let response = self
            .execute_until(request, |bytes| probe_dimensions(bytes).is_ok())
            .await?;
        Ok(response.body)
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves Prezi references to [`Metadata`]
///
/// Holds no mutable state: one instance can serve concurrent resolutions.
///
/// # Examples
/// ```no_run
/// use prezi_provider::reference::normalize;
/// use prezi_provider::resolver::{MetadataResolver, ResolverConfig};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = MetadataResolver::new(ResolverConfig::default())?;
///     let id = normalize("https://prezi.com/view/abc123xyz/")?;
///     let metadata = resolver.resolve(&id).await?;
///     println!("{} ({}x{})", metadata.title, metadata.width, metadata.height);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MetadataResolver<F = HttpClient> {
    fetcher: F,
    config: ResolverConfig,
}

impl MetadataResolver<HttpClient> {
    /// Create a resolver backed by a new HTTP client
    pub fn new(config: ResolverConfig) -> std::result::Result<Self, NetworkError> {
        let fetcher = HttpClient::new(config.http.clone())?;
        Ok(Self { fetcher, config })
    }
}

impl<F: PageFetcher> MetadataResolver<F> {
    /// Create a resolver with a custom fetcher
    pub fn with_fetcher(fetcher: F, config: ResolverConfig) -> Self {
        Self { fetcher, config }
    }

    /// Get the resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// URL the page for `id` is fetched from
    pub fn fetch_url(&self, id: &PreziId) -> String {
        fetch_url(&self.config.fetch_base, id)
    }

    /// Resolve metadata for a stored reference
    pub async fn resolve(&self, reference: &PreziId) -> Result<Metadata> {
        self.resolve_url(&reference_url(reference)).await
    }

    /// Resolve metadata for a reference URL
    ///
    /// The URL must look like `http(s)://prezi.com/view/{id}`; anything else
    /// fails with [`ResolveError::InvalidReference`] before any request is
    /// made.
    pub async fn resolve_url(&self, reference_url: &str) -> Result<Metadata> {
        let id = parse_reference_url(reference_url)?;
        let url = self.fetch_url(&id);

        tracing::debug!(reference = %id, %url, "fetching presentation page");

        let html = self
            .fetcher
            .fetch_page(&url)
            .await
            .map_err(|source| ResolveError::Fetch {
                url: url.clone(),
                source,
            })?;

        let og = OpenGraph::parse(&html);
        if og.is_empty() {
            tracing::debug!(%url, "no Open Graph metadata on page");
        }

        let image_url = og
            .get("image")
            .map(|raw| absolutize(&url, raw))
            .unwrap_or_default();
        let title = og.get("title").unwrap_or_default().to_string();
        let description = og.get("description").unwrap_or_default().to_string();

        let dimensions = self.probe_image(&image_url).await;

        Ok(Metadata {
            image_url,
            title,
            description,
            width: dimensions.width,
            height: dimensions.height,
        })
    }

    /// Measure the preview image, falling back to 0×0
    async fn probe_image(&self, image_url: &str) -> ImageDimensions {
        if image_url.is_empty() {
            return ImageDimensions::UNKNOWN;
        }

        match self.try_probe_image(image_url).await {
            Ok(dimensions) => dimensions,
            Err(e) => {
                tracing::debug!(%image_url, error = %e, "could not probe preview image");
                ImageDimensions::UNKNOWN
            }
        }
    }

    async fn try_probe_image(&self, image_url: &str) -> std::result::Result<ImageDimensions, ProbeError> {
        let bytes = self
            .fetcher
            .fetch_image(image_url, self.config.image_probe_limit)
            .await?;
        probe_dimensions(&bytes)
    }
}

/// Resolve a possibly relative image reference against the page URL
///
/// Absolute URLs are returned unchanged.
fn absolutize(page_url: &str, raw: &str) -> String {
    if raw.is_empty() || Url::parse(raw).is_ok() {
        return raw.to_string();
    }

    Url::parse(page_url)
        .and_then(|base| base.join(raw))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}
