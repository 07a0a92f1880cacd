//! The Prezi media provider
//!
//! [`MediaProvider`] is the hook surface a media host calls into;
//! [`PreziProvider`] implements it on top of [`MetadataResolver`] and adds an
//! optional cache of successful resolutions.

use crate::cache::MetadataCache;
use crate::download::download_target;
use crate::embed::{build_embed_params, BoxSize, EmbedOptions, EmbedParams};
use crate::error::{InvalidReferenceError, ResolveError, Result};
use crate::reference::{normalize, PreziId};
use crate::resolver::{Metadata, MetadataResolver, PageFetcher, ResolverConfig};
use crate::status::MediaUpdate;
use async_trait::async_trait;
use networking::{HttpClient, NetworkError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default provider name
pub const DEFAULT_PROVIDER_NAME: &str = "prezi";

/// Translation domain of the provider's labels
pub const TRANSLATION_DOMAIN: &str = "SonataMediaBundle";

/// Icon shown next to the provider in admin lists
pub const PROVIDER_ICON_CLASS: &str = "fa fa-newspaper-o";

/// How a host should present the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    /// Provider title (its name)
    pub title: String,
    /// Translation key of the description
    pub description: String,
    /// Thumbnail image, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Translation domain
    pub domain: String,
    /// CSS class of the icon
    pub icon_class: String,
}

/// Hooks a media host calls on a provider
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Presentation descriptor for admin UIs
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            title: self.name().to_string(),
            description: format!("{}.description", self.name()),
            image: None,
            domain: TRANSLATION_DOMAIN.to_string(),
            icon_class: PROVIDER_ICON_CLASS.to_string(),
        }
    }

    /// Normalize a submitted reference for storage
    fn normalize(&self, raw: &str) -> std::result::Result<PreziId, InvalidReferenceError>;

    /// Resolve metadata for a stored reference
    async fn resolve(&self, reference: &PreziId) -> Result<Metadata>;

    /// Iframe attributes for rendering
    fn build_embed_params(&self, size: BoxSize, options: &EmbedOptions) -> EmbedParams;

    /// Where download requests are redirected
    fn download_target(&self, reference: &PreziId) -> String;
}

/// Configuration for [`PreziProvider`]
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider name
    pub name: String,
    /// TTL of cached metadata; `None` disables caching
    pub cache_ttl: Option<Duration>,
    /// Resolver settings
    pub resolver: ResolverConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROVIDER_NAME.to_string(),
            cache_ttl: None,
            resolver: ResolverConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Cache successful resolutions for `ttl`
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the resolver settings
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }
}

/// Prezi implementation of [`MediaProvider`]
pub struct PreziProvider<F = HttpClient> {
    name: String,
    resolver: MetadataResolver<F>,
    cache: Option<Mutex<MetadataCache>>,
}

impl PreziProvider<HttpClient> {
    /// Create a provider backed by a new HTTP client
    pub fn new(config: ProviderConfig) -> std::result::Result<Self, NetworkError> {
        let resolver = MetadataResolver::new(config.resolver.clone())?;
        Ok(Self::with_resolver(resolver, &config))
    }
}

impl<F: PageFetcher> PreziProvider<F> {
    /// Create a provider around an existing resolver
    ///
    /// `config.resolver` is ignored; the resolver carries its own settings.
    pub fn with_resolver(resolver: MetadataResolver<F>, config: &ProviderConfig) -> Self {
        Self {
            name: config.name.clone(),
            resolver,
            cache: config
                .cache_ttl
                .map(|ttl| Mutex::new(MetadataCache::with_ttl(ttl))),
        }
    }

    /// Get the underlying resolver
    pub fn resolver(&self) -> &MetadataResolver<F> {
        &self.resolver
    }

    /// Check if metadata caching is enabled
    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of cached resolutions
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }

    /// Resolve through the cache, storing successful results
    async fn resolve_cached(&self, reference: &PreziId) -> Result<Metadata> {
        if let Some(cache) = &self.cache {
            let hit = cache.lock().get(reference).cloned();
            if let Some(metadata) = hit {
                tracing::debug!(%reference, "metadata cache hit");
                return Ok(metadata);
            }
        }

        let metadata = self.resolver.resolve(reference).await?;

        if let Some(cache) = &self.cache {
            cache.lock().insert(reference.clone(), metadata.clone());
        }

        Ok(metadata)
    }

    /// Work out how a media item changes after (re-)resolving its reference
    ///
    /// A failed page fetch is not an error here: it yields an update that
    /// marks the item as errored and disabled. An unparseable reference is
    /// returned as an error. With `force`, cached metadata is bypassed and
    /// the item's name and description are overwritten.
    pub async fn update_metadata(&self, reference: &PreziId, force: bool) -> Result<MediaUpdate> {
        if force {
            if let Some(cache) = &self.cache {
                cache.lock().invalidate(reference);
            }
        }

        match self.resolve_cached(reference).await {
            Ok(metadata) => Ok(MediaUpdate::resolved(metadata, force)),
            Err(ResolveError::Fetch { url, source }) => {
                tracing::warn!(
                    %reference,
                    %url,
                    error = %source,
                    "disabling media after failed fetch"
                );
                Ok(MediaUpdate::failed())
            }
            Err(e) => Err(e),
        }
    }

    /// Turn submitted content into a fully-populated media update
    ///
    /// Returns `Ok(None)` when nothing was submitted. Otherwise the reference
    /// is normalized, recorded with this provider's name, and resolved with
    /// a forced refresh.
    pub async fn transform(&self, raw: &str) -> Result<Option<MediaUpdate>> {
        let Ok(reference) = normalize(raw) else {
            return Ok(None);
        };

        let update = self.update_metadata(&reference, true).await?;
        Ok(Some(update.with_provider(self.name.clone(), reference)))
    }
}

#[async_trait]
impl<F: PageFetcher> MediaProvider for PreziProvider<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize(&self, raw: &str) -> std::result::Result<PreziId, InvalidReferenceError> {
        normalize(raw)
    }

    async fn resolve(&self, reference: &PreziId) -> Result<Metadata> {
        self.resolve_cached(reference).await
    }

    fn build_embed_params(&self, size: BoxSize, options: &EmbedOptions) -> EmbedParams {
        build_embed_params(size, options)
    }

    fn download_target(&self, reference: &PreziId) -> String {
        download_target(reference)
    }
}
