//! Prezi media provider
//!
//! Facade over the workspace crates: reference handling, metadata
//! resolution and embed/download helpers from [`prezi_provider`], and the
//! HTTP client from [`networking`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use networking;
pub use prezi_provider;

pub use networking::{HttpClient, HttpClientConfig, NetworkError};
pub use prezi_provider::{
    build_embed_params, download_redirect, download_target, normalize, BoxSize, EmbedOptions,
    EmbedParams, MediaEntity, MediaProvider, MediaUpdate, Metadata, MetadataResolver, PreziId,
    PreziProvider, ProviderConfig, ProviderStatus, ResolveError, ResolverConfig,
};
