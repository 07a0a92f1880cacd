//! Prezi presentations as an embeddable media type
//!
//! This crate normalizes submitted Prezi references, resolves presentation
//! metadata from the public page's Open Graph tags, and describes the embed
//! iframe and download redirect a media host should produce.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod download;
pub mod embed;
pub mod error;
pub mod opengraph;
pub mod probe;
pub mod provider;
pub mod reference;
pub mod resolver;
pub mod status;

pub use cache::MetadataCache;
pub use download::{download_redirect, download_target, DownloadRedirect};
pub use embed::{build_embed_params, BoxSize, EmbedOptions, EmbedParams};
pub use error::{InvalidReferenceError, ProbeError, ResolveError, Result};
pub use probe::ImageDimensions;
pub use provider::{MediaProvider, PreziProvider, ProviderConfig, ProviderDescriptor};
pub use reference::{normalize, PreziId};
pub use resolver::{Metadata, MetadataResolver, PageFetcher, ResolverConfig};
pub use status::{MediaEntity, MediaUpdate, ProviderStatus};
