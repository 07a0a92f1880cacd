//! Error types for reference handling and metadata resolution

use networking::NetworkError;
use thiserror::Error;

/// A submitted reference could not be turned into a Prezi ID
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid Prezi reference: {input:?}")]
pub struct InvalidReferenceError {
    /// The rejected input
    pub input: String,
}

/// Hard failures of a metadata resolution
///
/// Degraded metadata (missing Open Graph tags, an image that cannot be
/// probed) is never reported here.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The reference URL is not a well-formed Prezi view URL
    #[error("Unable to parse the Prezi url: {url}")]
    InvalidReference {
        /// Reference URL that failed validation
        url: String,
    },

    /// The presentation page could not be retrieved
    #[error("Unable to retrieve the presentation information for: {url}")]
    Fetch {
        /// Fetch URL
        url: String,
        /// Underlying transport error
        #[source]
        source: NetworkError,
    },
}

impl ResolveError {
    /// URL the failure relates to
    pub fn url(&self) -> &str {
        match self {
            ResolveError::InvalidReference { url } | ResolveError::Fetch { url, .. } => url,
        }
    }

    /// Check if this failure came from the network rather than the reference
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, ResolveError::Fetch { .. })
    }
}

/// The preview image could not be measured
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Downloading the image failed
    #[error("Failed to download image: {0}")]
    Download(#[from] NetworkError),

    /// The bytes are not a recognizable image header
    #[error("Failed to read image header: {0}")]
    Decode(#[from] image::ImageError),

    /// Reading the image header failed
    #[error("I/O error while reading image header: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;
