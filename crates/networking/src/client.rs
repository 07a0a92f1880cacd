//! HTTP client implementation
//!
//! A thin wrapper around `reqwest` that applies a shared configuration
//! (timeout, user agent, default headers) and enforces a maximum body size
//! while streaming the response.

use crate::error::{NetworkError, Result};
use reqwest::Client as ReqwestClient;
use std::collections::HashMap;
use std::time::Duration;

/// Default maximum response body size (2 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
    /// Maximum response body size in bytes
    pub max_body_size: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("prezi-media/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the maximum response body size
    pub fn with_max_body_size(mut self, max: usize) -> Self {
        self.max_body_size = max;
        self
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// A GET request with per-request headers and an optional body limit
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Overrides the client's `max_body_size` when set
    pub max_body_size: Option<usize>,
    /// Keep the leading bytes of an oversize body instead of failing
    pub truncate: bool,
}

impl HttpRequest {
    /// Create a new GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            max_body_size: None,
            truncate: false,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Limit the body size for this request only
    pub fn max_body_size(mut self, max: usize) -> Self {
        self.max_body_size = Some(max);
        self
    }

    /// Cut the body off at the limit instead of failing with
    /// [`NetworkError::TooLarge`]
    pub fn truncate(mut self) -> Self {
        self.truncate = true;
        self
    }
}

/// A fully-read, successful response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Raw body
    pub body: Vec<u8>,
    /// Whether reading stopped early, at the limit or when the caller had
    /// enough; more bytes may have followed
    pub truncated: bool,
}

impl HttpResponse {
    /// Get a header value (names are lowercase)
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers.get(&key.to_ascii_lowercase())
    }

    /// Decode the body as UTF-8, replacing invalid sequences
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// =============================================================================
// HTTP Client
// =============================================================================

/// HTTP client used for page and image fetches
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(NetworkError::Build)?;

        Ok(Self { client, config })
    }

    /// Execute a GET request and read the whole body
    ///
    /// Non-2xx responses are reported as [`NetworkError::Status`]. Bodies
    /// larger than the effective limit are reported as
    /// [`NetworkError::TooLarge`], or cut off at the limit for a
    /// [truncating](HttpRequest::truncate) request.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_until(request, |_| false).await
    }

    /// Execute a GET request, reading the body until `done` accepts the
    /// bytes received so far
    ///
    /// `done` is called after every chunk; once it returns `true` the rest
    /// of the body is never downloaded.
    pub async fn execute_until<P>(&self, request: HttpRequest, mut done: P) -> Result<HttpResponse>
    where
        P: FnMut(&[u8]) -> bool + Send,
    {
        let url = request.url.as_str();
        let max = request.max_body_size.unwrap_or(self.config.max_body_size);

        let mut req = self.client.get(url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        tracing::debug!(url, "sending GET request");

        let mut response = req.send().await.map_err(|source| NetworkError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(announced) = response.content_length().filter(|_| !request.truncate) {
            let announced = usize::try_from(announced).unwrap_or(usize::MAX);
            if announced > max {
                return Err(NetworkError::TooLarge {
                    url: url.to_string(),
                    size: announced,
                    max,
                });
            }
        }

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(key.to_string(), value_str.to_string());
            }
        }
        let final_url = response.url().to_string();

        let mut body = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await.map_err(|source| NetworkError::Request {
            url: url.to_string(),
            source,
        })? {
            let remaining = max - body.len();
            if chunk.len() > remaining {
                if !request.truncate {
                    return Err(NetworkError::TooLarge {
                        url: url.to_string(),
                        size: body.len() + chunk.len(),
                        max,
                    });
                }
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                tracing::debug!(url, max, "response body truncated");
                break;
            }

            body.extend_from_slice(&chunk);
            if done(&body) {
                truncated = true;
                break;
            }
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            url: final_url,
            headers,
            body,
            truncated,
        })
    }

    /// GET a URL and decode the body as (lossy) UTF-8
    pub async fn get_text(&self, request: HttpRequest) -> Result<String> {
        Ok(self.execute(request).await?.text_lossy())
    }

    /// GET a URL and return the raw body
    pub async fn get_bytes(&self, request: HttpRequest) -> Result<Vec<u8>> {
        Ok(self.execute(request).await?.body)
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}
