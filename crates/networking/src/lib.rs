//! Networking utilities for the Prezi media provider
//!
//! This crate provides the outbound HTTP client used to fetch presentation
//! pages and preview images: timeouts, default headers, and a hard cap on
//! response body size.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;

pub use client::{HttpClient, HttpClientConfig, HttpRequest, HttpResponse};
pub use error::{NetworkError, Result};
pub use reqwest::Url;
