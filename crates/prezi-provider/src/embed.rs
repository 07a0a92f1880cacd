//! Embed iframe parameters
//!
//! Builds the flat attribute set a template layer turns into an `<iframe>`.
//! The box size is computed by the host; `src` is deliberately not emitted.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Rendered box size, as computed by the host's sizing helper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl BoxSize {
    /// Create a new box size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Display options recognized by the embed builder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedOptions {
    /// Iframe border width in pixels (default 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frameborder: Option<u32>,
    /// CSS class (default empty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Enables the fullscreen attribute
    #[serde(default)]
    pub allowfullscreen: bool,
}

impl EmbedOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the border width
    pub fn with_frameborder(mut self, frameborder: u32) -> Self {
        self.frameborder = Some(frameborder);
        self
    }

    /// Set the CSS class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Allow fullscreen
    pub fn with_allowfullscreen(mut self) -> Self {
        self.allowfullscreen = true;
        self
    }

    /// Read options from a loosely-typed host option map
    ///
    /// `allowfullscreen` is a presence flag: any value enables it. A
    /// `frameborder` that is not a number is ignored.
    pub fn from_map(options: &HashMap<String, String>) -> Self {
        let frameborder = options.get("frameborder").and_then(|value| {
            let parsed = value.trim().parse().ok();
            if parsed.is_none() {
                tracing::warn!(%value, "ignoring non-numeric frameborder");
            }
            parsed
        });

        Self {
            frameborder,
            class: options.get("class").cloned(),
            allowfullscreen: options.contains_key("allowfullscreen"),
        }
    }
}

/// Attributes for the embed iframe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedParams {
    /// Border width
    pub frameborder: u32,
    /// Iframe width
    pub width: u32,
    /// Iframe height
    pub height: u32,
    /// CSS class
    pub class: String,
    /// Whether fullscreen is allowed
    pub allow_fullscreen: bool,
}

impl EmbedParams {
    /// Flatten to template attributes
    pub fn to_attributes(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("frameborder", self.frameborder.to_string()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("class", self.class.clone()),
            ("allow_fullscreen", self.allow_fullscreen.to_string()),
        ])
    }
}

/// Build embed parameters from a box size and display options
///
/// # Examples
/// ```
/// use prezi_provider::embed::{build_embed_params, BoxSize, EmbedOptions};
///
/// let params = build_embed_params(BoxSize::new(640, 480), &EmbedOptions::default());
/// assert_eq!(params.frameborder, 0);
/// assert_eq!(params.class, "");
/// assert!(!params.allow_fullscreen);
/// ```
pub fn build_embed_params(size: BoxSize, options: &EmbedOptions) -> EmbedParams {
    EmbedParams {
        frameborder: options.frameborder.unwrap_or(0),
        width: size.width,
        height: size.height,
        class: options.class.clone().unwrap_or_default(),
        allow_fullscreen: options.allowfullscreen,
    }
}
