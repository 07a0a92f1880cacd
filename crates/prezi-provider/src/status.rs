//! Provider status and media updates
//!
//! Resolution never touches the caller's media entity. It produces a
//! [`MediaUpdate`] describing what should change, which the caller applies
//! (directly or through [`MediaEntity`]).

use crate::reference::PreziId;
use crate::resolver::Metadata;
use serde::{Deserialize, Serialize};

/// Provider status of a media item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    /// Not resolved yet
    #[default]
    Pending,
    /// Metadata resolved
    Ok,
    /// Resolution failed; the item is disabled
    Error,
}

impl ProviderStatus {
    /// Get the status as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Pending => "pending",
            ProviderStatus::Ok => "ok",
            ProviderStatus::Error => "error",
        }
    }

    /// Check if a resolution outcome may move an item from `self` to `next`
    ///
    /// Items only leave `Pending` through a resolution; settled items change
    /// again only when explicitly re-resolved, which may land on either
    /// outcome.
    pub fn can_transition_to(&self, next: ProviderStatus) -> bool {
        !matches!(next, ProviderStatus::Pending)
    }
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutations a host media entity supports
///
/// Implement this on the host's entity type to apply a [`MediaUpdate`] in
/// one call.
pub trait MediaEntity {
    /// Set the provider name
    fn set_provider_name(&mut self, name: &str);
    /// Set the stored provider reference
    fn set_provider_reference(&mut self, reference: &PreziId);
    /// Set the provider status
    fn set_provider_status(&mut self, status: ProviderStatus);
    /// Enable or disable the item
    fn set_enabled(&mut self, enabled: bool);
    /// Store the provider metadata
    fn set_provider_metadata(&mut self, metadata: &Metadata);
    /// Set the display name
    fn set_name(&mut self, name: &str);
    /// Set the description
    fn set_description(&mut self, description: &str);
    /// Set the pixel width
    fn set_width(&mut self, width: u32);
    /// Set the pixel height
    fn set_height(&mut self, height: u32);
}

/// Changes to apply to a media item after a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUpdate {
    /// Provider name to record (set by a transform)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Provider reference to record (set by a transform)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<PreziId>,
    /// New provider status
    pub status: ProviderStatus,
    /// New enabled flag, when it changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Metadata to store as provider metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<Metadata>,
    /// New display name (forced refreshes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description (forced refreshes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// New height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl MediaUpdate {
    /// Update for a successful resolution
    ///
    /// Name and description are only overwritten when `force` is set.
    pub fn resolved(metadata: Metadata, force: bool) -> Self {
        let (name, description) = if force {
            (Some(metadata.title.clone()), Some(metadata.description.clone()))
        } else {
            (None, None)
        };

        Self {
            provider_name: None,
            provider_reference: None,
            status: ProviderStatus::Ok,
            enabled: None,
            width: Some(metadata.width),
            height: Some(metadata.height),
            name,
            description,
            provider_metadata: Some(metadata),
        }
    }

    /// Update for a failed page fetch: error status, item disabled
    pub fn failed() -> Self {
        Self {
            provider_name: None,
            provider_reference: None,
            status: ProviderStatus::Error,
            enabled: Some(false),
            provider_metadata: None,
            name: None,
            description: None,
            width: None,
            height: None,
        }
    }

    /// Record the provider name and reference as part of this update
    pub fn with_provider(mut self, name: impl Into<String>, reference: PreziId) -> Self {
        self.provider_name = Some(name.into());
        self.provider_reference = Some(reference);
        self
    }

    /// Check if this update marks the item as failed
    pub fn is_error(&self) -> bool {
        self.status == ProviderStatus::Error
    }

    /// Apply every change in this update to a host entity
    pub fn apply_to<E: MediaEntity + ?Sized>(&self, entity: &mut E) {
        if let Some(name) = &self.provider_name {
            entity.set_provider_name(name);
        }
        if let Some(reference) = &self.provider_reference {
            entity.set_provider_reference(reference);
        }
        entity.set_provider_status(self.status);
        if let Some(enabled) = self.enabled {
            entity.set_enabled(enabled);
        }
        if let Some(metadata) = &self.provider_metadata {
            entity.set_provider_metadata(metadata);
        }
        if let Some(name) = &self.name {
            entity.set_name(name);
        }
        if let Some(description) = &self.description {
            entity.set_description(description);
        }
        if let Some(width) = self.width {
            entity.set_width(width);
        }
        if let Some(height) = self.height {
            entity.set_height(height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Media {
        provider_name: String,
        provider_reference: Option<PreziId>,
        status: ProviderStatus,
        enabled: bool,
        metadata: Option<Metadata>,
        name: String,
        description: String,
        width: u32,
        height: u32,
    }

    impl MediaEntity for Media {
        fn set_provider_name(&mut self, name: &str) {
            self.provider_name = name.to_string();
        }
        fn set_provider_reference(&mut self, reference: &PreziId) {
            self.provider_reference = Some(reference.clone());
        }
        fn set_provider_status(&mut self, status: ProviderStatus) {
            self.status = status;
        }
        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
        fn set_provider_metadata(&mut self, metadata: &Metadata) {
            self.metadata = Some(metadata.clone());
        }
        fn set_name(&mut self, name: &str) {
            self.name = name.to_string();
        }
        fn set_description(&mut self, description: &str) {
            self.description = description.to_string();
        }
        fn set_width(&mut self, width: u32) {
            self.width = width;
        }
        fn set_height(&mut self, height: u32) {
            self.height = height;
        }
    }

    fn deck() -> Metadata {
        Metadata {
            image_url: "http://img/x.png".to_string(),
            title: "My Deck".to_string(),
            description: "A talk".to_string(),
            width: 200,
            height: 100,
        }
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(ProviderStatus::default(), ProviderStatus::Pending);
        assert_eq!(ProviderStatus::Ok.to_string(), "ok");
        assert_eq!(
            serde_json::to_string(&ProviderStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn test_transitions() {
        assert!(ProviderStatus::Pending.can_transition_to(ProviderStatus::Ok));
        assert!(ProviderStatus::Pending.can_transition_to(ProviderStatus::Error));
        assert!(ProviderStatus::Error.can_transition_to(ProviderStatus::Ok));
        assert!(!ProviderStatus::Ok.can_transition_to(ProviderStatus::Pending));
    }

    #[test]
    fn test_resolved_without_force_keeps_name() {
        let update = MediaUpdate::resolved(deck(), false);
        let mut media = Media {
            name: "Custom name".to_string(),
            enabled: true,
            ..Default::default()
        };
        update.apply_to(&mut media);

        assert_eq!(media.status, ProviderStatus::Ok);
        assert_eq!(media.name, "Custom name");
        assert_eq!(media.description, "");
        assert_eq!((media.width, media.height), (200, 100));
        assert_eq!(media.metadata, Some(deck()));
        assert!(media.enabled);
    }

    #[test]
    fn test_resolved_with_force_overwrites_name() {
        let update = MediaUpdate::resolved(deck(), true)
            .with_provider("prezi", PreziId::new("abc123xyz"));
        let mut media = Media::default();
        update.apply_to(&mut media);

        assert_eq!(media.provider_name, "prezi");
        assert_eq!(media.provider_reference, Some(PreziId::new("abc123xyz")));
        assert_eq!(media.name, "My Deck");
        assert_eq!(media.description, "A talk");
    }

    #[test]
    fn test_failed_disables() {
        let update = MediaUpdate::failed();
        assert!(update.is_error());

        let mut media = Media {
            enabled: true,
            width: 7,
            ..Default::default()
        };
        update.apply_to(&mut media);

        assert_eq!(media.status, ProviderStatus::Error);
        assert!(!media.enabled);
        assert!(media.metadata.is_none());
        assert_eq!(media.width, 7);
    }

    #[test]
    fn test_update_serialization_skips_unset_fields() {
        let json = serde_json::to_value(MediaUpdate::failed()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["enabled"], false);
        assert!(json.get("providerMetadata").is_none());
    }
}
