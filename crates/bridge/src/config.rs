//! Typed configuration for the notification bridge.
//!
//! The whole surface is read once at startup into a [`NotifierConfig`] and
//! passed by reference to every component. Every field has a default, so an
//! empty document is a valid (if credential-less) configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::{Credential, DestinationName};

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifierConfig {
    /// Webhook endpoint and credentials.
    pub delivery: DeliveryConfig,
    /// Which events are posted and where.
    pub posting: PostingConfig,
    /// Icon overrides.
    pub icons: IconConfig,
    /// Link and display settings shared with the host's web UI.
    pub web: WebConfig,
}

impl NotifierConfig {
    /// Parses and validates a YAML configuration document.
    pub fn from_yaml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot express constraints for.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.web.short_commit_id_length == 0 {
            return Err(ConfigError::Invalid {
                message: "web.short_commit_id_length must be at least 1".to_string(),
            });
        }
        if self.delivery.connect_timeout_secs == 0 || self.delivery.response_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "delivery timeouts must be at least one second".to_string(),
            });
        }
        let pattern = self.web.datetime_format();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "web.date_format/web.time_format '{pattern}' is not a valid strftime pattern"
                ),
            });
        }
        if let Some(name) = self.delivery.destinations.keys().find(|n| n.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                message: format!("delivery.destinations has an empty destination name '{name}'"),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// Endpoint, credentials and timeouts for the webhook POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeliveryConfig {
    /// Base URL; the credential is appended as the final path segment.
    pub webhook_url: String,

    /// Credential for the default conversation.
    pub default_token: Option<String>,

    /// Credentials for named conversations, keyed by destination name.
    pub destinations: BTreeMap<String, DestinationConfig>,

    /// Upper bound on establishing the connection.
    pub connect_timeout_secs: u64,

    /// Upper bound on waiting for the response.
    pub response_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            webhook_url: "https://hooks.glip.com/webhook".to_string(),
            default_token: None,
            destinations: BTreeMap::new(),
            connect_timeout_secs: 5,
            response_timeout_secs: 5,
        }
    }
}

impl DeliveryConfig {
    /// Returns the default credential, if one is configured.
    pub fn default_credential(&self) -> Option<Credential> {
        self.default_token.as_deref().map(Credential::new)
    }

    /// Returns the non-empty credential configured for `destination`.
    pub fn destination_credential(&self, destination: &DestinationName) -> Option<Credential> {
        self.destinations
            .get(destination.as_str())
            .map(|d| d.token.as_str())
            .filter(|token| !token.is_empty())
            .map(Credential::new)
    }

    /// Returns the configuration key under which `destination`'s token is expected.
    pub fn destination_key(destination: &DestinationName) -> String {
        format!("delivery.destinations.{destination}.token")
    }

    /// Builds the endpoint URL for a credential.
    pub fn endpoint(&self, credential: &Credential) -> String {
        format!(
            "{}/{}",
            self.webhook_url.trim_end_matches('/'),
            credential.expose()
        )
    }

    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Response timeout as a [`Duration`].
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

/// Credential for one named conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DestinationConfig {
    /// Webhook token for the conversation.
    pub token: String,
}

// ---------------------------------------------------------------------------
// Posting policy
// ---------------------------------------------------------------------------

/// Switches deciding which events are posted and how they are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostingConfig {
    /// Route repository events to a destination named after the project path.
    pub use_project_destinations: bool,
    /// Post events from repositories in personal namespaces.
    pub post_personal_repos: bool,
    /// Post branch create/update/delete events.
    pub post_branches: bool,
    /// Post tag create/move/delete events.
    pub post_tags: bool,
    /// Post ticket events.
    pub post_tickets: bool,
    /// Post ticket comments.
    pub post_ticket_comments: bool,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            use_project_destinations: false,
            post_personal_repos: false,
            post_branches: true,
            post_tags: true,
            post_tickets: true,
            post_ticket_comments: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Icons and display
// ---------------------------------------------------------------------------

/// Icon URL overrides. When unset, the actor's avatar is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconConfig {
    /// Used when nothing more specific is available.
    pub default: Option<String>,
    /// Used for ref events.
    pub git: Option<String>,
    /// Used for ticket events.
    pub ticket: Option<String>,
}

/// Settings shared with the host's web UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebConfig {
    /// Public base URL every human-facing link is built from.
    pub canonical_url: String,
    /// Number of commit id characters shown in commit tables.
    pub short_commit_id_length: usize,
    /// `strftime` pattern for the date part of review timestamps.
    pub date_format: String,
    /// `strftime` pattern for the time part of review timestamps.
    pub time_format: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            canonical_url: "https://localhost:8443".to_string(),
            short_commit_id_length: 6,
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M".to_string(),
        }
    }
}

impl WebConfig {
    /// Returns the combined date and time pattern.
    pub fn datetime_format(&self) -> String {
        format!("{} {}", self.date_format, self.time_format)
    }
}
