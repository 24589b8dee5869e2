//! Port traits: what the bridge needs from the host server and the network.
//!
//! The host implements the directory and graph traits over its own models;
//! the `delivery` crate implements [`WebhookTransport`] and [`PayloadSink`].
//! Nothing in this crate performs I/O itself.

use async_trait::async_trait;

use crate::errors::{DeliveryError, GraphError};
use crate::{CommitId, CommitInfo, Payload, RepositoryModel, RepositoryName, UserProfile, Username};

/// Read access to a repository's commit history.
pub trait CommitGraph: Send + Sync {
    /// Returns the commits reachable from `tip` but not from `base`, children
    /// before parents (newest first).
    fn commits_between(
        &self,
        repository: &RepositoryName,
        base: &CommitId,
        tip: &CommitId,
    ) -> Result<Vec<CommitInfo>, GraphError>;
}

/// Account lookups.
pub trait UserDirectory: Send + Sync {
    /// Returns the account named `username`, if it exists.
    fn user(&self, username: &Username) -> Option<UserProfile>;

    /// Returns the display name for `username`, falling back to the name itself.
    fn display_name(&self, username: &Username) -> String {
        self.user(username)
            .map(|u| u.display_name().to_string())
            .unwrap_or_else(|| username.to_string())
    }
}

/// Repository lookups.
pub trait RepositoryDirectory: Send + Sync {
    /// Returns the repository named `name`, if it exists.
    fn repository(&self, name: &RepositoryName) -> Option<RepositoryModel>;
}

/// A raw HTTP answer from the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded as UTF-8.
    pub body: String,
}

/// Performs the webhook POST.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POSTs `json` to `url` and returns whatever the endpoint answered.
    ///
    /// Only network-level failures are errors here; status classification is
    /// left to the caller.
    async fn post(&self, url: &str, json: String) -> Result<TransportResponse, DeliveryError>;
}

/// Accepts payloads for fire-and-forget delivery.
pub trait PayloadSink: Send + Sync {
    /// Queues `payload` for delivery and returns without waiting.
    fn submit(&self, payload: Payload);
}
