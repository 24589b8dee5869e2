//! Error types for the notification bridge.
//!
//! Each enum covers one failure domain:
//!
//! - [`DeliveryError`]: the webhook POST failed or was refused. Surfaced by
//!   synchronous sends; logged and dropped by asynchronous ones.
//! - [`GraphError`]: a commit range could not be walked. Always recovered by
//!   the commit summarizer, which degrades to an empty range.
//! - [`ConfigError`]: the configuration document is unreadable or invalid.
//!   Only produced at startup.
//!
//! A destination without a credential is deliberately *not* an error: the
//! resolver falls back to the default credential and emits a diagnostic.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// Failure outcome of a single delivery attempt.
///
/// There is no retry policy attached: every delivery is attempted once.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The endpoint could not be reached, or the connection or response timed out.
    #[error("Webhook transport failure: {message}")]
    Transport {
        /// Description of the underlying network error.
        message: String,
    },

    /// The endpoint answered with a status other than 200.
    #[error("Webhook rejected delivery ({status}): {body}")]
    Rejected {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Full response body, decoded as UTF-8.
        body: String,
    },

    /// The payload could not be encoded as JSON.
    #[error("Failed to serialise payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeliveryError {
    /// Returns the HTTP status when the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Serialization(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Commit graph
// ---------------------------------------------------------------------------

/// A commit range could not be computed from the repository history.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A base or tip id does not resolve to a commit.
    #[error("Revision '{revision}' does not resolve to a commit")]
    UnresolvedRevision {
        /// The id or expression that failed to resolve.
        revision: String,
    },

    /// The history walk itself failed (I/O error, corrupt object, ...).
    #[error("Commit walk failed: {message}")]
    Walk {
        /// Description of the failure reported by the host.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The configuration document could not be turned into a [`crate::NotifierConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML or does not match the expected shape.
    #[error("Configuration could not be parsed: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// The document parsed but holds a value the bridge cannot work with.
    #[error("Configuration error: {message}")]
    Invalid {
        /// Description of the configuration problem.
        message: String,
    },
}
