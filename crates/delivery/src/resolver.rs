//! Destination → credential resolution.

use bridge::{Credential, DeliveryConfig, DestinationName};
use tracing::warn;

/// Maps a payload's destination to the credential used in the webhook URL.
///
/// Never fails: a destination without a credential falls back to the
/// default conversation and leaves a warning naming the missing key.
#[derive(Debug, Clone, Copy)]
pub struct DestinationResolver<'a> {
    config: &'a DeliveryConfig,
}

impl<'a> DestinationResolver<'a> {
    pub fn new(config: &'a DeliveryConfig) -> Self {
        Self { config }
    }

    /// Returns the credential for `destination`, or the default credential.
    ///
    /// `None` only when the fallback default is not configured either.
    pub fn resolve(&self, destination: Option<&DestinationName>) -> Option<Credential> {
        let Some(destination) = destination else {
            return self.config.default_credential();
        };
        if let Some(credential) = self.config.destination_credential(destination) {
            return Some(credential);
        }
        warn!(
            destination = %destination,
            key = %DeliveryConfig::destination_key(destination),
            "No webhook token configured for destination, using default conversation"
        );
        self.config.default_credential()
    }
}
