//! Delivery gating and routing rules.

use tracing::debug;

use crate::config::PostingConfig;
use crate::{DestinationName, Payload, RefKind, RepositoryModel};

impl PostingConfig {
    /// Returns `true` if events from `repository` may be posted at all.
    ///
    /// Personal repositories are suppressed unless explicitly enabled.
    pub fn allows_repository(&self, repository: &RepositoryModel) -> bool {
        if repository.personal && !self.post_personal_repos {
            debug!(repository = %repository.name, "Skipping personal repository");
            return false;
        }
        true
    }

    /// Returns `true` if changes to refs of `kind` are posted.
    pub fn allows_ref(&self, kind: RefKind) -> bool {
        match kind {
            RefKind::Branch => self.post_branches,
            RefKind::Tag => self.post_tags,
        }
    }

    /// Returns `true` if ticket events for `repository` are posted.
    pub fn allows_tickets(&self, repository: &RepositoryModel) -> bool {
        self.post_tickets && self.allows_repository(repository)
    }

    /// Returns the destination for events from `repository`.
    ///
    /// `None` means the default destination.
    pub fn destination_for(&self, repository: &RepositoryModel) -> Option<DestinationName> {
        if !self.use_project_destinations {
            return None;
        }
        repository.project_path.clone().map(DestinationName::from)
    }

    /// Sets `payload`'s destination for an event from `repository`.
    pub fn route(&self, repository: &RepositoryModel, payload: &mut Payload) {
        payload.set_destination(self.destination_for(repository));
    }
}
