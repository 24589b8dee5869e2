//! Ticket lifecycle handling.

use std::sync::Arc;

use bridge::{
    Change, NotificationEvent, NotifierConfig, PayloadBuilder, PayloadSink, RepositoryModel,
    Ticket, TicketEvent, UserProfile,
};
use tracing::{debug, instrument, warn};

use crate::HostServices;

/// Reports new tickets and ticket updates.
pub struct TicketHandler {
    config: Arc<NotifierConfig>,
    host: HostServices,
    sink: Arc<dyn PayloadSink>,
}

impl TicketHandler {
    pub fn new(
        config: Arc<NotifierConfig>,
        host: HostServices,
        sink: Arc<dyn PayloadSink>,
    ) -> Self {
        Self { config, host, sink }
    }

    /// Reports a newly opened ticket. Returns `true` if a payload was submitted.
    #[instrument(skip_all, fields(repository = %ticket.repository, ticket = ticket.number))]
    pub fn on_new_ticket(&self, ticket: &Ticket) -> bool {
        let Some(repository) = self.postable_repository(ticket) else {
            return false;
        };
        let Some(change) = ticket.changes.first() else {
            warn!("Ticket has no recorded changes, nothing to report");
            return false;
        };

        let actor = self.actor(change);
        let event = NotificationEvent::TicketCreated(TicketEvent {
            actor: &actor,
            ticket,
            change,
        });
        self.dispatch(&repository, &event)
    }

    /// Reports `change` made to `ticket`. Returns `true` if a payload was submitted.
    ///
    /// Changes that are not a review, patchset, merge, status change or
    /// (when enabled) comment are not reported.
    #[instrument(skip_all, fields(repository = %ticket.repository, ticket = ticket.number))]
    pub fn on_update_ticket(&self, ticket: &Ticket, change: &Change) -> bool {
        let Some(repository) = self.postable_repository(ticket) else {
            return false;
        };

        let actor = self.actor(change);
        let event = TicketEvent {
            actor: &actor,
            ticket,
            change,
        };
        let Some(event) =
            NotificationEvent::ticket_update(event, self.config.posting.post_ticket_comments)
        else {
            debug!("Ticket change is not reportable");
            return false;
        };
        self.dispatch(&repository, &event)
    }

    fn postable_repository(&self, ticket: &Ticket) -> Option<RepositoryModel> {
        let Some(repository) = self.host.repositories.repository(&ticket.repository) else {
            warn!("Ticket repository is unknown to the host, skipping");
            return None;
        };
        self.config
            .posting
            .allows_tickets(&repository)
            .then_some(repository)
    }

    fn actor(&self, change: &Change) -> UserProfile {
        self.host
            .users
            .user(&change.author)
            .unwrap_or_else(|| UserProfile::new(change.author.clone()))
    }

    fn dispatch(&self, repository: &RepositoryModel, event: &NotificationEvent<'_>) -> bool {
        let builder = PayloadBuilder::new(
            &self.config,
            self.host.graph.as_ref(),
            self.host.users.as_ref(),
        );
        let Some(mut payload) = builder.build(event) else {
            return false;
        };
        self.config.posting.route(repository, &mut payload);
        self.sink.submit(payload);
        true
    }
}
