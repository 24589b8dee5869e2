//! Post-receive handling: one notification per branch or tag command.

use std::sync::Arc;

use bridge::{
    CommitId, NotificationEvent, NotifierConfig, PayloadBuilder, PayloadSink, RefEvent, RefName,
    RepositoryModel, UserProfile,
};
use tracing::{debug, instrument};

use crate::HostServices;

/// How a ref moved during a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefChange {
    Create,
    Update,
    UpdateNonFastForward,
    Delete,
}

/// One ref command accepted by the host.
#[derive(Debug, Clone)]
pub struct RefCommand {
    pub ref_name: RefName,
    pub old_id: CommitId,
    pub new_id: CommitId,
    pub change: RefChange,
}

/// Everything the host reports once a push has been accepted.
#[derive(Debug, Clone)]
pub struct ReceivedPush {
    /// The account that pushed.
    pub actor: UserProfile,
    /// The repository pushed to.
    pub repository: RepositoryModel,
    /// Accepted ref commands, in the order the host applied them.
    pub commands: Vec<RefCommand>,
}

/// Reports branch and tag changes after a push.
pub struct RefUpdateHandler {
    config: Arc<NotifierConfig>,
    host: HostServices,
    sink: Arc<dyn PayloadSink>,
}

impl RefUpdateHandler {
    pub fn new(
        config: Arc<NotifierConfig>,
        host: HostServices,
        sink: Arc<dyn PayloadSink>,
    ) -> Self {
        Self { config, host, sink }
    }

    /// Submits one payload per reportable command and returns how many were submitted.
    ///
    /// Commands on refs other than branches and tags, and kinds switched off in
    /// the posting settings, are skipped without side effects.
    #[instrument(
        skip_all,
        fields(repository = %push.repository.name, actor = %push.actor.username)
    )]
    pub fn on_post_receive(&self, push: &ReceivedPush) -> usize {
        let posting = &self.config.posting;
        if !posting.allows_repository(&push.repository) {
            return 0;
        }

        let builder = PayloadBuilder::new(
            &self.config,
            self.host.graph.as_ref(),
            self.host.users.as_ref(),
        );

        let mut submitted = 0;
        for command in &push.commands {
            let Some(event) = RefEvent::new(
                &push.actor,
                &push.repository,
                &command.ref_name,
                &command.old_id,
                &command.new_id,
            ) else {
                debug!(ref_name = %command.ref_name, "Ignoring ref outside branches and tags");
                continue;
            };
            if !posting.allows_ref(event.kind) {
                debug!(
                    ref_name = %command.ref_name,
                    kind = %event.kind,
                    "Posting disabled for ref kind"
                );
                continue;
            }

            let event = match command.change {
                RefChange::Create => NotificationEvent::RefCreated(event),
                RefChange::Update => NotificationEvent::RefUpdated {
                    event,
                    fast_forward: true,
                },
                RefChange::UpdateNonFastForward => NotificationEvent::RefUpdated {
                    event,
                    fast_forward: false,
                },
                RefChange::Delete => NotificationEvent::RefDeleted(event),
            };

            let Some(mut payload) = builder.build(&event) else {
                continue;
            };
            posting.route(&push.repository, &mut payload);
            self.sink.submit(payload);
            submitted += 1;
        }
        submitted
    }
}
