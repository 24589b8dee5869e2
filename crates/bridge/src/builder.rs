//! Turns [`NotificationEvent`]s into [`Payload`]s.
//!
//! Pure apart from the reads it makes through the [`CommitGraph`] and
//! [`UserDirectory`] ports. Routing (the payload's destination) is left to
//! the caller; see [`crate::policy`].

use tracing::warn;

use crate::avatar::event_icon;
use crate::commits::CommitSummarizer;
use crate::config::NotifierConfig;
use crate::events::{NotificationEvent, RefEvent, TicketEvent};
use crate::fields::{ChangeKind, FieldTable};
use crate::links::Links;
use crate::ports::{CommitGraph, UserDirectory};
use crate::reviews::review_table;
use crate::tickets::{Patchset, Review};
use crate::{Payload, RefKind};

/// Builds chat payloads from events.
pub struct PayloadBuilder<'a> {
    config: &'a NotifierConfig,
    graph: &'a dyn CommitGraph,
    users: &'a dyn UserDirectory,
    links: Links,
}

impl<'a> PayloadBuilder<'a> {
    /// Creates a builder over the given configuration and host ports.
    pub fn new(
        config: &'a NotifierConfig,
        graph: &'a dyn CommitGraph,
        users: &'a dyn UserDirectory,
    ) -> Self {
        Self {
            config,
            graph,
            users,
            links: Links::new(&config.web.canonical_url),
        }
    }

    /// Builds the payload for `event`, or `None` when the event is not reported.
    pub fn build(&self, event: &NotificationEvent<'_>) -> Option<Payload> {
        match *event {
            NotificationEvent::RefCreated(e) => Some(self.ref_created(e)),
            NotificationEvent::RefUpdated {
                event: e,
                fast_forward,
            } => Some(self.ref_updated(e, fast_forward)),
            NotificationEvent::RefDeleted(e) => Some(self.ref_deleted(e)),
            NotificationEvent::TicketCreated(e) => Some(self.ticket_created(e)),
            NotificationEvent::TicketPatchset { event: e, patchset } => {
                Some(self.ticket_patchset(e, patchset))
            }
            NotificationEvent::TicketReview { event: e, review } => {
                Some(self.ticket_review(e, review))
            }
            NotificationEvent::TicketMerged(e) => {
                let activity = format!(
                    "{} has merged a {} ticket",
                    e.actor.display_name(),
                    repo_of(e)
                );
                Some(self.ticket_update(e, activity, None, ChangeKind::Update))
            }
            NotificationEvent::TicketStatusChanged(e) => {
                let activity = format!(
                    "{} has changed the status of a {} ticket",
                    e.actor.display_name(),
                    repo_of(e)
                );
                Some(self.ticket_update(e, activity, None, ChangeKind::Update))
            }
            NotificationEvent::TicketCommented(e) => {
                if !self.config.posting.post_ticket_comments {
                    return None;
                }
                let activity = format!(
                    "{} has commented on a {} ticket",
                    e.actor.display_name(),
                    repo_of(e)
                );
                Some(self.ticket_update(e, activity, None, ChangeKind::Update))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Refs
    // -----------------------------------------------------------------------

    fn ref_payload(&self, e: RefEvent<'_>, body: String) -> Payload {
        let activity = format!(
            "{} has pushed to {}",
            e.actor.display_name(),
            e.repository.name.display_name()
        );
        Payload::new()
            .maybe_icon(event_icon(
                self.config.icons.git.as_deref(),
                &self.config.icons,
                e.actor,
            ))
            .activity(activity)
            .body(body)
    }

    fn ref_created(&self, e: RefEvent<'_>) -> Payload {
        let repo = &e.repository.name;
        let short_ref = e.ref_name.short_name();
        let body = format!(
            "**{}** has created {} [{}]({}) in [{}]({})",
            e.actor.display_name(),
            e.kind,
            short_ref,
            self.links.log(repo, short_ref),
            repo.display_name(),
            self.links.summary(repo),
        );
        self.ref_payload(e, body)
    }

    fn ref_updated(&self, e: RefEvent<'_>, fast_forward: bool) -> Payload {
        let repo = &e.repository.name;
        let short_ref = e.ref_name.short_name();

        let mut summary = None;
        let (action, url) = match e.kind {
            RefKind::Tag => (
                "**MOVED** tag".to_string(),
                self.links.commit(repo, e.new_id),
            ),
            RefKind::Branch => {
                let url = self.links.log(repo, short_ref);
                if fast_forward {
                    let walked = self.summarizer().summarize(repo, e.old_id, e.new_id);
                    let action = match walked.count {
                        1 => "pushed 1 commit to".to_string(),
                        n => format!("pushed {n} commits to"),
                    };
                    summary = Some(walked.markdown);
                    (action, url)
                } else {
                    ("**REWRITTEN**".to_string(), url)
                }
            }
        };

        let mut body = format!(
            "**{}** has {} [{}]({}) in [{}]({})",
            e.actor.display_name(),
            action,
            short_ref,
            url,
            repo.display_name(),
            self.links.summary(repo),
        );
        if let Some(table) = summary.filter(|md| !md.is_empty()) {
            body.push_str("\n\n");
            body.push_str(&table);
        }
        self.ref_payload(e, body)
    }

    fn ref_deleted(&self, e: RefEvent<'_>) -> Payload {
        let repo = &e.repository.name;
        let body = format!(
            "**{}** has deleted {} **{}** from [{}]({})",
            e.actor.display_name(),
            e.kind,
            e.ref_name.short_name(),
            repo.display_name(),
            self.links.summary(repo),
        );
        self.ref_payload(e, body)
    }

    // -----------------------------------------------------------------------
    // Tickets
    // -----------------------------------------------------------------------

    fn ticket_header(&self, e: TicketEvent<'_>) -> String {
        let ticket = e.ticket;
        format!(
            "**{}** [ticket-{}]({}): {}\n",
            repo_of(e),
            ticket.number,
            self.links.ticket(&ticket.repository, ticket.number),
            ticket.title,
        )
    }

    fn ticket_payload(&self, e: TicketEvent<'_>, activity: String, body: String) -> Payload {
        Payload::new()
            .maybe_icon(event_icon(
                self.config.icons.ticket.as_deref(),
                &self.config.icons,
                e.actor,
            ))
            .activity(activity)
            .body(body)
    }

    fn fields(&self) -> FieldTable<'_> {
        FieldTable::new(self.users, self.config.posting.post_ticket_comments)
    }

    fn summarizer(&self) -> CommitSummarizer<'_> {
        CommitSummarizer::new(self.graph, &self.links, self.config.web.short_commit_id_length)
    }

    fn ticket_created(&self, e: TicketEvent<'_>) -> Payload {
        let activity = format!(
            "{} has created a ticket for {}",
            e.actor.display_name(),
            repo_of(e)
        );
        let mut body = self.ticket_header(e);
        body.push_str(&self.fields().render(e.change, ChangeKind::Creation));
        self.ticket_payload(e, activity, body)
    }

    /// Header, then `detail`, then the change's fields unless `detail` already
    /// carries them (patchsets render fields above the commit list).
    fn ticket_update(
        &self,
        e: TicketEvent<'_>,
        activity: String,
        detail: Option<String>,
        kind: ChangeKind,
    ) -> Payload {
        let mut body = self.ticket_header(e);
        if let Some(detail) = detail.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            body.push_str(detail);
        }
        if kind != ChangeKind::Patchset {
            body.push_str(&self.fields().render(e.change, kind));
        }
        self.ticket_payload(e, activity, body)
    }

    fn ticket_review(&self, e: TicketEvent<'_>, review: &Review) -> Payload {
        let activity = format!(
            "{} has reviewed {} patchset {}-{}",
            e.actor.display_name(),
            repo_of(e),
            review.patchset,
            review.rev
        );
        let table = review_table(
            e.ticket,
            review.patchset,
            review.rev,
            self.users,
            &self.config.web.datetime_format(),
        );
        self.ticket_update(e, activity, Some(table), ChangeKind::Review)
    }

    fn ticket_patchset(&self, e: TicketEvent<'_>, patchset: &Patchset) -> Payload {
        let author = e.actor.display_name();
        let repo = repo_of(e);

        let (activity, base) = if patchset.rev == 1 {
            let activity = if patchset.number == 1 {
                format!("{author} has pushed a proposal for {repo}")
            } else {
                format!(
                    "{author} has rewritten a {repo} patchset ({})",
                    patchset.kind
                )
            };
            (activity, &patchset.base)
        } else {
            let noun = if patchset.added == 1 { "commit" } else { "commits" };
            let activity = format!(
                "{author} has added {} {noun} to a {repo} ticket",
                patchset.added
            );
            let base = match e.ticket.patchset(patchset.number, patchset.rev - 1) {
                Some(previous) => &previous.tip,
                None => {
                    warn!(
                        ticket = e.ticket.number,
                        patchset = patchset.number,
                        rev = patchset.rev,
                        "Previous patchset revision not recorded, comparing against patchset base"
                    );
                    &patchset.base
                }
            };
            (activity, base)
        };

        let mut detail = self.fields().render(e.change, ChangeKind::Patchset);
        let summary = self
            .summarizer()
            .summarize(&e.ticket.repository, base, &patchset.tip);
        if !summary.markdown.is_empty() {
            detail.push_str("\n\n");
            detail.push_str(&summary.markdown);
        }
        self.ticket_update(e, activity, Some(detail), ChangeKind::Patchset)
    }
}

fn repo_of(e: TicketEvent<'_>) -> &str {
    e.ticket.repository.display_name()
}
