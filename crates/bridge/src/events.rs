//! The closed set of events the bridge reports.
//!
//! Host hooks translate their callbacks into a [`NotificationEvent`]; the
//! [`crate::PayloadBuilder`] matches on it exhaustively.

use crate::tickets::{Change, Patchset, Review, Ticket};
use crate::{CommitId, RefKind, RefName, RepositoryModel, UserProfile};

/// A single ref command from a push, restricted to branches and tags.
#[derive(Debug, Clone, Copy)]
pub struct RefEvent<'a> {
    /// Account that pushed.
    pub actor: &'a UserProfile,
    /// Repository pushed to.
    pub repository: &'a RepositoryModel,
    /// Fully-qualified ref name.
    pub ref_name: &'a RefName,
    /// Branch or tag.
    pub kind: RefKind,
    /// Previous ref value (all zeros on create).
    pub old_id: &'a CommitId,
    /// New ref value (all zeros on delete).
    pub new_id: &'a CommitId,
}

impl<'a> RefEvent<'a> {
    /// Builds a ref event, or `None` when the ref is neither a branch nor a tag.
    pub fn new(
        actor: &'a UserProfile,
        repository: &'a RepositoryModel,
        ref_name: &'a RefName,
        old_id: &'a CommitId,
        new_id: &'a CommitId,
    ) -> Option<Self> {
        let kind = RefKind::of(ref_name)?;
        Some(Self {
            actor,
            repository,
            ref_name,
            kind,
            old_id,
            new_id,
        })
    }
}

/// A ticket and the change being reported.
#[derive(Debug, Clone, Copy)]
pub struct TicketEvent<'a> {
    /// Account that made the change.
    pub actor: &'a UserProfile,
    /// The ticket, including the change being reported.
    pub ticket: &'a Ticket,
    /// The change being reported.
    pub change: &'a Change,
}

/// Everything the bridge can turn into a message.
#[derive(Debug, Clone, Copy)]
pub enum NotificationEvent<'a> {
    RefCreated(RefEvent<'a>),
    RefUpdated {
        event: RefEvent<'a>,
        fast_forward: bool,
    },
    RefDeleted(RefEvent<'a>),
    TicketCreated(TicketEvent<'a>),
    TicketPatchset {
        event: TicketEvent<'a>,
        patchset: &'a Patchset,
    },
    TicketReview {
        event: TicketEvent<'a>,
        review: &'a Review,
    },
    TicketMerged(TicketEvent<'a>),
    TicketStatusChanged(TicketEvent<'a>),
    TicketCommented(TicketEvent<'a>),
}

impl<'a> NotificationEvent<'a> {
    /// Classifies a ticket update.
    ///
    /// Precedence is review, patchset, merge, status change, comment. Comments
    /// are only reported when `post_comments` is set; anything else yields `None`.
    pub fn ticket_update(event: TicketEvent<'a>, post_comments: bool) -> Option<Self> {
        let change = event.change;
        if let Some(review) = change.review.as_ref() {
            Some(Self::TicketReview { event, review })
        } else if let Some(patchset) = change.patchset.as_ref() {
            Some(Self::TicketPatchset { event, patchset })
        } else if change.is_merge() {
            Some(Self::TicketMerged(event))
        } else if change.is_status_change() {
            Some(Self::TicketStatusChanged(event))
        } else if change.has_comment() && post_comments {
            Some(Self::TicketCommented(event))
        } else {
            None
        }
    }
}
