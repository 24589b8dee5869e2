//! The slice of the host's ticket model the bridge reads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CommitId, RepositoryName, Timestamp, Username};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Ticket fields that a change can set.
///
/// Declaration order is display order: field tables sort by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TicketField {
    Title,
    Body,
    Responsible,
    Type,
    Status,
    Milestone,
    MergeSha,
    MergeTo,
    Topic,
    Labels,
    Watchers,
    Reviewers,
    Voters,
    Mentions,
    Priority,
    Severity,
}

impl TicketField {
    /// Returns the field's name as the host spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
            Self::Responsible => "responsible",
            Self::Type => "type",
            Self::Status => "status",
            Self::Milestone => "milestone",
            Self::MergeSha => "mergeSha",
            Self::MergeTo => "mergeTo",
            Self::Topic => "topic",
            Self::Labels => "labels",
            Self::Watchers => "watchers",
            Self::Reviewers => "reviewers",
            Self::Voters => "voters",
            Self::Mentions => "mentions",
            Self::Priority => "priority",
            Self::Severity => "severity",
        }
    }
}

impl std::fmt::Display for TicketField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Outcome of a patchset review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewScore {
    Approved,
    LooksGood,
    NotReviewed,
    NeedsImprovement,
    Vetoed,
}

impl ReviewScore {
    /// Numeric score, from `+2` (approved) to `-2` (vetoed).
    pub fn value(self) -> i8 {
        match self {
            Self::Approved => 2,
            Self::LooksGood => 1,
            Self::NotReviewed => 0,
            Self::NeedsImprovement => -1,
            Self::Vetoed => -2,
        }
    }

    /// Numeric score with an explicit `+` on positive values.
    pub fn signed(self) -> String {
        let value = self.value();
        if value > 0 {
            format!("+{value}")
        } else {
            value.to_string()
        }
    }

    /// Emoji shown next to the score; empty for scores without one.
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Approved => "✅",
            Self::LooksGood => "👍",
            Self::NeedsImprovement => "👎",
            Self::Vetoed => "🚫",
            Self::NotReviewed => "",
        }
    }

    /// Textual score as the host spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::LooksGood => "looks_good",
            Self::NotReviewed => "not_reviewed",
            Self::NeedsImprovement => "needs_improvement",
            Self::Vetoed => "vetoed",
        }
    }
}

/// A review recorded against one patchset revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Patchset number.
    pub patchset: u32,
    /// Revision within the patchset.
    pub rev: u32,
    /// Reviewer's verdict.
    pub score: ReviewScore,
}

// ---------------------------------------------------------------------------
// Patchsets
// ---------------------------------------------------------------------------

/// How a patchset revision relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchsetType {
    Proposal,
    FastForward,
    Rebase,
    Squash,
    RebaseSquash,
    Delete,
    Amend,
}

impl PatchsetType {
    /// Returns the type as the host displays it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::FastForward => "fastforward",
            Self::Rebase => "rebase",
            Self::Squash => "squash",
            Self::RebaseSquash => "rebase+squash",
            Self::Delete => "delete",
            Self::Amend => "amend",
        }
    }
}

impl std::fmt::Display for PatchsetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One revision of a ticket's proposed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patchset {
    /// Patchset number; a rewrite starts a new number.
    pub number: u32,
    /// Revision within the patchset; a fast-forward adds a revision.
    pub rev: u32,
    /// Tip commit of this revision.
    pub tip: CommitId,
    /// Merge base the patchset was proposed against.
    pub base: CommitId,
    /// Commits added by this revision.
    pub added: u32,
    /// How this revision was produced.
    pub kind: PatchsetType,
}

// ---------------------------------------------------------------------------
// Changes and tickets
// ---------------------------------------------------------------------------

/// One entry of a ticket's change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Account that made the change.
    pub author: Username,
    /// When the change was recorded.
    pub date: Timestamp,
    /// Fields set by the change; `None` clears the field.
    pub fields: BTreeMap<TicketField, Option<String>>,
    /// Comment text, if the change carries one.
    pub comment: Option<String>,
    /// Patchset revision pushed by the change.
    pub patchset: Option<Patchset>,
    /// Review submitted by the change.
    pub review: Option<Review>,
}

impl Change {
    /// Creates an empty change by `author` at `date`.
    pub fn new(author: Username, date: Timestamp) -> Self {
        Self {
            author,
            date,
            fields: BTreeMap::new(),
            comment: None,
            patchset: None,
            review: None,
        }
    }

    /// Sets a field value.
    pub fn with_field(mut self, field: TicketField, value: impl Into<String>) -> Self {
        self.fields.insert(field, Some(value.into()));
        self
    }

    /// Returns `true` if the change sets `field` (including clearing it).
    pub fn has_field(&self, field: TicketField) -> bool {
        self.fields.contains_key(&field)
    }

    /// Returns `true` if the change carries non-empty comment text.
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Returns `true` if the change changes the ticket status.
    pub fn is_status_change(&self) -> bool {
        self.has_field(TicketField::Status)
    }

    /// Returns `true` if the change records a merge.
    pub fn is_merge(&self) -> bool {
        self.is_status_change() && self.has_field(TicketField::MergeSha)
    }
}

/// A ticket with its full change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket number within the repository.
    pub number: u64,
    /// Current title.
    pub title: String,
    /// Repository the ticket belongs to.
    pub repository: RepositoryName,
    /// Change history, oldest first. The first entry creates the ticket.
    pub changes: Vec<Change>,
}

impl Ticket {
    /// Returns the recorded patchset revision, if any.
    pub fn patchset(&self, number: u32, rev: u32) -> Option<&Patchset> {
        self.changes
            .iter()
            .filter_map(|c| c.patchset.as_ref())
            .find(|p| p.number == number && p.rev == rev)
    }

    /// Returns every change that reviews the given patchset revision, in history order.
    pub fn reviews(&self, number: u32, rev: u32) -> Vec<&Change> {
        self.changes
            .iter()
            .filter(|c| {
                c.review
                    .as_ref()
                    .is_some_and(|r| r.patchset == number && r.rev == rev)
            })
            .collect()
    }
}
