//! Ticket field tables.

use crate::commits::escape_cell;
use crate::ports::UserDirectory;
use crate::tickets::{Change, TicketField};
use crate::Username;

/// Which kind of ticket event a field table is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The change that opened the ticket.
    Creation,
    /// A generic update (fields, status, merge, comment).
    Update,
    /// A patchset review.
    Review,
    /// A new patchset or patchset revision.
    Patchset,
}

const CREATION_EXCLUSIONS: &[TicketField] = &[
    TicketField::Watchers,
    TicketField::Voters,
    TicketField::Status,
    TicketField::Mentions,
    TicketField::Title,
];

const UPDATE_EXCLUSIONS: &[TicketField] = &[
    TicketField::Watchers,
    TicketField::Voters,
    TicketField::Mentions,
    TicketField::Title,
    TicketField::Body,
    TicketField::MergeSha,
];

impl ChangeKind {
    /// Fields never shown for this kind of change.
    ///
    /// The title is already part of the message header; watcher, voter and
    /// mention lists are noise in a chat message.
    pub fn exclusions(self) -> &'static [TicketField] {
        match self {
            Self::Creation => CREATION_EXCLUSIONS,
            Self::Update | Self::Review | Self::Patchset => UPDATE_EXCLUSIONS,
        }
    }
}

/// Renders the comment and changed fields of a ticket change.
pub struct FieldTable<'a> {
    users: &'a dyn UserDirectory,
    include_comments: bool,
}

impl<'a> FieldTable<'a> {
    /// Creates a renderer; comment text is only included when `include_comments` is set.
    pub fn new(users: &'a dyn UserDirectory, include_comments: bool) -> Self {
        Self {
            users,
            include_comments,
        }
    }

    /// Renders the change's comment followed by a `|**field**|value|` table.
    ///
    /// Excluded and cleared fields are skipped; the rest appear in field order.
    pub fn render(&self, change: &Change, kind: ChangeKind) -> String {
        let exclusions = kind.exclusions();
        let mut md = String::new();

        if self.include_comments && change.has_comment() {
            if let Some(comment) = change.comment.as_deref() {
                md.push('\n');
                md.push_str(comment);
            }
        }

        let rows: Vec<(TicketField, &str)> = change
            .fields
            .iter()
            .filter(|(field, _)| !exclusions.contains(field))
            .filter_map(|(field, value)| value.as_deref().map(|v| (*field, v)))
            .collect();

        if !rows.is_empty() {
            md.push('\n');
            for (field, value) in rows {
                let value = match field {
                    TicketField::Responsible => self.responsible_name(value),
                    _ => value.to_string(),
                };
                md.push_str(&format!("|**{}**|{}|\n", field, escape_cell(&value)));
            }
            md.push('\n');
        }
        md
    }

    fn responsible_name(&self, value: &str) -> String {
        match Username::new(value) {
            Some(username) => self.users.display_name(&username),
            None => value.to_string(),
        }
    }
}
