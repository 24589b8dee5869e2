//! Review tables for patchset review notifications.

use crate::ports::UserDirectory;
use crate::tickets::Ticket;

/// Renders every review recorded against patchset `number`, revision `rev`.
///
/// Each row carries its own reviewer and score; nothing is taken from the
/// review that triggered the notification.
pub fn review_table(
    ticket: &Ticket,
    number: u32,
    rev: u32,
    users: &dyn UserDirectory,
    datetime_format: &str,
) -> String {
    let mut md = String::from("|**Date**|**Reviewer**|**Score**|**Description**|\n");
    for change in ticket.reviews(number, rev) {
        let Some(review) = change.review.as_ref() else {
            continue;
        };
        let eval = match review.score.emoji() {
            "" => format!("({})", review.score.signed()),
            emoji => format!("{emoji} ({})", review.score.signed()),
        };
        md.push_str(&format!(
            "|{}|{}|{}|{}|\n",
            change.date.format(datetime_format),
            users.display_name(&change.author),
            eval,
            review.score.as_str(),
        ));
    }
    md.push('\n');
    md
}
