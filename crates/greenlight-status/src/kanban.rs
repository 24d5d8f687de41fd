//! Kanban-column classification.
//!
//! A display-only bucketing, independent of the persisted status resolver
//! in [`crate::group`]: that one answers "what should be stored", this one
//! answers "which column does the card render in".

use serde::{Deserialize, Serialize};
use std::fmt;

use greenlight_core::model::GroupStatus;

use crate::aggregate::StatusCounts;

/// The six kanban columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KanbanColumn {
    Blocked,
    Briefed,
    Reviewed,
    Designed,
    Done,
    New,
}

impl KanbanColumn {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::Briefed => "briefed",
            Self::Reviewed => "reviewed",
            Self::Designed => "designed",
            Self::Done => "done",
            Self::New => "new",
        }
    }
}

impl fmt::Display for KanbanColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a group onto its kanban column.
///
/// Stored statuses with a column of their own pass through unchanged.
/// Otherwise an empty group is `new`, a fully settled one (approved +
/// rejected + archived covering every asset) is `done`, and anything else
/// sits in `designed`. Outstanding edit requests do not move the card out
/// of `designed`; tests pin that behavior.
#[must_use]
pub fn resolve_kanban_column(
    status: GroupStatus,
    asset_count: usize,
    counts: &StatusCounts,
) -> KanbanColumn {
    match status {
        GroupStatus::Blocked => KanbanColumn::Blocked,
        GroupStatus::Briefed => KanbanColumn::Briefed,
        GroupStatus::Reviewed => KanbanColumn::Reviewed,
        GroupStatus::Designed => KanbanColumn::Designed,
        GroupStatus::Done => KanbanColumn::Done,
        GroupStatus::New
        | GroupStatus::Pending
        | GroupStatus::Ready
        | GroupStatus::Archived
        | GroupStatus::Locked => {
            if asset_count == 0 {
                KanbanColumn::New
            } else if counts.settled() >= asset_count {
                KanbanColumn::Done
            } else {
                KanbanColumn::Designed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_kanban_column, KanbanColumn};
    use crate::aggregate::StatusCounts;
    use greenlight_core::model::GroupStatus;

    #[test]
    fn explicit_statuses_pass_through() {
        let busy = StatusCounts {
            pending: 5,
            ..StatusCounts::default()
        };
        for (status, column) in [
            (GroupStatus::Blocked, KanbanColumn::Blocked),
            (GroupStatus::Briefed, KanbanColumn::Briefed),
            (GroupStatus::Reviewed, KanbanColumn::Reviewed),
            (GroupStatus::Designed, KanbanColumn::Designed),
            (GroupStatus::Done, KanbanColumn::Done),
        ] {
            // Counts are irrelevant for the passthrough set.
            assert_eq!(resolve_kanban_column(status, 5, &busy), column);
            assert_eq!(resolve_kanban_column(status, 0, &StatusCounts::default()), column);
        }
    }

    #[test]
    fn empty_groups_are_new() {
        assert_eq!(
            resolve_kanban_column(GroupStatus::Pending, 0, &StatusCounts::default()),
            KanbanColumn::New
        );
    }

    #[test]
    fn fully_settled_groups_are_done() {
        let counts = StatusCounts {
            approved: 2,
            rejected: 1,
            archived: 1,
            ..StatusCounts::default()
        };
        assert_eq!(
            resolve_kanban_column(GroupStatus::Ready, 4, &counts),
            KanbanColumn::Done
        );
    }

    #[test]
    fn partially_reviewed_groups_stay_designed() {
        let counts = StatusCounts {
            approved: 2,
            pending: 2,
            ..StatusCounts::default()
        };
        assert_eq!(
            resolve_kanban_column(GroupStatus::Pending, 4, &counts),
            KanbanColumn::Designed
        );
    }

    // Outstanding edit requests do not get their own column; a card with
    // open edits still renders in `designed`.
    #[test]
    fn edit_requests_do_not_move_the_card() {
        let counts = StatusCounts {
            approved: 3,
            edit_requested: 1,
            ..StatusCounts::default()
        };
        assert_eq!(
            resolve_kanban_column(GroupStatus::Ready, 4, &counts),
            KanbanColumn::Designed
        );
    }
}
