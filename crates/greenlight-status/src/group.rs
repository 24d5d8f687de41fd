//! Persisted lifecycle-status resolution for one ad group.

use greenlight_core::model::{Asset, AssetStatus, GroupStatus};

/// Derive the next persisted status for a group from its assets.
///
/// Decision order:
/// 1. `archived` and `locked` are terminal and pass through untouched.
/// 2. Any `ready` asset makes the whole group `ready` — something is
///    waiting for review.
/// 3. A non-empty asset set with nothing `ready` or `pending` is fully
///    `reviewed`.
/// 4. Everything else is `pending`.
///
/// Pure: the caller persists the result and fans it out to the group and
/// any linked project documents.
#[must_use]
pub fn resolve_group_status(
    assets: &[Asset],
    has_recipes: bool,
    was_designed: bool,
    current: GroupStatus,
) -> GroupStatus {
    // Reserved inputs for recipe-aware resolution; they do not affect the
    // result today and tests pin that.
    let _ = (has_recipes, was_designed);

    if current.is_terminal() {
        return current;
    }

    if assets
        .iter()
        .any(|asset| asset.status == AssetStatus::Ready)
    {
        return GroupStatus::Ready;
    }

    let all_reviewed = !assets.is_empty()
        && assets.iter().all(|asset| {
            !matches!(asset.status, AssetStatus::Ready | AssetStatus::Pending)
        });
    if all_reviewed {
        GroupStatus::Reviewed
    } else {
        GroupStatus::Pending
    }
}
