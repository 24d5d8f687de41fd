//! The review-history scrub operation.
//!
//! Scrubbing collapses a group's version chains to a single forward-going
//! asset per recipe: every chain member is snapshotted into
//! `scrubbedHistory/{rootId}/assets/`, live history entries are deleted,
//! superseded versions are deleted, and the surviving terminal is reset to
//! version 1 with a remapped status. The rewrite is one all-or-nothing
//! batch; only the follow-up group-status write can leave the group stale,
//! and that write is idempotent and safe to re-issue.
//!
//! Concurrent scrubs of the same group are not mutually excluded, and a
//! review landing mid-scrub is last-write-wins at the document level. Both
//! are accepted races of the underlying store model.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::{debug, warn};

use greenlight_core::config::ScrubConfig;
use greenlight_core::error::{ErrorCode, StoreError};
use greenlight_core::model::{Asset, AssetStatus, CurrentUser, GroupStatus, Recipe};
use greenlight_core::store::{DocPath, DocumentStore, PathError, WriteOp};
use greenlight_status::aggregate;

use crate::chain::{build_chains, Chain};

/// Why a scrub failed or could not proceed.
#[derive(Debug, thiserror::Error)]
pub enum ScrubError {
    /// The group still has unresolved review work and the caller did not
    /// confirm. Nothing was written.
    #[error("group has unresolved review work: {pending} pending, {edit_requested} edit-requested")]
    UnresolvedWork { pending: usize, edit_requested: usize },

    /// A document id could not form a valid store path. Nothing was written.
    #[error(transparent)]
    Path(#[from] PathError),

    /// An asset snapshot could not be encoded. Nothing was written.
    #[error("failed to encode asset snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The store failed during planning reads or the batch commit. The
    /// batch is all-or-nothing, so nothing was applied.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The batch committed but the group's status could not be updated:
    /// assets are scrubbed while the stored group status is stale. The
    /// intended status is carried so callers can re-issue the idempotent
    /// update.
    #[error("scrub batch committed but group {group_id} status was not updated to {intended}")]
    StaleGroupStatus {
        group_id: String,
        intended: GroupStatus,
        #[source]
        source: StoreError,
    },
}

impl ScrubError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnresolvedWork { .. } => ErrorCode::UnresolvedReviewWork,
            Self::Path(_) => ErrorCode::InvalidPath,
            Self::Snapshot(_) => ErrorCode::MalformedDocument,
            Self::Store(err) => err.code(),
            Self::StaleGroupStatus { .. } => ErrorCode::GroupStatusStale,
        }
    }
}

/// Caller's answer to the unresolved-work guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Unconfirmed,
    Confirmed,
}

/// Everything needed to execute a scrub, computed up front.
///
/// Planning performs only reads; a plan can be inspected (op counts, the
/// unresolved-work guard, the resulting group status) and discarded
/// without touching the store.
#[derive(Debug, Clone)]
pub struct ScrubPlan {
    group_id: String,
    scrubbed_by: String,
    chains: Vec<Chain>,
    ops: Vec<WriteOp>,
    survivors: Vec<(String, AssetStatus)>,
    group_status: GroupStatus,
    pending: usize,
    edit_requested: usize,
    history_deletes: usize,
}

impl ScrubPlan {
    /// Whether the unresolved-work guard applies: any asset in the group
    /// is still `pending` or `edit_requested`.
    #[must_use]
    pub const fn requires_confirmation(&self) -> bool {
        self.pending + self.edit_requested > 0
    }

    /// The group status the scrub will persist after the batch.
    #[must_use]
    pub const fn group_status(&self) -> GroupStatus {
        self.group_status
    }

    /// Surviving assets and their post-scrub statuses.
    #[must_use]
    pub fn survivors(&self) -> &[(String, AssetStatus)] {
        &self.survivors
    }

    /// The version chains the plan covers.
    #[must_use]
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Total queued batch ops.
    #[must_use]
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }
}

/// What a committed scrub did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubOutcome {
    /// Assets snapshotted into `scrubbedHistory/`.
    pub snapshotted: usize,
    /// Superseded assets deleted outright.
    pub deleted_assets: usize,
    /// Terminal assets updated in place.
    pub updated_assets: usize,
    /// Live history entries deleted.
    pub deleted_history: usize,
    /// The group status persisted after the batch.
    pub group_status: GroupStatus,
    /// Attempts the group-status write took (1 = first try).
    pub group_status_attempts: u32,
}

/// Status carried forward by the surviving asset of each chain.
///
/// Unresolved work becomes `ready` (back in the review queue), a rejected
/// terminal is parked as `archived`, an archived one stays archived, and
/// approved/ready survivors keep their status.
const fn remap_survivor_status(status: AssetStatus) -> AssetStatus {
    match status {
        AssetStatus::Pending | AssetStatus::EditRequested => AssetStatus::Ready,
        AssetStatus::Rejected | AssetStatus::Archived => AssetStatus::Archived,
        AssetStatus::Ready | AssetStatus::Approved => status,
    }
}

/// Executes review-history scrubs against an injected store.
pub struct Scrubber<S> {
    store: S,
    config: ScrubConfig,
}

impl<S: DocumentStore> Scrubber<S> {
    pub const fn new(store: S, config: ScrubConfig) -> Self {
        Self { store, config }
    }

    /// Load the group's live assets from the store.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError`] if the listing read fails.
    pub async fn load_assets(&self, group_id: &str) -> Result<Vec<Asset>, ScrubError> {
        let docs = self.store.list_children(&DocPath::assets(group_id)?).await?;
        Ok(docs
            .iter()
            .map(|doc| Asset::from_document(&doc.id, &doc.fields))
            .collect())
    }

    /// Load the group's recipes, for callers sizing the group by its
    /// recipe list rather than by distinct asset codes.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError`] if the listing read fails.
    pub async fn load_recipes(&self, group_id: &str) -> Result<Vec<Recipe>, ScrubError> {
        let docs = self
            .store
            .list_children(&DocPath::recipes(group_id)?)
            .await?;
        Ok(docs
            .iter()
            .map(|doc| Recipe::from_document(&doc.id, &doc.fields))
            .collect())
    }

    /// [`Scrubber::plan`] fed from a fresh asset listing.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError`] if any read fails; nothing is written.
    pub async fn plan_group(
        &self,
        group_id: &str,
        user: &CurrentUser,
    ) -> Result<ScrubPlan, ScrubError> {
        let assets = self.load_assets(group_id).await?;
        self.plan(group_id, &assets, user).await
    }

    /// Build a scrub plan for `assets`.
    ///
    /// Enumerates every member's history subcollection before queueing a
    /// single write, so a failed read aborts with the store untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError`] if a history listing fails or a snapshot
    /// cannot be encoded; nothing is written.
    pub async fn plan(
        &self,
        group_id: &str,
        assets: &[Asset],
        user: &CurrentUser,
    ) -> Result<ScrubPlan, ScrubError> {
        let chains = build_chains(assets);
        let by_id: BTreeMap<&str, &Asset> =
            assets.iter().map(|a| (a.id.as_str(), a)).collect();

        // Listing reads first; any failure aborts before a batch exists.
        let mut history_ids: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for chain in &chains {
            for member_id in &chain.member_ids {
                let history_path = DocPath::asset_history(group_id, member_id)?;
                let entries = self.store.list_children(&history_path).await?;
                history_ids.insert(member_id, entries.into_iter().map(|d| d.id).collect());
            }
        }

        let mut ops = Vec::new();
        let mut survivors = Vec::new();
        let mut history_deletes = 0;
        for chain in &chains {
            for member_id in &chain.member_ids {
                let Some(asset) = by_id.get(member_id.as_str()) else {
                    continue;
                };

                // Immutable snapshot of the pre-scrub document.
                ops.push(WriteOp::Set {
                    path: DocPath::scrubbed_asset(&chain.root_id, member_id)?,
                    data: serde_json::to_value(asset)?,
                });

                let history_path = DocPath::asset_history(group_id, member_id)?;
                if let Some(entry_ids) = history_ids.get(member_id.as_str()) {
                    for entry_id in entry_ids {
                        ops.push(WriteOp::Delete {
                            path: history_path.child(entry_id)?,
                        });
                        history_deletes += 1;
                    }
                }

                let asset_path = DocPath::asset(group_id, member_id)?;
                if *member_id == chain.terminal_id {
                    let next = remap_survivor_status(asset.status);
                    ops.push(WriteOp::Update {
                        path: asset_path,
                        data: json!({
                            "version": 1,
                            "parentAdId": Value::Null,
                            "scrubbedFrom": chain.root_id,
                            "status": next.as_str(),
                        }),
                    });
                    survivors.push((member_id.clone(), next));
                } else {
                    ops.push(WriteOp::Delete { path: asset_path });
                }
            }
        }

        // The scrub is itself a terminal workflow event, so this is a
        // deliberate local check rather than the group-status resolver:
        // nothing left but archived survivors means the group is done.
        let group_status = if survivors
            .iter()
            .all(|(_, status)| *status == AssetStatus::Archived)
        {
            GroupStatus::Done
        } else {
            GroupStatus::Ready
        };

        let rollup = aggregate(assets, &[]);
        Ok(ScrubPlan {
            group_id: group_id.to_string(),
            scrubbed_by: user.id.clone(),
            chains,
            ops,
            survivors,
            group_status,
            pending: rollup.counts.pending,
            edit_requested: rollup.counts.edit_requested,
            history_deletes,
        })
    }

    /// Commit a plan: one atomic batch, then the group-status write.
    ///
    /// # Errors
    ///
    /// - [`ScrubError::UnresolvedWork`] if the guard applies and the caller
    ///   did not confirm; nothing is written.
    /// - [`ScrubError::Store`] if the batch fails; nothing is applied.
    /// - [`ScrubError::StaleGroupStatus`] if the batch committed but the
    ///   group-status write failed after every retry.
    pub async fn execute(
        &self,
        plan: &ScrubPlan,
        confirmation: Confirmation,
    ) -> Result<ScrubOutcome, ScrubError> {
        if self.config.require_confirmation
            && plan.requires_confirmation()
            && confirmation != Confirmation::Confirmed
        {
            return Err(ScrubError::UnresolvedWork {
                pending: plan.pending,
                edit_requested: plan.edit_requested,
            });
        }

        self.store.batch_write(plan.ops.clone()).await?;
        debug!(
            group = plan.group_id.as_str(),
            ops = plan.ops.len(),
            chains = plan.chains.len(),
            "scrub batch committed"
        );

        // Separate round trip by design: the batch's outcome gates it, and
        // a crash here leaves assets scrubbed with a stale group status.
        let group_path = DocPath::ad_group(&plan.group_id)?;
        let patch = json!({
            "status": plan.group_status.as_str(),
            "scrubbedBy": plan.scrubbed_by,
            "scrubbedAt": chrono::Utc::now().to_rfc3339(),
        });
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.store.update_document(&group_path, patch.clone()).await {
                Ok(()) => break,
                Err(err) if attempts <= self.config.group_status_retries => {
                    warn!(
                        group = plan.group_id.as_str(),
                        error = %err,
                        attempts,
                        "group status update failed after scrub, retrying"
                    );
                }
                Err(err) => {
                    warn!(
                        group = plan.group_id.as_str(),
                        error = %err,
                        "group status left stale after committed scrub"
                    );
                    return Err(ScrubError::StaleGroupStatus {
                        group_id: plan.group_id.clone(),
                        intended: plan.group_status,
                        source: err,
                    });
                }
            }
        }

        let updated_assets = plan.survivors.len();
        let snapshotted = plan
            .chains
            .iter()
            .map(|chain| chain.member_ids.len())
            .sum::<usize>();
        Ok(ScrubOutcome {
            snapshotted,
            deleted_assets: snapshotted - updated_assets,
            updated_assets,
            deleted_history: plan.history_deletes,
            group_status: plan.group_status,
            group_status_attempts: attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::remap_survivor_status;
    use greenlight_core::model::AssetStatus;

    #[test]
    fn survivor_status_remap_table() {
        assert_eq!(
            remap_survivor_status(AssetStatus::Pending),
            AssetStatus::Ready
        );
        assert_eq!(
            remap_survivor_status(AssetStatus::EditRequested),
            AssetStatus::Ready
        );
        assert_eq!(
            remap_survivor_status(AssetStatus::Rejected),
            AssetStatus::Archived
        );
        assert_eq!(
            remap_survivor_status(AssetStatus::Archived),
            AssetStatus::Archived
        );
        assert_eq!(
            remap_survivor_status(AssetStatus::Approved),
            AssetStatus::Approved
        );
        assert_eq!(remap_survivor_status(AssetStatus::Ready), AssetStatus::Ready);
    }
}
