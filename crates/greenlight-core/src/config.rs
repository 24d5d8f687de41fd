//! Workflow configuration, loaded from `greenlight.toml`.
//!
//! A missing file yields defaults; a malformed file is a hard error so a
//! typo never silently disables the scrub confirmation guard.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub scrub: ScrubConfig,
}

/// Knobs for the review-history scrub operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubConfig {
    /// Require explicit confirmation when a group still has pending or
    /// edit-requested assets.
    #[serde(default = "default_true")]
    pub require_confirmation: bool,
    /// Extra attempts for the post-batch group-status write before the
    /// stale-status error is surfaced. The write is idempotent.
    #[serde(default = "default_group_status_retries")]
    pub group_status_retries: u32,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            require_confirmation: default_true(),
            group_status_retries: default_group_status_retries(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_group_status_retries() -> u32 {
    1
}

/// Load the workflow config from `path`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_workflow_config(path: &Path) -> Result<WorkflowConfig> {
    if !path.exists() {
        return Ok(WorkflowConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read workflow config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parse workflow config at {}", path.display()))
}
