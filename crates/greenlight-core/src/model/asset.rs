use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::{normalize, ParseEnumError};

/// Recipe bucket for assets whose code cannot be resolved at all.
pub const UNKNOWN_RECIPE_CODE: &str = "unknown";

/// The six lifecycle states of one creative asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    Pending,
    Ready,
    Approved,
    Rejected,
    EditRequested,
    Archived,
}

impl AssetStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::EditRequested => "edit_requested",
            Self::Archived => "archived",
        }
    }

    /// Whether this status still needs reviewer or editor attention.
    #[must_use]
    pub const fn is_unresolved(self) -> bool {
        matches!(self, Self::Pending | Self::EditRequested)
    }

    /// Whether this status carries a final review verdict.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Archived)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" => Ok(Self::Pending),
            "ready" => Ok(Self::Ready),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "edit_requested" => Ok(Self::EditRequested),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseEnumError {
                expected: "asset status",
                got: s.to_string(),
            }),
        }
    }
}

/// One versioned creative file under an ad group.
///
/// Versions form a chain through `parent_id` (stored `parentAdId`): each new
/// upload supersedes the asset it points at. At most one member of an active
/// chain is non-archived at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    pub id: String,
    pub filename: String,
    #[serde(rename = "firebaseUrl")]
    pub file_url: Option<String>,
    pub status: AssetStatus,
    pub version: u32,
    #[serde(rename = "parentAdId")]
    pub parent_id: Option<String>,
    pub recipe_code: Option<String>,
    pub scrubbed_from: Option<String>,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            id: String::new(),
            filename: String::new(),
            file_url: None,
            status: AssetStatus::Pending,
            version: 1,
            parent_id: None,
            recipe_code: None,
            scrubbed_from: None,
        }
    }
}

impl Asset {
    /// Decode a stored asset document leniently.
    ///
    /// Unknown or missing `status` folds to `pending` with a warning, and a
    /// stored version below 1 clamps to 1. Nothing here fails: scrub and
    /// aggregation must work over whatever the store already holds.
    #[must_use]
    pub fn from_document(id: &str, fields: &serde_json::Value) -> Self {
        let status = fields
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map_or(AssetStatus::Pending, |raw| {
                raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(
                        asset = id,
                        status = raw,
                        "unknown asset status, treating as pending"
                    );
                    AssetStatus::Pending
                })
            });
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
        };
        let version = fields
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .map_or(1, |n| n.max(1));
        Self {
            id: id.to_string(),
            filename: text("filename").unwrap_or_default(),
            file_url: text("firebaseUrl"),
            status,
            version,
            parent_id: text("parentAdId"),
            recipe_code: text("recipeCode"),
            scrubbed_from: text("scrubbedFrom"),
        }
    }

    /// The recipe code this asset counts under.
    ///
    /// Explicit `recipeCode` wins, then filename extraction, then the
    /// shared [`UNKNOWN_RECIPE_CODE`] bucket.
    #[must_use]
    pub fn resolved_recipe_code(&self) -> String {
        self.recipe_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
            .map(str::to_ascii_lowercase)
            .or_else(|| recipe_code_from_filename(&self.filename))
            .unwrap_or_else(|| UNKNOWN_RECIPE_CODE.to_string())
    }
}

/// Extract a recipe code from an upload filename.
///
/// The code is the filename stem up to the first `_` or `.`, lowercased;
/// `"R12_v3.png"` yields `"r12"`. Returns `None` when nothing usable
/// precedes the first separator.
#[must_use]
pub fn recipe_code_from_filename(filename: &str) -> Option<String> {
    let stem: &str = filename
        .split(['_', '.'])
        .next()
        .unwrap_or_default();
    let code = stem.trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_ascii_lowercase())
    }
}
