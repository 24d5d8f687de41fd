use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::{normalize, ParseEnumError};
use crate::review_version::ReviewVersion;

/// The ten lifecycle states of an ad group.
///
/// `archived` and `locked` are terminal for status resolution: once a group
/// carries either, derived-status reconciliation leaves it alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    #[default]
    New,
    Blocked,
    Briefed,
    Designed,
    Reviewed,
    Pending,
    Ready,
    Archived,
    Locked,
    Done,
}

impl GroupStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Blocked => "blocked",
            Self::Briefed => "briefed",
            Self::Designed => "designed",
            Self::Reviewed => "reviewed",
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Archived => "archived",
            Self::Locked => "locked",
            Self::Done => "done",
        }
    }

    /// Whether derived-status reconciliation must leave this status alone.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Archived | Self::Locked)
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "new" => Ok(Self::New),
            "blocked" => Ok(Self::Blocked),
            "briefed" => Ok(Self::Briefed),
            "designed" => Ok(Self::Designed),
            "reviewed" => Ok(Self::Reviewed),
            "pending" => Ok(Self::Pending),
            "ready" => Ok(Self::Ready),
            "archived" => Ok(Self::Archived),
            "locked" => Ok(Self::Locked),
            "done" => Ok(Self::Done),
            _ => Err(ParseEnumError {
                expected: "group status",
                got: s.to_string(),
            }),
        }
    }
}

/// All persisted fields for one ad group (one creative request batch).
///
/// The stored `status` is denormalized: it is always derivable from the
/// group's assets, and callers periodically reconcile it to the derived
/// value. The review counters are likewise denormalized aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdGroup {
    pub id: String,
    pub name: String,
    pub brand_code: String,
    pub status: GroupStatus,
    pub month: Option<String>,
    pub due_date: Option<String>,
    pub designer_id: Option<String>,
    pub editor_id: Option<String>,
    pub review_version: ReviewVersion,
    pub reviewed_count: u32,
    pub approved_count: u32,
    pub edit_count: u32,
    pub rejected_count: u32,
    pub thumbnail_url: Option<String>,
}

impl Default for AdGroup {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            brand_code: String::new(),
            status: GroupStatus::New,
            month: None,
            due_date: None,
            designer_id: None,
            editor_id: None,
            review_version: ReviewVersion::Legacy,
            reviewed_count: 0,
            approved_count: 0,
            edit_count: 0,
            rejected_count: 0,
            thumbnail_url: None,
        }
    }
}

impl AdGroup {
    /// Decode a stored group document leniently.
    ///
    /// Unknown or missing `status` folds to `new` with a warning; the
    /// review version normalizes through every legacy shape.
    #[must_use]
    pub fn from_document(id: &str, fields: &serde_json::Value) -> Self {
        let status = fields
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map_or(GroupStatus::New, |raw| {
                raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(group = id, status = raw, "unknown group status, treating as new");
                    GroupStatus::New
                })
            });
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
        };
        let count = |key: &str| {
            fields
                .get(key)
                .and_then(serde_json::Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };
        Self {
            id: id.to_string(),
            name: text("name").unwrap_or_default(),
            brand_code: text("brandCode").unwrap_or_default(),
            status,
            month: text("month"),
            due_date: text("dueDate"),
            designer_id: text("designerId"),
            editor_id: text("editorId"),
            review_version: ReviewVersion::normalize(
                fields.get("reviewVersion").unwrap_or(&serde_json::Value::Null),
            ),
            reviewed_count: count("reviewedCount"),
            approved_count: count("approvedCount"),
            edit_count: count("editCount"),
            rejected_count: count("rejectedCount"),
            thumbnail_url: text("thumbnailUrl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AdGroup, GroupStatus};
    use crate::review_version::ReviewVersion;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn status_json_roundtrips() {
        assert_eq!(
            serde_json::to_string(&GroupStatus::Briefed).unwrap(),
            "\"briefed\""
        );
        assert_eq!(
            serde_json::from_str::<GroupStatus>("\"locked\"").unwrap(),
            GroupStatus::Locked
        );
    }

    #[test]
    fn display_parse_roundtrips() {
        for status in [
            GroupStatus::New,
            GroupStatus::Blocked,
            GroupStatus::Briefed,
            GroupStatus::Designed,
            GroupStatus::Reviewed,
            GroupStatus::Pending,
            GroupStatus::Ready,
            GroupStatus::Archived,
            GroupStatus::Locked,
            GroupStatus::Done,
        ] {
            let rendered = status.to_string();
            assert_eq!(GroupStatus::from_str(&rendered).unwrap(), status);
        }
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(GroupStatus::from_str("active").is_err());
        assert!(GroupStatus::from_str("").is_err());
    }

    #[test]
    fn only_archived_and_locked_are_terminal() {
        assert!(GroupStatus::Archived.is_terminal());
        assert!(GroupStatus::Locked.is_terminal());
        assert!(!GroupStatus::Done.is_terminal());
        assert!(!GroupStatus::Ready.is_terminal());
    }

    #[test]
    fn from_document_is_lenient() {
        let group = AdGroup::from_document(
            "g1",
            &json!({
                "name": "Spring drop",
                "brandCode": "ACME",
                "status": "mystery",
                "reviewVersion": {"label": "Brief"},
                "approvedCount": 4,
            }),
        );
        assert_eq!(group.id, "g1");
        assert_eq!(group.status, GroupStatus::New);
        assert_eq!(group.review_version, ReviewVersion::Brief);
        assert_eq!(group.approved_count, 4);
        assert_eq!(group.rejected_count, 0);
        assert!(group.month.is_none());
    }
}
