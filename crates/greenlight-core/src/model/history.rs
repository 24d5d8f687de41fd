use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only review-action record under `assets/{id}/history`.
///
/// History is append-only until a scrub: scrubbing snapshots the owning
/// asset into `scrubbedHistory/` and deletes these live entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub action: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl HistoryEntry {
    /// Record an action taken now by `user` on an asset.
    #[must_use]
    pub fn now(user: &super::CurrentUser, action: &str, comment: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            action: action.to_string(),
            comment: comment.map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryEntry;
    use crate::model::{CurrentUser, Role};

    #[test]
    fn json_uses_stored_field_names() {
        let user = CurrentUser {
            id: "u1".into(),
            name: Some("Sam".into()),
            role: Role::Editor,
            brand_codes: vec!["ACME".into()],
            agency_id: None,
        };
        let entry = HistoryEntry::now(&user, "approved", Some("ship it"));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["userName"], "Sam");
        assert_eq!(value["action"], "approved");
        assert_eq!(value["comment"], "ship it");
        assert!(value["timestamp"].is_string());
    }
}
