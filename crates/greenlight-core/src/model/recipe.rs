use serde::{Deserialize, Serialize};

/// Optional explicit grouping record for one creative slot.
///
/// The document id is the recipe number. When a group carries recipe
/// documents, their count supersedes the asset-derived recipe-code set for
/// unit counting; the `assets` field is a denormalized list of asset ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub id: String,
    pub components: Vec<String>,
    pub copy: Option<String>,
    pub assets: Vec<String>,
}

impl Recipe {
    /// Decode a stored recipe document leniently.
    #[must_use]
    pub fn from_document(id: &str, fields: &serde_json::Value) -> Self {
        let strings = |key: &str| {
            fields
                .get(key)
                .and_then(serde_json::Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(serde_json::Value::as_str)
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };
        Self {
            id: id.to_string(),
            components: strings("components"),
            copy: fields
                .get("copy")
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string),
            assets: strings("assets"),
        }
    }
}
