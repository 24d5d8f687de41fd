use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when a path segment cannot form a valid [`DocPath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path segment is empty")]
    EmptySegment,
    #[error("path segment '{0}' contains '/'")]
    SeparatorInSegment(String),
}

/// Slash-joined path into the document store.
///
/// Paths alternate collection and document segments, Firestore-style: an
/// even segment count addresses a document, an odd count a collection.
/// Segments are never empty and never contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocPath(String);

impl DocPath {
    /// Build a path from individual segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if any segment is empty or contains `/`.
    pub fn new(segments: &[&str]) -> Result<Self, PathError> {
        let mut joined = String::new();
        for segment in segments {
            Self::check_segment(segment)?;
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(segment);
        }
        if joined.is_empty() {
            return Err(PathError::EmptySegment);
        }
        Ok(Self(joined))
    }

    /// Append one segment, turning a collection path into a document path
    /// or vice versa.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if the segment is empty or contains `/`.
    pub fn child(&self, segment: &str) -> Result<Self, PathError> {
        Self::check_segment(segment)?;
        Ok(Self(format!("{}/{segment}", self.0)))
    }

    fn check_segment(segment: &str) -> Result<(), PathError> {
        if segment.is_empty() {
            return Err(PathError::EmptySegment);
        }
        if segment.contains('/') {
            return Err(PathError::SeparatorInSegment(segment.to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the path's segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// The final segment (the document or collection id).
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The containing collection or document, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(head, _)| Self(head.to_string()))
    }

    /// Whether this path addresses a document (even segment count).
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.segments().count() % 2 == 0
    }

    /// Whether this path addresses a collection (odd segment count).
    #[must_use]
    pub fn is_collection(&self) -> bool {
        !self.is_document()
    }

    // ------------------------------------------------------------------
    // Well-known locations in the workflow document layout.
    // ------------------------------------------------------------------

    /// `adGroups/{group_id}`
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for an empty id or one containing `/`.
    pub fn ad_group(group_id: &str) -> Result<Self, PathError> {
        Self::new(&["adGroups", group_id])
    }

    /// `adGroups/{group_id}/assets`
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for an empty id or one containing `/`.
    pub fn assets(group_id: &str) -> Result<Self, PathError> {
        Self::new(&["adGroups", group_id, "assets"])
    }

    /// `adGroups/{group_id}/assets/{asset_id}`
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for an empty id or one containing `/`.
    pub fn asset(group_id: &str, asset_id: &str) -> Result<Self, PathError> {
        Self::new(&["adGroups", group_id, "assets", asset_id])
    }

    /// `adGroups/{group_id}/assets/{asset_id}/history`
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for an empty id or one containing `/`.
    pub fn asset_history(group_id: &str, asset_id: &str) -> Result<Self, PathError> {
        Self::new(&["adGroups", group_id, "assets", asset_id, "history"])
    }

    /// `adGroups/{group_id}/recipes`
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for an empty id or one containing `/`.
    pub fn recipes(group_id: &str) -> Result<Self, PathError> {
        Self::new(&["adGroups", group_id, "recipes"])
    }

    /// `scrubbedHistory/{chain_root_id}/assets`
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for an empty id or one containing `/`.
    pub fn scrubbed_assets(chain_root_id: &str) -> Result<Self, PathError> {
        Self::new(&["scrubbedHistory", chain_root_id, "assets"])
    }

    /// `scrubbedHistory/{chain_root_id}/assets/{asset_id}`
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for an empty id or one containing `/`.
    pub fn scrubbed_asset(chain_root_id: &str, asset_id: &str) -> Result<Self, PathError> {
        Self::new(&["scrubbedHistory", chain_root_id, "assets", asset_id])
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
