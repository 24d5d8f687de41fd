use crate::store::DocPath;

/// Machine-readable error codes for agent- and toast-friendly reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidEnumValue,
    MalformedDocument,
    UnresolvedReviewWork,
    StoreUnavailable,
    PermissionDenied,
    WriteContention,
    DocumentNotFound,
    BatchRejected,
    GroupStatusStale,
    InvalidPath,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidEnumValue => "E2001",
            Self::MalformedDocument => "E2002",
            Self::InvalidPath => "E2003",
            Self::UnresolvedReviewWork => "E3001",
            Self::StoreUnavailable => "E4001",
            Self::PermissionDenied => "E4002",
            Self::WriteContention => "E4003",
            Self::DocumentNotFound => "E4004",
            Self::BatchRejected => "E4005",
            Self::GroupStatusStale => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and toasts.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Workflow config parse error",
            Self::InvalidEnumValue => "Invalid status/role/version value",
            Self::MalformedDocument => "Malformed stored document",
            Self::InvalidPath => "Invalid document path",
            Self::UnresolvedReviewWork => "Group has unresolved review work",
            Self::StoreUnavailable => "Document store unavailable",
            Self::PermissionDenied => "Permission denied by document store",
            Self::WriteContention => "Write contention in document store",
            Self::DocumentNotFound => "Document not found",
            Self::BatchRejected => "Batch write rejected",
            Self::GroupStatusStale => "Scrub committed but group status is stale",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced alongside the message.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in greenlight.toml and retry."),
            Self::UnresolvedReviewWork => {
                Some("Resolve or explicitly confirm pending/edit-requested assets before scrubbing.")
            }
            Self::GroupStatusStale => {
                Some("Re-issue the group status update; it is idempotent and safe to retry.")
            }
            Self::WriteContention => Some("Retry the operation after a short delay."),
            Self::InvalidEnumValue
            | Self::MalformedDocument
            | Self::InvalidPath
            | Self::StoreUnavailable
            | Self::PermissionDenied
            | Self::DocumentNotFound
            | Self::BatchRejected
            | Self::InternalUnexpected => None,
        }
    }
}

/// Failure reported by an injected [`crate::store::DocumentStore`].
///
/// Every variant carries the path it failed on so callers can report which
/// document or collection was involved without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{path}: store unavailable: {reason}")]
    Unavailable { path: DocPath, reason: String },

    #[error("{path}: permission denied")]
    PermissionDenied { path: DocPath },

    #[error("{path}: write contention")]
    Contention { path: DocPath },

    #[error("{path}: document not found")]
    NotFound { path: DocPath },

    #[error("batch rejected: {reason}")]
    BatchRejected { reason: String },
}

impl StoreError {
    /// Machine-readable code associated with this store error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unavailable { .. } => ErrorCode::StoreUnavailable,
            Self::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::Contention { .. } => ErrorCode::WriteContention,
            Self::NotFound { .. } => ErrorCode::DocumentNotFound,
            Self::BatchRejected { .. } => ErrorCode::BatchRejected,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, StoreError};
    use crate::store::DocPath;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ErrorCode::UnresolvedReviewWork.code(), "E3001");
        assert_eq!(ErrorCode::GroupStatusStale.code(), "E5001");
        assert_eq!(ErrorCode::BatchRejected.code(), "E4005");
    }

    #[test]
    fn store_error_maps_to_code_and_path() {
        let path = DocPath::ad_group("g1").unwrap();
        let err = StoreError::NotFound { path: path.clone() };
        assert_eq!(err.code(), ErrorCode::DocumentNotFound);
        assert!(err.to_string().contains("adGroups/g1"));

        let err = StoreError::Unavailable {
            path,
            reason: "network".into(),
        };
        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
        assert!(err.hint().is_none());
    }
}
