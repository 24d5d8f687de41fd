//! The injected document-store seam.
//!
//! The core never talks to a network directly; everything that persists goes
//! through [`DocumentStore`]. The host application adapts its real backend
//! (Firestore in production) to this trait; [`memory::MemoryStore`] is the
//! in-crate reference implementation used by tests.

pub mod memory;
mod path;

pub use memory::MemoryStore;
pub use path::{DocPath, PathError};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// One document read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The document's id (final path segment).
    pub id: String,
    /// The document's fields as stored.
    pub fields: Value,
}

/// One queued write inside a batch.
///
/// `Set` replaces the whole document, `Update` merges top-level fields into
/// an existing document, `Delete` removes it (deleting a missing document is
/// a no-op, matching Firestore semantics).
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Set { path: DocPath, data: Value },
    Update { path: DocPath, data: Value },
    Delete { path: DocPath },
}

impl WriteOp {
    /// The document path this op targets.
    #[must_use]
    pub const fn path(&self) -> &DocPath {
        match self {
            Self::Set { path, .. } | Self::Update { path, .. } | Self::Delete { path } => path,
        }
    }
}

/// Narrow async interface over the host's document database.
///
/// `batch_write` must be all-or-nothing: either every queued op is applied
/// or none is. There is no ordering or atomicity guarantee *between*
/// separate calls; callers that need a post-batch follow-up write own that
/// inconsistency window.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List the direct child documents of a collection path.
    ///
    /// Returns documents ordered by id so calls are deterministic.
    async fn list_children(&self, parent: &DocPath) -> Result<Vec<Document>, StoreError>;

    /// Apply every op atomically, or none of them.
    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;

    /// Merge `patch`'s top-level fields into an existing document.
    async fn update_document(&self, path: &DocPath, patch: Value) -> Result<(), StoreError>;
}

/// Callback receiving the full child snapshot of a watched collection.
pub type ChangeHandler = Arc<dyn Fn(&[Document]) + Send + Sync>;

/// Handle for one live subscription; dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap an unsubscribe action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Explicitly stop receiving snapshots.
    pub fn unsubscribe(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Store that can push live collection snapshots.
///
/// The current snapshot is delivered once at subscribe time, then again
/// after every committed write touching the collection. Handlers stay
/// pure-data consumers: they receive documents and typically feed the
/// status resolvers, never the store itself.
pub trait WatchStore: DocumentStore {
    fn subscribe(&self, parent: &DocPath, handler: ChangeHandler) -> Subscription;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    async fn list_children(&self, parent: &DocPath) -> Result<Vec<Document>, StoreError> {
        (**self).list_children(parent).await
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        (**self).batch_write(ops).await
    }

    async fn update_document(&self, path: &DocPath, patch: Value) -> Result<(), StoreError> {
        (**self).update_document(path, patch).await
    }
}
