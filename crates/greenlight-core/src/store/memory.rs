//! In-memory [`DocumentStore`] with live subscriptions and deterministic
//! fault injection.
//!
//! Backs the scrub test suites and doubles as executable documentation of
//! the store contract: all-or-nothing batches, merge-on-update, no-op
//! deletes of missing documents, and snapshot-per-commit subscriptions.
//! Faults are armed explicitly and fire exactly once (batch/update) or
//! while armed (listing), so failing tests replay identically.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::store::{
    ChangeHandler, DocPath, Document, DocumentStore, Subscription, WatchStore, WriteOp,
};

#[derive(Debug, Default)]
struct Faults {
    fail_next_batch: bool,
    fail_next_update: bool,
    fail_lists_under: Option<DocPath>,
}

#[derive(Debug, Default)]
struct Inner {
    docs: BTreeMap<DocPath, Value>,
    faults: Faults,
}

struct Listener {
    id: u64,
    parent: DocPath,
    handler: ChangeHandler,
}

/// In-memory document store keyed by full document path.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    listeners: Arc<Mutex<Vec<Listener>>>,
    next_listener: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a document directly, bypassing the batch path.
    pub fn insert(&self, path: DocPath, fields: Value) {
        let parent = path.parent();
        self.lock().docs.insert(path, fields);
        if let Some(parent) = parent {
            self.notify(&BTreeSet::from([parent]));
        }
    }

    /// Read a document's fields, if present.
    #[must_use]
    pub fn get(&self, path: &DocPath) -> Option<Value> {
        self.lock().docs.get(path).cloned()
    }

    /// Total number of stored documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.lock().docs.len()
    }

    /// Arm a one-shot failure for the next `batch_write`.
    pub fn fail_next_batch(&self) {
        self.lock().faults.fail_next_batch = true;
    }

    /// Arm a one-shot failure for the next `update_document`.
    pub fn fail_next_update(&self) {
        self.lock().faults.fail_next_update = true;
    }

    /// Fail every `list_children` under `prefix` until cleared.
    pub fn fail_lists_under(&self, prefix: DocPath) {
        self.lock().faults.fail_lists_under = Some(prefix);
    }

    /// Clear any armed listing fault.
    pub fn clear_list_fault(&self) {
        self.lock().faults.fail_lists_under = None;
    }

    fn children_of(&self, parent: &DocPath) -> Vec<Document> {
        let prefix = format!("{}/", parent.as_str());
        self.lock()
            .docs
            .iter()
            .filter_map(|(path, fields)| {
                let rest = path.as_str().strip_prefix(&prefix)?;
                // Direct children only, not nested subcollection documents.
                if rest.contains('/') {
                    return None;
                }
                Some(Document {
                    id: rest.to_string(),
                    fields: fields.clone(),
                })
            })
            .collect()
    }

    /// Push fresh snapshots to every listener watching one of `parents`.
    ///
    /// Handlers run with no store lock held, so they may call back into
    /// the store.
    fn notify(&self, parents: &BTreeSet<DocPath>) {
        let targets: Vec<(ChangeHandler, DocPath)> = {
            let listeners = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            listeners
                .iter()
                .filter(|listener| parents.contains(&listener.parent))
                .map(|listener| (Arc::clone(&listener.handler), listener.parent.clone()))
                .collect()
        };
        for (handler, parent) in targets {
            let snapshot = self.children_of(&parent);
            handler(&snapshot);
        }
    }
}

fn merge_top_level(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        // Non-object patches replace the document wholesale.
        *target = patch.clone();
        return;
    };
    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            target_map.insert(key.clone(), value.clone());
        }
    } else {
        *target = patch.clone();
    }
}

fn apply(docs: &mut BTreeMap<DocPath, Value>, op: &WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Set { path, data } => {
            docs.insert(path.clone(), data.clone());
            Ok(())
        }
        WriteOp::Update { path, data } => {
            let Some(existing) = docs.get_mut(path) else {
                return Err(StoreError::NotFound { path: path.clone() });
            };
            merge_top_level(existing, data);
            Ok(())
        }
        WriteOp::Delete { path } => {
            docs.remove(path);
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_children(&self, parent: &DocPath) -> Result<Vec<Document>, StoreError> {
        {
            let inner = self.lock();
            if let Some(prefix) = &inner.faults.fail_lists_under {
                if parent.as_str().starts_with(prefix.as_str()) {
                    return Err(StoreError::Unavailable {
                        path: parent.clone(),
                        reason: "injected listing fault".into(),
                    });
                }
            }
        }
        Ok(self.children_of(parent))
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let parents = {
            let mut inner = self.lock();
            if inner.faults.fail_next_batch {
                inner.faults.fail_next_batch = false;
                return Err(StoreError::BatchRejected {
                    reason: "injected batch fault".into(),
                });
            }
            // Stage against a copy so a mid-batch failure leaves nothing
            // applied.
            let mut staged = inner.docs.clone();
            for op in &ops {
                apply(&mut staged, op)?;
            }
            inner.docs = staged;
            ops.iter()
                .filter_map(|op| op.path().parent())
                .collect::<BTreeSet<_>>()
        };
        self.notify(&parents);
        Ok(())
    }

    async fn update_document(&self, path: &DocPath, patch: Value) -> Result<(), StoreError> {
        {
            let mut inner = self.lock();
            if inner.faults.fail_next_update {
                inner.faults.fail_next_update = false;
                return Err(StoreError::Unavailable {
                    path: path.clone(),
                    reason: "injected update fault".into(),
                });
            }
            let Some(existing) = inner.docs.get_mut(path) else {
                return Err(StoreError::NotFound { path: path.clone() });
            };
            merge_top_level(existing, &patch);
        }
        if let Some(parent) = path.parent() {
            self.notify(&BTreeSet::from([parent]));
        }
        Ok(())
    }
}

impl WatchStore for MemoryStore {
    fn subscribe(&self, parent: &DocPath, handler: ChangeHandler) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Listener {
                id,
                parent: parent.clone(),
                handler: Arc::clone(&handler),
            });

        // Initial snapshot, delivered synchronously like onSnapshot.
        handler(&self.children_of(parent));

        let listeners = Arc::clone(&self.listeners);
        Subscription::new(move || {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|listener| listener.id != id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::error::StoreError;
    use crate::store::{DocPath, DocumentStore, WatchStore, WriteOp};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn asset_path(id: &str) -> DocPath {
        DocPath::asset("g1", id).unwrap()
    }

    #[tokio::test]
    async fn lists_direct_children_only() {
        let store = MemoryStore::new();
        store.insert(asset_path("a1"), json!({"filename": "one.png"}));
        store.insert(asset_path("a2"), json!({"filename": "two.png"}));
        store.insert(
            DocPath::asset_history("g1", "a1").unwrap().child("h1").unwrap(),
            json!({"action": "approved"}),
        );

        let children = store
            .list_children(&DocPath::assets("g1").unwrap())
            .await
            .unwrap();
        let ids: Vec<_> = children.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn batch_is_all_or_nothing() {
        let store = MemoryStore::new();
        store.insert(asset_path("a1"), json!({"status": "ready"}));

        // Second op updates a missing document, so nothing may apply.
        let err = store
            .batch_write(vec![
                WriteOp::Delete {
                    path: asset_path("a1"),
                },
                WriteOp::Update {
                    path: asset_path("missing"),
                    data: json!({"status": "ready"}),
                },
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.get(&asset_path("a1")).is_some());
    }

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let store = MemoryStore::new();
        store.insert(
            asset_path("a1"),
            json!({"status": "pending", "version": 3, "parentAdId": "a0"}),
        );

        store
            .update_document(
                &asset_path("a1"),
                json!({"status": "ready", "parentAdId": null}),
            )
            .await
            .unwrap();

        let doc = store.get(&asset_path("a1")).unwrap();
        assert_eq!(doc["status"], "ready");
        assert_eq!(doc["version"], 3);
        assert!(doc["parentAdId"].is_null());
    }

    #[tokio::test]
    async fn injected_faults_fire_once() {
        let store = MemoryStore::new();
        store.insert(asset_path("a1"), json!({"status": "pending"}));

        store.fail_next_update();
        assert!(store
            .update_document(&asset_path("a1"), json!({"status": "ready"}))
            .await
            .is_err());
        assert!(store
            .update_document(&asset_path("a1"), json!({"status": "ready"}))
            .await
            .is_ok());

        store.fail_lists_under(DocPath::assets("g1").unwrap());
        assert!(store
            .list_children(&DocPath::assets("g1").unwrap())
            .await
            .is_err());
        store.clear_list_fault();
        assert!(store
            .list_children(&DocPath::assets("g1").unwrap())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn subscriptions_deliver_snapshots_per_commit() {
        let store = MemoryStore::new();
        store.insert(asset_path("a1"), json!({"status": "pending"}));

        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = store.subscribe(
            &DocPath::assets("g1").unwrap(),
            Arc::new(move |docs| sink.lock().unwrap().push(docs.len())),
        );

        // Initial snapshot, then one per committed write.
        store.insert(asset_path("a2"), json!({"status": "pending"}));
        store
            .batch_write(vec![WriteOp::Delete {
                path: asset_path("a1"),
            }])
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);

        // A failed batch commits nothing and notifies nobody.
        store.fail_next_batch();
        assert!(store.batch_write(vec![]).await.is_err());
        assert_eq!(seen.lock().unwrap().len(), 3);

        // Unsubscribed listeners go quiet.
        sub.unsubscribe();
        store.insert(asset_path("a3"), json!({"status": "pending"}));
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn writes_to_other_collections_do_not_notify() {
        let store = MemoryStore::new();
        let seen: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(
            &DocPath::assets("g1").unwrap(),
            Arc::new(move |_| *sink.lock().unwrap() += 1),
        );
        assert_eq!(*seen.lock().unwrap(), 1);

        store.insert(
            DocPath::asset("other-group", "a1").unwrap(),
            json!({"status": "pending"}),
        );
        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
