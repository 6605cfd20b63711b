//! In-process document store.
//!
//! Collections live behind a tokio `RwLock`; every committed change bumps a
//! revision on a `watch` channel and each live query re-reads its
//! collection when the revision moves.

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::{
    encoded_size, AccessRules, CollectionQuery, Document, DocumentStore, DocumentWrite,
    SnapshotStream, StoreError, DEFAULT_MAX_DOCUMENT_BYTES,
};
use crate::models::Identity;

struct Inner {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    rules: RwLock<AccessRules>,
    revision: watch::Sender<u64>,
    max_document_bytes: usize,
}

impl Inner {
    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    async fn snapshot(&self, query: &CollectionQuery) -> Result<Vec<Document>, StoreError> {
        if !self.rules.read().await.can_read() {
            return Err(StoreError::PermissionDenied);
        }
        let mut documents = self
            .collections
            .read()
            .await
            .get(&query.collection)
            .cloned()
            .unwrap_or_default();
        query.sort(&mut documents);
        Ok(documents)
    }
}

#[derive(Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new(AccessRules::recommended())
    }
}

impl MemoryDocumentStore {
    pub fn new(rules: AccessRules) -> Self {
        Self::with_limit(rules, DEFAULT_MAX_DOCUMENT_BYTES)
    }

    pub fn with_limit(rules: AccessRules, max_document_bytes: usize) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(HashMap::new()),
                rules: RwLock::new(rules),
                revision,
                max_document_bytes,
            }),
        }
    }

    /// Replace the access rules; live queries re-evaluate immediately
    pub async fn set_rules(&self, rules: AccessRules) {
        *self.inner.rules.write().await = rules;
        self.inner.bump();
    }

    pub async fn document_count(&self, collection: &str) -> usize {
        self.inner
            .collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

struct WatchState {
    inner: Arc<Inner>,
    query: CollectionQuery,
    revisions: watch::Receiver<u64>,
    primed: bool,
    finished: bool,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn watch(&self, query: &CollectionQuery) -> Result<SnapshotStream, StoreError> {
        let state = WatchState {
            inner: self.inner.clone(),
            query: query.clone(),
            revisions: self.inner.revision.subscribe(),
            primed: false,
            finished: false,
        };

        let snapshots = stream::unfold(state, |mut state| async move {
            if state.finished {
                return None;
            }
            if state.primed {
                state.revisions.changed().await.ok()?;
            } else {
                let _ = state.revisions.borrow_and_update();
                state.primed = true;
            }

            let snapshot = state.inner.snapshot(&state.query).await;
            if snapshot.is_err() {
                state.finished = true;
            }
            Some((snapshot, state))
        });

        Ok(snapshots.boxed())
    }

    async fn add(
        &self,
        auth: Option<&Identity>,
        collection: &str,
        write: DocumentWrite,
    ) -> Result<Document, StoreError> {
        if !self.inner.rules.read().await.can_create(auth) {
            return Err(StoreError::PermissionDenied);
        }

        let data = write.commit(Utc::now());
        let size = encoded_size(&data);
        if size > self.inner.max_document_bytes {
            return Err(StoreError::PayloadTooLarge {
                size,
                limit: self.inner.max_document_bytes,
            });
        }

        let document = Document {
            id: Uuid::new_v4(),
            data,
        };
        self.inner
            .collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        self.inner.bump();

        debug!(collection, id = %document.id, size, "document added");
        Ok(document)
    }

    async fn delete(
        &self,
        auth: Option<&Identity>,
        collection: &str,
        id: Uuid,
    ) -> Result<(), StoreError> {
        let rules = self.inner.rules.read().await.clone();
        {
            let mut collections = self.inner.collections.write().await;
            let documents = collections
                .get_mut(collection)
                .ok_or(StoreError::NotFound(id))?;
            let index = documents
                .iter()
                .position(|doc| doc.id == id)
                .ok_or(StoreError::NotFound(id))?;

            if !rules.can_delete(auth, &documents[index].data) {
                return Err(StoreError::PermissionDenied);
            }
            documents.remove(index);
        }
        self.inner.bump();

        debug!(collection, %id, "document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignInMethod;
    use serde_json::{json, Map};
    use std::time::Duration;

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: uid.to_string(),
            email: Some(format!("{}@example.com", uid)),
            method: SignInMethod::Password,
        }
    }

    fn write(title: &str, author: &str) -> DocumentWrite {
        let mut fields = Map::new();
        fields.insert("title".into(), json!(title));
        fields.insert("authorUid".into(), json!(author));
        DocumentWrite::new(fields).with_server_timestamp("createdAt")
    }

    fn query() -> CollectionQuery {
        CollectionQuery::newest_first("posts", "createdAt")
    }

    async fn next(stream: &mut SnapshotStream) -> Result<Vec<Document>, StoreError> {
        tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("no snapshot delivered")
            .expect("stream ended")
    }

    #[tokio::test]
    async fn test_watch_delivers_initial_and_changed_snapshots() {
        let store = MemoryDocumentStore::default();
        let alice = identity("alice");
        let mut snapshots = store.watch(&query()).await.unwrap();

        assert!(next(&mut snapshots).await.unwrap().is_empty());

        let doc = store.add(Some(&alice), "posts", write("one", "alice")).await.unwrap();
        let snapshot = next(&mut snapshots).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, doc.id);
        assert!(snapshot[0].data["createdAt"].is_string());

        store.delete(Some(&alice), "posts", doc.id).await.unwrap();
        assert!(next(&mut snapshots).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshots_are_newest_first() {
        let store = MemoryDocumentStore::default();
        let alice = identity("alice");
        store.add(Some(&alice), "posts", write("first", "alice")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        store.add(Some(&alice), "posts", write("second", "alice")).await.unwrap();

        let mut snapshots = store.watch(&query()).await.unwrap();
        let titles: Vec<_> = next(&mut snapshots)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.data["title"].clone())
            .collect();
        assert_eq!(titles, vec![json!("second"), json!("first")]);
    }

    #[tokio::test]
    async fn test_create_requires_identity() {
        let store = MemoryDocumentStore::default();
        let err = store.add(None, "posts", write("x", "alice")).await.unwrap_err();
        assert_eq!(err, StoreError::PermissionDenied);
        assert_eq!(store.document_count("posts").await, 0);
    }

    #[tokio::test]
    async fn test_only_author_deletes() {
        let store = MemoryDocumentStore::default();
        let doc = store
            .add(Some(&identity("alice")), "posts", write("x", "alice"))
            .await
            .unwrap();

        let err = store
            .delete(Some(&identity("bob")), "posts", doc.id)
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(store.document_count("posts").await, 1);

        let missing = store
            .delete(Some(&identity("alice")), "posts", Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(missing, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_oversized_document_rejected() {
        let store = MemoryDocumentStore::with_limit(AccessRules::recommended(), 64);
        let mut fields = Map::new();
        fields.insert("content".into(), json!("x".repeat(100)));
        let err = store
            .add(Some(&identity("alice")), "posts", DocumentWrite::new(fields))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PayloadTooLarge { limit: 64, .. }));
    }

    #[tokio::test]
    async fn test_locking_rules_ends_live_queries() {
        let store = MemoryDocumentStore::default();
        let mut snapshots = store.watch(&query()).await.unwrap();
        next(&mut snapshots).await.unwrap();

        store.set_rules(AccessRules::locked()).await;
        assert_eq!(next(&mut snapshots).await, Err(StoreError::PermissionDenied));
        assert!(snapshots.next().await.is_none());
    }
}
