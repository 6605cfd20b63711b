//! Feed Store Adapter.
//!
//! Maps the `posts` collection of a [`DocumentStore`] to typed [`Post`]s.
//! Each `subscribe` call runs one delivery task that hands every complete
//! snapshot to `on_update`; the first permission failure marks the adapter
//! degraded and no further subscription reaches the store until `reload`.

mod subscription;

pub use subscription::Subscription;

use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::identity::SessionWatch;
use crate::metrics::{POST_DELETES_TOTAL, POST_WRITES_TOTAL, SNAPSHOTS_DELIVERED_TOTAL};
use crate::models::{
    Identity, NewPost, Post, FIELD_CREATED_AT, POSTS_COLLECTION,
};
use crate::store::{CollectionQuery, Document, DocumentStore, DocumentWrite, StoreError};
use subscription::ActiveGuard;

#[derive(Clone)]
pub struct FeedStore {
    store: Arc<dyn DocumentStore>,
    session: SessionWatch,
    degraded: Arc<AtomicBool>,
    query: CollectionQuery,
}

impl FeedStore {
    pub fn new(store: Arc<dyn DocumentStore>, session: SessionWatch) -> Self {
        Self {
            store,
            session,
            degraded: Arc::new(AtomicBool::new(false)),
            query: CollectionQuery::newest_first(POSTS_COLLECTION, FIELD_CREATED_AT),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// Mark the feed as refused by the store's access rules
    pub fn mark_degraded(&self) {
        if !self.degraded.swap(true, Ordering::SeqCst) {
            warn!("feed degraded: store denied access");
        }
    }

    /// Clear the degraded flag so the next `subscribe` tries the store again
    pub fn reload(&self) {
        if self.degraded.swap(false, Ordering::SeqCst) {
            info!("feed reloaded");
        }
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.session.borrow().identity().cloned()
    }

    /// Open a live query over all posts, newest first
    pub fn subscribe<U, E>(&self, mut on_update: U, on_error: E) -> Subscription
    where
        U: FnMut(Vec<Post>) + Send + 'static,
        E: FnOnce(StoreError) + Send + 'static,
    {
        if self.is_degraded() {
            debug!("feed degraded, not subscribing");
            on_error(StoreError::PermissionDenied);
            return Subscription::inert();
        }

        let store = self.store.clone();
        let query = self.query.clone();
        let degraded = self.degraded.clone();

        let handle = tokio::spawn(async move {
            let _active = ActiveGuard::enter();

            let mut snapshots = match store.watch(&query).await {
                Ok(snapshots) => snapshots,
                Err(e) => {
                    if e.is_permission_denied() {
                        degraded.store(true, Ordering::SeqCst);
                    }
                    warn!(error = %e, "feed subscription failed to open");
                    on_error(e);
                    return;
                }
            };

            while let Some(item) = snapshots.next().await {
                match item {
                    Ok(documents) => {
                        let posts = to_posts(documents);
                        SNAPSHOTS_DELIVERED_TOTAL.inc();
                        debug!(count = posts.len(), "feed snapshot delivered");
                        on_update(posts);
                    }
                    Err(e) => {
                        if e.is_permission_denied() {
                            degraded.store(true, Ordering::SeqCst);
                        }
                        warn!(error = %e, "feed subscription ended with error");
                        on_error(e);
                        return;
                    }
                }
            }

            debug!("feed subscription ended");
        });

        Subscription::spawned(handle)
    }

    /// Write a new post authored by the current session
    pub async fn append(&self, title: &str, content: &str) -> Result<Uuid, StoreError> {
        let identity = self.current_identity();
        let result = match &identity {
            Some(author) => {
                let post = NewPost {
                    title: title.to_string(),
                    content: content.to_string(),
                    author_email: author.email.clone(),
                    author_uid: author.uid.clone(),
                };
                let write =
                    DocumentWrite::new(post.to_fields()).with_server_timestamp(FIELD_CREATED_AT);
                self.store
                    .add(identity.as_ref(), POSTS_COLLECTION, write)
                    .await
                    .map(|doc| doc.id)
            }
            None => Err(StoreError::PermissionDenied),
        };

        match &result {
            Ok(id) => {
                POST_WRITES_TOTAL.with_label_values(&["ok"]).inc();
                info!(post_id = %id, "post appended");
            }
            Err(e) => {
                POST_WRITES_TOTAL.with_label_values(&[e.kind()]).inc();
                warn!(error = %e, "post append failed");
            }
        }
        result
    }

    /// Delete a post; the store decides whether the caller is its author
    pub async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let identity = self.current_identity();
        let result = self
            .store
            .delete(identity.as_ref(), POSTS_COLLECTION, id)
            .await;

        match &result {
            Ok(()) => {
                POST_DELETES_TOTAL.with_label_values(&["ok"]).inc();
                info!(post_id = %id, "post removed");
            }
            Err(e) => {
                POST_DELETES_TOTAL.with_label_values(&[e.kind()]).inc();
                warn!(post_id = %id, error = %e, "post removal failed");
            }
        }
        result
    }
}

fn to_posts(documents: Vec<Document>) -> Vec<Post> {
    documents
        .into_iter()
        .filter_map(|doc| match Post::from_fields(doc.id, &doc.data) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!(id = %doc.id, error = %e, "skipping malformed post document");
                None
            }
        })
        .collect()
}
