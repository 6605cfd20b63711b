//! PostgreSQL document store.
//!
//! Documents are JSONB rows in a single `documents` table. A trigger calls
//! `pg_notify` with the collection name on every change and live queries
//! reload the collection when their channel fires.

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use sqlx::postgres::{PgListener, PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    encoded_size, AccessRules, CollectionQuery, Document, DocumentStore, DocumentWrite,
    SnapshotStream, StoreError,
};
use crate::models::Identity;

/// Channel the change trigger notifies on
pub const CHANGE_CHANNEL: &str = "documents_changed";

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    rules: Arc<RwLock<AccessRules>>,
    max_document_bytes: usize,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, rules: AccessRules, max_document_bytes: usize) -> Self {
        Self {
            pool,
            rules: Arc::new(RwLock::new(rules)),
            max_document_bytes,
        }
    }

    /// Connect, run migrations and build the store
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        rules: AccessRules,
        max_document_bytes: usize,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("migration failed: {}", e)))?;

        info!(max_connections, "document store connected");
        Ok(Self::new(pool, rules, max_document_bytes))
    }

    pub async fn set_rules(&self, rules: AccessRules) {
        *self.rules.write().await = rules;
        // Wake live queries so they re-check read access
        if let Err(e) = sqlx::query("SELECT pg_notify($1, '*')")
            .bind(CHANGE_CHANNEL)
            .execute(&self.pool)
            .await
        {
            warn!(error = %e, "failed to broadcast rule change");
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn load_snapshot(
    pool: &PgPool,
    rules: &RwLock<AccessRules>,
    query: &CollectionQuery,
) -> Result<Vec<Document>, StoreError> {
    if !rules.read().await.can_read() {
        return Err(StoreError::PermissionDenied);
    }

    let rows = sqlx::query_as::<_, (Uuid, Value)>(
        "SELECT id, data FROM documents WHERE collection = $1",
    )
    .bind(&query.collection)
    .fetch_all(pool)
    .await?;

    let mut documents: Vec<Document> = rows
        .into_iter()
        .map(|(id, data)| Document { id, data })
        .collect();
    query.sort(&mut documents);
    Ok(documents)
}

struct WatchState {
    pool: PgPool,
    rules: Arc<RwLock<AccessRules>>,
    query: CollectionQuery,
    listener: PgListener,
    primed: bool,
    finished: bool,
}

impl WatchState {
    /// Wait for a notification that concerns this query's collection
    async fn wait_for_change(&mut self) -> Result<(), StoreError> {
        loop {
            let notification = self.listener.recv().await?;
            let payload = notification.payload();
            if payload == self.query.collection || payload == "*" {
                return Ok(());
            }
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn watch(&self, query: &CollectionQuery) -> Result<SnapshotStream, StoreError> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;

        let state = WatchState {
            pool: self.pool.clone(),
            rules: self.rules.clone(),
            query: query.clone(),
            listener,
            primed: false,
            finished: false,
        };

        let snapshots = stream::unfold(state, |mut state| async move {
            if state.finished {
                return None;
            }
            if state.primed {
                if let Err(e) = state.wait_for_change().await {
                    state.finished = true;
                    return Some((Err(e), state));
                }
            } else {
                state.primed = true;
            }

            let snapshot = load_snapshot(&state.pool, &state.rules, &state.query).await;
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
        if !self.rules.read().await.can_create(auth) {
            return Err(StoreError::PermissionDenied);
        }

        let data = write.commit(Utc::now());
        let size = encoded_size(&data);
        if size > self.max_document_bytes {
            return Err(StoreError::PayloadTooLarge {
                size,
                limit: self.max_document_bytes,
            });
        }

        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO documents (id, collection, data) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| match StoreError::from(e) {
                StoreError::PayloadTooLarge { .. } => StoreError::PayloadTooLarge {
                    size,
                    limit: self.max_document_bytes,
                },
                other => other,
            })?;

        debug!(collection, %id, size, "document inserted");
        Ok(Document { id, data })
    }

    async fn delete(
        &self,
        auth: Option<&Identity>,
        collection: &str,
        id: Uuid,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, (Value,)>(
            "SELECT data FROM documents WHERE id = $1 AND collection = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(collection)
        .fetch_optional(&mut *tx)
        .await?;

        let (data,) = row.ok_or(StoreError::NotFound(id))?;
        if !self.rules.read().await.can_delete(auth, &data) {
            return Err(StoreError::PermissionDenied);
        }

        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(collection, %id, "document deleted");
        Ok(())
    }
}
