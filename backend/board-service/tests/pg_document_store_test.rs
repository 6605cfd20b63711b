//! PostgreSQL document store against a real database.
//!
//! Coverage:
//! - Live query pushes a snapshot on every committed change (LISTEN/NOTIFY)
//! - Newest-first ordering by the server timestamp
//! - Author-only delete inside the row-locking transaction
//! - Document size limit
//! - Locking the rules ends live queries with a permission error
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use board_service::models::{Identity, NewPost, SignInMethod, FIELD_CREATED_AT};
use board_service::store::{
    AccessRules, CollectionQuery, Document, DocumentStore, DocumentWrite, PgDocumentStore,
    SnapshotStream, StoreError, DEFAULT_MAX_DOCUMENT_BYTES,
};
use futures::StreamExt;
use std::time::Duration;
use uuid::Uuid;

async fn connect(max_document_bytes: usize) -> PgDocumentStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgDocumentStore::connect(&url, 5, AccessRules::recommended(), max_document_bytes)
        .await
        .expect("Failed to connect document store")
}

/// A collection no other test run touches
fn scratch_collection() -> String {
    format!("posts_{}", Uuid::new_v4().simple())
}

fn identity(uid: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        email: Some(format!("{}@example.com", uid)),
        method: SignInMethod::Password,
    }
}

fn post(title: &str, author: &Identity) -> DocumentWrite {
    let fields = NewPost {
        title: title.to_string(),
        content: format!("<p>{}</p>", title),
        author_email: author.email.clone(),
        author_uid: author.uid.clone(),
    }
    .to_fields();
    DocumentWrite::new(fields).with_server_timestamp(FIELD_CREATED_AT)
}

async fn next(snapshots: &mut SnapshotStream) -> Option<Result<Vec<Document>, StoreError>> {
    tokio::time::timeout(Duration::from_secs(5), snapshots.next())
        .await
        .expect("no snapshot within 5s")
}

fn titles(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|doc| doc.data["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_live_query_delete_and_locked_rules() {
    let store = connect(DEFAULT_MAX_DOCUMENT_BYTES).await;
    let collection = scratch_collection();
    let query = CollectionQuery::newest_first(&collection, FIELD_CREATED_AT);
    let alice = identity("alice");
    let bob = identity("bob");

    let mut snapshots = store.watch(&query).await.expect("watch failed");
    assert!(next(&mut snapshots).await.unwrap().unwrap().is_empty());

    let first = store
        .add(Some(&alice), &collection, post("first", &alice))
        .await
        .expect("insert failed");
    assert!(first.data[FIELD_CREATED_AT].is_string());
    assert_eq!(titles(&next(&mut snapshots).await.unwrap().unwrap()), ["first"]);

    store
        .add(Some(&alice), &collection, post("second", &alice))
        .await
        .expect("insert failed");
    assert_eq!(
        titles(&next(&mut snapshots).await.unwrap().unwrap()),
        ["second", "first"]
    );

    // Anonymous writes are refused before reaching the table
    assert_eq!(
        store.add(None, &collection, post("anon", &alice)).await,
        Err(StoreError::PermissionDenied)
    );

    assert_eq!(
        store.delete(Some(&bob), &collection, first.id).await,
        Err(StoreError::PermissionDenied)
    );
    assert_eq!(
        store.delete(None, &collection, first.id).await,
        Err(StoreError::PermissionDenied)
    );
    let missing = Uuid::new_v4();
    assert_eq!(
        store.delete(Some(&alice), &collection, missing).await,
        Err(StoreError::NotFound(missing))
    );

    store
        .delete(Some(&alice), &collection, first.id)
        .await
        .expect("author delete failed");
    assert_eq!(titles(&next(&mut snapshots).await.unwrap().unwrap()), ["second"]);

    store.set_rules(AccessRules::locked()).await;
    assert_eq!(
        next(&mut snapshots).await.unwrap(),
        Err(StoreError::PermissionDenied)
    );
    assert!(next(&mut snapshots).await.is_none());

    // New queries are refused from the first snapshot
    let mut locked = store.watch(&query).await.expect("watch failed");
    assert_eq!(
        next(&mut locked).await.unwrap(),
        Err(StoreError::PermissionDenied)
    );
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_document_size_limit() {
    let store = connect(256).await;
    let collection = scratch_collection();
    let alice = identity("alice");

    let mut big = post("big", &alice);
    big.fields
        .insert("content".into(), serde_json::Value::String("x".repeat(1024)));

    match store.add(Some(&alice), &collection, big).await {
        Err(StoreError::PayloadTooLarge { size, limit }) => {
            assert!(size > 1024);
            assert_eq!(limit, 256);
        }
        other => panic!("expected PayloadTooLarge, got {:?}", other),
    }

    let query = CollectionQuery::newest_first(&collection, FIELD_CREATED_AT);
    let mut snapshots = store.watch(&query).await.expect("watch failed");
    assert!(next(&mut snapshots).await.unwrap().unwrap().is_empty());
}
