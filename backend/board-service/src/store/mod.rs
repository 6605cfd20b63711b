//! Document store boundary.
//!
//! A store holds named collections of JSON documents and pushes a
//! complete, ordered snapshot of a collection whenever it changes. Access
//! is decided by [`AccessRules`] inside the store, so every backend sees
//! the caller's identity on writes.

mod error;
mod memory;
mod postgres;
mod rules;

pub use error::StoreError;
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use rules::{AccessRules, CreateRule, DeleteRule, ReadRule};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::stream::BoxStream;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::models::Identity;

/// Firestore-compatible single document limit
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1_048_576;

/// Live query results; each item is the full ordered collection
pub type SnapshotStream = BoxStream<'static, Result<Vec<Document>, StoreError>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub data: Value,
}

/// Fields to write plus an optional field the store stamps at commit
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub fields: Map<String, Value>,
    pub server_timestamp: Option<String>,
}

impl DocumentWrite {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            server_timestamp: None,
        }
    }

    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamp = Some(field.into());
        self
    }

    /// Resolve the timestamp placeholder into a committed document body
    pub fn commit(self, now: DateTime<Utc>) -> Value {
        let mut fields = self.fields;
        if let Some(field) = self.server_timestamp {
            fields.insert(
                field,
                Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
        Value::Object(fields)
    }
}

/// "All documents of a collection, ordered by one field"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub collection: String,
    pub order_by: String,
    pub descending: bool,
}

impl CollectionQuery {
    pub fn newest_first(collection: impl Into<String>, order_by: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            order_by: order_by.into(),
            descending: true,
        }
    }

    /// Sort a snapshot in place; missing fields sort lowest
    pub fn sort(&self, documents: &mut [Document]) {
        documents.sort_by(|a, b| {
            let ord = compare_values(a.data.get(&self.order_by), b.data.get(&self.order_by));
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Serialized size of a committed document body
pub fn encoded_size(data: &Value) -> usize {
    serde_json::to_vec(data).map(|bytes| bytes.len()).unwrap_or(usize::MAX)
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a live query. The first item is the current state.
    async fn watch(&self, query: &CollectionQuery) -> Result<SnapshotStream, StoreError>;

    async fn add(
        &self,
        auth: Option<&Identity>,
        collection: &str,
        write: DocumentWrite,
    ) -> Result<Document, StoreError>;

    async fn delete(
        &self,
        auth: Option<&Identity>,
        collection: &str,
        id: Uuid,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn doc(created_at: Value) -> Document {
        Document {
            id: Uuid::new_v4(),
            data: json!({ "createdAt": created_at }),
        }
    }

    #[test]
    fn test_commit_stamps_server_timestamp() {
        let mut fields = Map::new();
        fields.insert("title".into(), json!("Hello"));
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        let data = DocumentWrite::new(fields)
            .with_server_timestamp("createdAt")
            .commit(now);

        assert_eq!(data["title"], json!("Hello"));
        assert_eq!(data["createdAt"], json!("2024-05-01T10:00:00.000000Z"));
    }

    #[test]
    fn test_sort_newest_first() {
        let query = CollectionQuery::newest_first("posts", "createdAt");
        let mut docs = vec![
            doc(json!("2024-05-01T10:00:00.000000Z")),
            doc(Value::Null),
            doc(json!("2024-05-03T10:00:00.000000Z")),
            doc(json!("2024-05-02T10:00:00.000000Z")),
        ];
        query.sort(&mut docs);

        let order: Vec<_> = docs.iter().map(|d| d.data["createdAt"].clone()).collect();
        assert_eq!(
            order,
            vec![
                json!("2024-05-03T10:00:00.000000Z"),
                json!("2024-05-02T10:00:00.000000Z"),
                json!("2024-05-01T10:00:00.000000Z"),
                Value::Null,
            ]
        );
    }

    #[test]
    fn test_encoded_size_counts_json_bytes() {
        assert_eq!(encoded_size(&json!({"a": "bc"})), r#"{"a":"bc"}"#.len());
    }
}
