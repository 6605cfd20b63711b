use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Collection holding board posts
pub const POSTS_COLLECTION: &str = "posts";

/// Document field carrying the server-assigned creation time
pub const FIELD_CREATED_AT: &str = "createdAt";

/// Document field naming the author, checked by delete rules
pub const FIELD_AUTHOR_UID: &str = "authorUid";

/// Feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// Serialized HTML fragment, may embed data-URL images
    pub content: String,
    pub author_email: Option<String>,
    pub author_uid: String,
    /// Unset until the store commits the write
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostFields {
    title: String,
    content: String,
    #[serde(default)]
    author_email: Option<String>,
    author_uid: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Map a raw document body to a typed post
    pub fn from_fields(id: Uuid, data: &Value) -> Result<Self, serde_json::Error> {
        let fields = PostFields::deserialize(data)?;
        Ok(Self {
            id,
            title: fields.title,
            content: fields.content,
            author_email: fields.author_email,
            author_uid: fields.author_uid,
            created_at: fields.created_at,
        })
    }

    pub fn is_authored_by(&self, uid: &str) -> bool {
        self.author_uid == uid
    }
}

/// Fields submitted by the composer; the store adds `createdAt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_email: Option<String>,
    pub author_uid: String,
}

impl NewPost {
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".into(), Value::String(self.title.clone()));
        fields.insert("content".into(), Value::String(self.content.clone()));
        fields.insert(
            "authorEmail".into(),
            self.author_email
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        fields.insert(FIELD_AUTHOR_UID.into(), Value::String(self.author_uid.clone()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_fields_with_pending_timestamp() {
        let id = Uuid::new_v4();
        let post = Post::from_fields(
            id,
            &json!({
                "title": "Hello",
                "content": "<p>World</p>",
                "authorEmail": "a@example.com",
                "authorUid": "uid-a",
                "createdAt": null
            }),
        )
        .unwrap();

        assert_eq!(post.id, id);
        assert_eq!(post.title, "Hello");
        assert!(post.created_at.is_none());
        assert!(post.is_authored_by("uid-a"));
    }

    #[test]
    fn test_from_fields_parses_timestamp() {
        let post = Post::from_fields(
            Uuid::new_v4(),
            &json!({
                "title": "t",
                "content": "c",
                "authorUid": "u",
                "createdAt": "2024-05-01T10:00:00Z"
            }),
        )
        .unwrap();

        assert_eq!(
            post.created_at.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
        assert!(post.author_email.is_none());
    }

    #[test]
    fn test_from_fields_rejects_missing_author() {
        let result = Post::from_fields(Uuid::new_v4(), &json!({"title": "t", "content": "c"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_post_fields_are_camel_case() {
        let fields = NewPost {
            title: "Hello".into(),
            content: "<p>World</p>".into(),
            author_email: Some("a@example.com".into()),
            author_uid: "uid-a".into(),
        }
        .to_fields();

        assert_eq!(fields["authorUid"], json!("uid-a"));
        assert_eq!(fields["authorEmail"], json!("a@example.com"));
        assert!(!fields.contains_key("createdAt"));
    }
}
