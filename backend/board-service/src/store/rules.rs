//! Declarative access rules evaluated by the store on every request.

use serde_json::Value;
use std::str::FromStr;

use crate::models::{Identity, FIELD_AUTHOR_UID, POSTS_COLLECTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRule {
    Public,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateRule {
    Authenticated,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteRule {
    /// The caller's uid must equal the named document field
    AuthorOnly { field: String },
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRules {
    pub read: ReadRule,
    pub create: CreateRule,
    pub delete: DeleteRule,
}

impl AccessRules {
    /// Public read, authenticated create, author-only delete
    pub fn recommended() -> Self {
        Self {
            read: ReadRule::Public,
            create: CreateRule::Authenticated,
            delete: DeleteRule::AuthorOnly {
                field: FIELD_AUTHOR_UID.to_string(),
            },
        }
    }

    /// Deny everything, as a freshly provisioned store does
    pub fn locked() -> Self {
        Self {
            read: ReadRule::Denied,
            create: CreateRule::Denied,
            delete: DeleteRule::Denied,
        }
    }

    pub fn can_read(&self) -> bool {
        self.read == ReadRule::Public
    }

    pub fn can_create(&self, auth: Option<&Identity>) -> bool {
        match self.create {
            CreateRule::Authenticated => auth.is_some(),
            CreateRule::Denied => false,
        }
    }

    pub fn can_delete(&self, auth: Option<&Identity>, data: &Value) -> bool {
        match (&self.delete, auth) {
            (DeleteRule::AuthorOnly { field }, Some(identity)) => {
                data.get(field).and_then(Value::as_str) == Some(identity.uid.as_str())
            }
            _ => false,
        }
    }

    /// Rule text shown to operators when the feed is degraded
    pub fn describe(&self) -> String {
        let read = match self.read {
            ReadRule::Public => "true",
            ReadRule::Denied => "false",
        };
        let create = match self.create {
            CreateRule::Authenticated => "request.auth != null".to_string(),
            CreateRule::Denied => "false".to_string(),
        };
        let delete = match &self.delete {
            DeleteRule::AuthorOnly { field } => format!(
                "request.auth != null\n                    && request.auth.uid == resource.data.{}",
                field
            ),
            DeleteRule::Denied => "false".to_string(),
        };

        format!(
            "match /{collection}/{{post}} {{\n  allow read: if {read};\n  allow create: if {create};\n  allow delete: if {delete};\n}}",
            collection = POSTS_COLLECTION,
            read = read,
            create = create,
            delete = delete,
        )
    }
}

impl Default for AccessRules {
    fn default() -> Self {
        Self::recommended()
    }
}

impl FromStr for AccessRules {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::recommended()),
            "locked" => Ok(Self::locked()),
            other => Err(format!("unknown access rule set: {}", other)),
        }
    }
}
