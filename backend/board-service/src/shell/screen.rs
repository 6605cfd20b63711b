//! Serializable view model of the current screen.

use chrono::{DateTime, Utc};
use rich_text::{Marks, Selection};
use serde::Serialize;
use uuid::Uuid;

use super::form::FormMode;
use crate::board::BoardState;
use crate::i18n::{Locale, Text};
use crate::models::{Identity, Post};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Anonymous(FormView),
    Authenticated(WorkspaceView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub mode: FormMode,
    pub email: String,
    pub error: Option<String>,
    pub federated_provider: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub uid: String,
    pub email: Option<String>,
    pub initial: char,
}

impl From<&Identity> for UserSummary {
    fn from(identity: &Identity) -> Self {
        Self {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            initial: identity.initial(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposerView {
    pub title: String,
    pub content_html: String,
    pub selection: Selection,
    pub active_marks: Marks,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Loading,
    Empty,
    Ready,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedView {
    pub status: FeedStatus,
    pub posts: Vec<PostCard>,
    pub alert: Option<String>,
    /// Recommended rule text, present only while degraded
    pub rules: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub id: Uuid,
    pub title: String,
    /// Stored HTML, rendered unescaped
    pub content_html: String,
    pub author_name: String,
    pub author_initial: char,
    pub date_label: String,
    pub can_delete: bool,
}

impl PostCard {
    pub fn new(post: &Post, viewer_uid: Option<&str>, locale: Locale) -> Self {
        let email = post.author_email.as_deref().unwrap_or_default();
        let author_name = email.split('@').next().unwrap_or_default().to_string();
        let author_initial = email
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U');

        Self {
            id: post.id,
            title: post.title.clone(),
            content_html: post.content.clone(),
            author_name,
            author_initial,
            date_label: date_label(post.created_at, locale),
            can_delete: viewer_uid.map(|uid| post.is_authored_by(uid)).unwrap_or(false),
        }
    }
}

fn date_label(created_at: Option<DateTime<Utc>>, locale: Locale) -> String {
    match created_at {
        Some(at) => at.format("%Y-%m-%d").to_string(),
        None => Text::JustNow.in_locale(locale).to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceView {
    pub user: UserSummary,
    pub composer: ComposerView,
    pub feed: FeedView,
}

impl FeedView {
    pub fn new(
        state: &BoardState,
        viewer_uid: Option<&str>,
        locale: Locale,
        rules: &str,
    ) -> Self {
        let status = if state.degraded {
            FeedStatus::Degraded
        } else if state.loading {
            FeedStatus::Loading
        } else if state.posts.is_empty() {
            FeedStatus::Empty
        } else {
            FeedStatus::Ready
        };

        // The notice replaces the feed entirely
        let posts = if state.degraded {
            Vec::new()
        } else {
            state
                .posts
                .iter()
                .map(|post| PostCard::new(post, viewer_uid, locale))
                .collect()
        };

        Self {
            status,
            posts,
            alert: state.alert.map(|text| text.in_locale(locale).to_string()),
            rules: state.degraded.then(|| rules.to_string()),
        }
    }
}
