use serde::Serialize;

use crate::i18n::Text;
use crate::models::Post;

/// What the mounted feed currently shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardState {
    /// True until the first snapshot or error arrives
    pub loading: bool,
    pub posts: Vec<Post>,
    /// Store refused access; the feed shows the access-rules notice
    pub degraded: bool,
    /// Transient failure message, cleared by the next user action
    pub alert: Option<Text>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            loading: true,
            posts: Vec::new(),
            degraded: false,
            alert: None,
        }
    }
}

impl BoardState {
    pub fn is_empty(&self) -> bool {
        !self.loading && !self.degraded && self.posts.is_empty()
    }

    pub fn find(&self, id: uuid::Uuid) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }
}
