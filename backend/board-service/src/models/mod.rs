/// Data models for board-service
///
/// - `Identity` / `SessionState`: who is signed in, as observed by the shell
/// - `Post`: a feed entry mapped from a store document
/// - `NewPost`: the fields a composer submits
mod identity;
mod post;

pub use identity::{Identity, SessionState, SignInMethod};
pub use post::{NewPost, Post, FIELD_AUTHOR_UID, FIELD_CREATED_AT, POSTS_COLLECTION};
