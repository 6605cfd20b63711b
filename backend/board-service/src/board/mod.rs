//! Board view: the mounted feed.
//!
//! A mounted [`BoardView`] owns exactly one feed [`Subscription`] and
//! publishes its [`BoardState`] on a `watch` channel. Every snapshot
//! replaces the post list wholesale.

mod state;

pub use state::BoardState;

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::feed::{FeedStore, Subscription};
use crate::i18n::Text;
use crate::models::Post;
use crate::store::StoreError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("only the author can delete this post")]
    NotAuthor,

    #[error("post not on the board: {0}")]
    UnknownPost(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct BoardView {
    feed: FeedStore,
    state: Arc<watch::Sender<BoardState>>,
    subscription: Option<Subscription>,
}

impl BoardView {
    /// Build a board and mount it immediately
    pub fn mount(feed: FeedStore) -> Self {
        let (state, _) = watch::channel(BoardState::default());
        let mut board = Self {
            feed,
            state: Arc::new(state),
            subscription: None,
        };
        board.subscribe();
        board
    }

    fn subscribe(&mut self) {
        self.state.send_modify(|state| {
            state.loading = true;
            state.degraded = false;
        });

        let on_update = {
            let state = self.state.clone();
            move |posts: Vec<Post>| {
                state.send_modify(|state| {
                    state.posts = posts;
                    state.loading = false;
                });
            }
        };
        let on_error = {
            let state = self.state.clone();
            move |err: StoreError| {
                state.send_modify(|state| {
                    state.loading = false;
                    if err.is_permission_denied() {
                        state.degraded = true;
                    }
                });
            }
        };

        self.subscription = Some(self.feed.subscribe(on_update, on_error));
        debug!("board mounted");
    }

    /// Cancel the live query; the last state stays readable
    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            debug!("board unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Leave the degraded state and resubscribe
    pub fn reload(&mut self) {
        self.unmount();
        self.feed.reload();
        self.subscribe();
        info!("board reloaded");
    }

    pub fn state(&self) -> BoardState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<BoardState> {
        self.state.subscribe()
    }

    pub fn feed(&self) -> &FeedStore {
        &self.feed
    }

    /// Delete is offered only on the current identity's own posts
    pub fn can_delete(&self, post: &Post) -> bool {
        self.feed
            .current_identity()
            .map(|identity| post.is_authored_by(&identity.uid))
            .unwrap_or(false)
    }

    /// Delete a post shown on the board.
    ///
    /// Non-authors are refused before the store is contacted. The post
    /// list changes only when the next snapshot arrives.
    pub async fn delete(&self, id: Uuid) -> Result<(), BoardError> {
        let post = self
            .state
            .borrow()
            .find(id)
            .cloned()
            .ok_or(BoardError::UnknownPost(id))?;
        if !self.can_delete(&post) {
            return Err(BoardError::NotAuthor);
        }

        self.dismiss_alert();
        if let Err(e) = self.feed.remove(id).await {
            self.set_alert(Text::DeleteFailed);
            return Err(e.into());
        }
        Ok(())
    }

    /// Switch to the access-rules notice after the store refused a write
    pub fn degrade(&self) {
        self.feed.mark_degraded();
        self.state.send_modify(|state| {
            state.degraded = true;
            state.loading = false;
        });
    }

    pub fn set_alert(&self, text: Text) {
        self.state.send_modify(|state| state.alert = Some(text));
    }

    pub fn dismiss_alert(&self) {
        self.state.send_if_modified(|state| state.alert.take().is_some());
    }
}

impl Drop for BoardView {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Identity, SessionState, SignInMethod};
    use crate::store::{AccessRules, MemoryDocumentStore};
    use std::time::Duration;

    fn session(uid: &str) -> (watch::Sender<SessionState>, crate::identity::SessionWatch) {
        watch::channel(SessionState::SignedIn(Identity {
            uid: uid.to_string(),
            email: Some(format!("{}@example.com", uid)),
            method: SignInMethod::Password,
        }))
    }

    async fn settle<F>(board: &BoardView, done: F) -> BoardState
    where
        F: Fn(&BoardState) -> bool,
    {
        let mut rx = board.watch();
        let state = tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| done(s)))
            .await
            .expect("board never settled")
            .expect("board dropped")
            .clone();
        state
    }

    #[tokio::test]
    async fn test_mount_starts_loading_then_shows_empty() {
        let (_tx, watch) = session("alice");
        let feed = FeedStore::new(Arc::new(MemoryDocumentStore::default()), watch);
        let board = BoardView::mount(feed);
        assert!(board.state().loading || board.state().is_empty());

        let state = settle(&board, |s| !s.loading).await;
        assert!(state.is_empty());
        assert!(board.is_mounted());
    }

    #[tokio::test]
    async fn test_read_permission_failure_degrades_board() {
        let (_tx, watch) = session("alice");
        let store = Arc::new(MemoryDocumentStore::new(AccessRules::locked()));
        let board = BoardView::mount(FeedStore::new(store, watch));

        let state = settle(&board, |s| !s.loading).await;
        assert!(state.degraded);
        assert!(state.posts.is_empty());
    }

    #[tokio::test]
    async fn test_reload_recovers_after_rules_fixed() {
        let (_tx, watch) = session("alice");
        let store = Arc::new(MemoryDocumentStore::new(AccessRules::locked()));
        let mut board = BoardView::mount(FeedStore::new(store.clone(), watch));
        settle(&board, |s| s.degraded).await;

        store.set_rules(AccessRules::recommended()).await;
        board.reload();
        let state = settle(&board, |s| !s.loading).await;
        assert!(!state.degraded);
    }

    #[tokio::test]
    async fn test_delete_refused_for_unknown_post() {
        let (_tx, watch) = session("alice");
        let board = BoardView::mount(FeedStore::new(
            Arc::new(MemoryDocumentStore::default()),
            watch,
        ));
        settle(&board, |s| !s.loading).await;

        let id = Uuid::new_v4();
        assert_eq!(board.delete(id).await, Err(BoardError::UnknownPost(id)));
    }

    #[tokio::test]
    async fn test_degrade_and_alerts() {
        let (_tx, watch) = session("alice");
        let board = BoardView::mount(FeedStore::new(
            Arc::new(MemoryDocumentStore::default()),
            watch,
        ));
        settle(&board, |s| !s.loading).await;

        board.set_alert(Text::SaveFailed);
        assert_eq!(board.state().alert, Some(Text::SaveFailed));
        board.dismiss_alert();
        assert_eq!(board.state().alert, None);

        board.degrade();
        assert!(board.state().degraded);
        assert!(board.feed().is_degraded());
    }
}
