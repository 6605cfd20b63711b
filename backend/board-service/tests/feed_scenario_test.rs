use board_service::board::{BoardError, BoardState, BoardView};
use board_service::composer::Composer;
use board_service::feed::FeedStore;
use board_service::identity::{IdentityGateway, MemoryIdentityProvider, StaticFederatedAuthority};
use board_service::store::{AccessRules, DocumentStore, MemoryDocumentStore};
use std::sync::Arc;
use std::time::Duration;

async fn signed_in_gateway(email: &str) -> Arc<IdentityGateway> {
    let provider = MemoryIdentityProvider::new(Arc::new(StaticFederatedAuthority::disabled()));
    let gateway = Arc::new(IdentityGateway::new(Arc::new(provider)));
    gateway.bootstrap().await;
    gateway.sign_up(email, "secret1").await.unwrap();
    gateway
}

async fn wait_for<F>(board: &BoardView, pred: F) -> BoardState
where
    F: Fn(&BoardState) -> bool,
{
    let mut rx = board.watch();
    let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| pred(s)))
        .await
        .expect("board state never matched")
        .expect("board dropped")
        .clone();
    state
}

#[tokio::test]
async fn test_append_then_delete_round_trip() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());
    let gateway = signed_in_gateway("alice@example.com").await;
    let board = BoardView::mount(FeedStore::new(store, gateway.session_watch()));

    let state = wait_for(&board, |s| !s.loading).await;
    assert!(state.is_empty());

    let mut composer = Composer::default();
    composer.set_title("Hello");
    composer.insert_text("World");
    let id = composer.submit(board.feed()).await.unwrap();
    assert_eq!(composer.title(), "");
    assert!(composer.buffer().is_blank());

    let state = wait_for(&board, |s| s.posts.len() == 1).await;
    let post = &state.posts[0];
    assert_eq!(post.id, id);
    assert!(!post.id.is_nil());
    assert_eq!(post.title, "Hello");
    assert_eq!(post.content, "<p>World</p>");
    assert_eq!(post.author_email.as_deref(), Some("alice@example.com"));
    assert!(board.can_delete(post));

    board.delete(id).await.unwrap();
    let state = wait_for(&board, |s| s.posts.is_empty()).await;
    assert!(state.is_empty());
}

#[tokio::test]
async fn test_each_snapshot_replaces_the_previous_one() {
    let store = Arc::new(MemoryDocumentStore::default());
    let gateway = signed_in_gateway("alice@example.com").await;
    let feed = FeedStore::new(store.clone(), gateway.session_watch());
    let board = BoardView::mount(feed.clone());
    wait_for(&board, |s| !s.loading).await;

    let first = feed.append("first", "<p>1</p>").await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    let second = feed.append("second", "<p>2</p>").await.unwrap();
    let state = wait_for(&board, |s| s.posts.len() == 2).await;
    let ids: Vec<_> = state.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second, first]);

    feed.remove(second).await.unwrap();
    let state = wait_for(&board, |s| s.posts.len() == 1).await;
    let ids: Vec<_> = state.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first]);
}

#[tokio::test]
async fn test_non_author_delete_is_refused_locally() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());
    let alice = signed_in_gateway("alice@example.com").await;
    let bob = signed_in_gateway("bob@example.com").await;

    let alice_feed = FeedStore::new(store.clone(), alice.session_watch());
    let id = alice_feed.append("mine", "<p>alice</p>").await.unwrap();

    let bob_board = BoardView::mount(FeedStore::new(store, bob.session_watch()));
    let before = wait_for(&bob_board, |s| s.posts.len() == 1).await;
    assert!(!bob_board.can_delete(&before.posts[0]));

    assert_eq!(bob_board.delete(id).await, Err(BoardError::NotAuthor));
    assert_eq!(bob_board.state(), before);
}

#[tokio::test]
async fn test_permission_denied_degrades_until_reload() {
    let store = Arc::new(MemoryDocumentStore::default());
    let gateway = signed_in_gateway("alice@example.com").await;
    let mut board = BoardView::mount(FeedStore::new(store.clone(), gateway.session_watch()));
    wait_for(&board, |s| !s.loading).await;

    store.set_rules(AccessRules::locked()).await;
    let state = wait_for(&board, |s| s.degraded).await;
    assert!(board.feed().is_degraded());

    // Writes that succeed elsewhere are not delivered while degraded
    store.set_rules(AccessRules::recommended()).await;
    let other = signed_in_gateway("bob@example.com").await;
    FeedStore::new(store.clone(), other.session_watch())
        .append("unseen", "<p>x</p>")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(board.state(), state);

    board.reload();
    let state = wait_for(&board, |s| !s.loading && !s.degraded).await;
    assert_eq!(state.posts.len(), 1);
}
