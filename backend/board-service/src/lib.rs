/// Board Service Library
///
/// An authenticated content board: users sign in with email/password or a
/// federated provider, then read and write short rich-text posts with
/// inline images on a shared feed that updates live.
///
/// # Modules
///
/// - `identity`: Identity Gateway, identity providers and auth messages
/// - `store`: document store boundary with memory and PostgreSQL backends
/// - `feed`: Feed Store Adapter over the `posts` collection
/// - `board`: the mounted feed view and its state
/// - `composer`: draft title and rich-text buffer, image embedding, submit
/// - `shell`: session-driven screens, view model and page rendering
/// - `handlers`: HTTP endpoints
/// - `models`: identities, sessions and posts
/// - `i18n`: user-facing strings
/// - `error`: HTTP error mapping
/// - `config`: configuration management
/// - `metrics`: Prometheus collectors
pub mod board;
pub mod composer;
pub mod config;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod i18n;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod shell;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
