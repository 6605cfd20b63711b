/// Feed handlers - deletes, reload and live events
use actix_web::{web, HttpResponse};
use futures::stream;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::board::BoardState;
use crate::error::{AppError, Result};
use crate::i18n::Locale;
use crate::shell::FeedView;
use crate::state::AppState;

pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let shell = state.shell.lock().await;
    shell.workspace()?.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn reload(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell.workspace_mut()?.board_mut().reload();
    super::screen_response(&shell)
}

struct EventSource {
    board: watch::Receiver<BoardState>,
    viewer_uid: String,
    locale: Locale,
    rules: String,
}

impl EventSource {
    fn frame(&mut self) -> std::result::Result<web::Bytes, AppError> {
        let state = self.board.borrow_and_update().clone();
        let view = FeedView::new(&state, Some(self.viewer_uid.as_str()), self.locale, &self.rules);
        let payload = serde_json::to_string(&view)?;
        Ok(web::Bytes::from(format!("data: {}\n\n", payload)))
    }
}

/// Server-Sent Events: the feed view after every board change. The page
/// already shows the current state, so nothing is sent on connect. The
/// stream ends when the workspace is torn down.
pub async fn events(state: web::Data<AppState>) -> Result<HttpResponse> {
    let source = {
        let shell = state.shell.lock().await;
        let workspace = shell.workspace()?;
        EventSource {
            board: workspace.board().watch(),
            viewer_uid: workspace.identity().uid.clone(),
            locale: state.locale,
            rules: shell.settings().rules_hint.clone(),
        }
    };
    debug!(uid = %source.viewer_uid, "feed event stream opened");

    let frames = stream::unfold(source, |mut source| async move {
        source.board.changed().await.ok()?;
        let frame = source.frame();
        Some((frame, source))
    });

    Ok(HttpResponse::Ok()
        .content_type(mime::TEXT_EVENT_STREAM)
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(frames))
}
