/// Page handlers - the rendered screen
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::shell::html::render_page;
use crate::state::AppState;

pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let screen = state.shell.lock().await.screen();
    HttpResponse::Ok()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(render_page(&screen, state.locale))
}

pub async fn screen(state: web::Data<AppState>) -> Result<HttpResponse> {
    let shell = state.shell.lock().await;
    super::screen_response(&shell)
}
