/// Composer handlers - editing and submitting the draft
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use rich_text::{FormatCommand, Position};
use serde::Deserialize;
use serde_json::json;

use crate::composer::ComposerError;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CaretRequest {
    pub position: Position,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub anchor: Position,
    pub focus: Position,
}

#[derive(Debug, Deserialize)]
pub struct FormatRequest {
    /// Command name such as `bold` or `insertOrderedList`
    pub command: String,
}

pub async fn set_title(
    state: web::Data<AppState>,
    req: web::Json<TitleRequest>,
) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell
        .workspace_mut()?
        .composer_mut()
        .set_title(req.into_inner().title);
    super::screen_response(&shell)
}

pub async fn insert_text(
    state: web::Data<AppState>,
    req: web::Json<TextRequest>,
) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell.workspace_mut()?.composer_mut().insert_text(&req.text);
    super::screen_response(&shell)
}

pub async fn set_caret(
    state: web::Data<AppState>,
    req: web::Json<CaretRequest>,
) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell
        .workspace_mut()?
        .composer_mut()
        .set_caret(req.position)?;
    super::screen_response(&shell)
}

pub async fn select(
    state: web::Data<AppState>,
    req: web::Json<SelectRequest>,
) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell
        .workspace_mut()?
        .composer_mut()
        .select(req.anchor, req.focus)?;
    super::screen_response(&shell)
}

pub async fn format(
    state: web::Data<AppState>,
    req: web::Json<FormatRequest>,
) -> Result<HttpResponse> {
    let command: FormatCommand = req
        .command
        .parse()
        .map_err(|e| AppError::from(ComposerError::Buffer(e)))?;

    let mut shell = state.shell.lock().await;
    shell.workspace_mut()?.composer_mut().format(command);
    super::screen_response(&shell)
}

/// Raw image bytes; the request's Content-Type names the image type
pub async fn insert_image(
    state: web::Data<AppState>,
    http: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let content_type = http
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing Content-Type".to_string()))?;

    let mut shell = state.shell.lock().await;
    shell
        .workspace_mut()?
        .composer_mut()
        .insert_image(content_type, &body)?;
    super::screen_response(&shell)
}

pub async fn backspace(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell.workspace_mut()?.composer_mut().delete_backward();
    super::screen_response(&shell)
}

pub async fn submit(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    let id = shell.workspace_mut()?.submit().await?;
    Ok(HttpResponse::Created().json(json!({
        "id": id,
        "screen": shell.screen(),
    })))
}
