/// Auth handlers - credential form actions
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::shell::FormMode;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    /// Omitted toggles the current mode
    pub mode: Option<FormMode>,
}

async fn submit_as(
    state: &AppState,
    mode: FormMode,
    req: CredentialsRequest,
) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell.form_mut()?.set_mode(mode);
    shell
        .submit_credentials(&req.email, &req.password)
        .await
        .map_err(AppError::from)?;
    super::screen_response(&shell)
}

pub async fn sign_in(
    state: web::Data<AppState>,
    req: web::Json<CredentialsRequest>,
) -> Result<HttpResponse> {
    submit_as(&state, FormMode::SignIn, req.into_inner()).await
}

pub async fn sign_up(
    state: web::Data<AppState>,
    req: web::Json<CredentialsRequest>,
) -> Result<HttpResponse> {
    submit_as(&state, FormMode::SignUp, req.into_inner()).await
}

pub async fn federated(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell.sign_in_federated().await?;
    super::screen_response(&shell)
}

pub async fn sign_out(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    shell.sign_out().await;
    super::screen_response(&shell)
}

pub async fn set_mode(
    state: web::Data<AppState>,
    req: web::Json<ModeRequest>,
) -> Result<HttpResponse> {
    let mut shell = state.shell.lock().await;
    let form = shell.form_mut()?;
    match req.mode {
        Some(mode) => form.set_mode(mode),
        None => form.toggle_mode(),
    }
    super::screen_response(&shell)
}
