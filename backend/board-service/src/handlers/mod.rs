/// HTTP handlers for the board
///
/// - `page`: server-rendered page and screen JSON
/// - `auth`: credential, federated and sign-out actions
/// - `composer`: editing and submitting the draft post
/// - `feed`: deletes, reload and the live event stream
/// - `health`: liveness probe
pub mod auth;
pub mod composer;
pub mod feed;
pub mod health;
pub mod page;

use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::metrics::serve_metrics;
use crate::shell::Shell;

/// Respond with the screen after an action
pub(crate) fn screen_response(shell: &Shell) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(shell.screen()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(page::index))
        .route("/health", web::get().to(health::health))
        .route("/metrics", web::get().to(serve_metrics))
        .service(
            web::scope("/api")
                .route("/screen", web::get().to(page::screen))
                .service(
                    web::scope("/auth")
                        .route("/sign-in", web::post().to(auth::sign_in))
                        .route("/sign-up", web::post().to(auth::sign_up))
                        .route("/federated", web::post().to(auth::federated))
                        .route("/sign-out", web::post().to(auth::sign_out))
                        .route("/mode", web::post().to(auth::set_mode)),
                )
                .service(
                    web::scope("/composer")
                        .route("/title", web::post().to(composer::set_title))
                        .route("/text", web::post().to(composer::insert_text))
                        .route("/caret", web::post().to(composer::set_caret))
                        .route("/select", web::post().to(composer::select))
                        .route("/format", web::post().to(composer::format))
                        .route("/image", web::post().to(composer::insert_image))
                        .route("/backspace", web::post().to(composer::backspace))
                        .route("/submit", web::post().to(composer::submit)),
                )
                .route("/posts/{id}", web::delete().to(feed::delete_post))
                .route("/feed/reload", web::post().to(feed::reload))
                .route("/feed/events", web::get().to(feed::events)),
        );
}
