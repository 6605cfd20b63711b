use actix_web::{web, App, HttpServer};
use anyhow::Context;
use board_service::{handlers, logging, AppState, Config};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        env = %config.app.env,
        backend = ?config.store.backend,
        locale = ?config.app.locale,
        "starting board-service"
    );

    let state = AppState::from_config(&config).await?;
    let payload_limit = state.max_payload_bytes;
    let data = web::Data::new(state.clone());

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    info!(%bind_address, "HTTP server listening");

    // One worker: the shell is a single event-driven session
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .app_data(web::JsonConfig::default().limit(payload_limit))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .workers(1)
    .run()
    .await
    .context("HTTP server failed")?;

    state.shutdown();
    info!("board-service stopped");
    Ok(())
}
