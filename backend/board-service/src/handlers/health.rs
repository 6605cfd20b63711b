use actix_web::HttpResponse;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "board-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
