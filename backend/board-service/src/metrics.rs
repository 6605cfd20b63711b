//! Prometheus metrics for board-service.
//!
//! Collectors are registered in the default registry and exposed on
//! `/metrics`.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    /// Identity operations segmented by method (password, sign_up, federated, sign_out) and outcome.
    pub static ref AUTH_ATTEMPTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "board_auth_attempts_total",
        "Identity operations segmented by method and outcome",
        &["method", "outcome"]
    )
    .expect("failed to register board_auth_attempts_total");

    /// Post writes segmented by result: `ok` or a store error kind
    /// (permission_denied, too_large, not_found, unavailable, malformed).
    pub static ref POST_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "board_post_writes_total",
        "Post append attempts segmented by result",
        &["result"]
    )
    .expect("failed to register board_post_writes_total");

    /// Post deletes segmented by result, labelled like writes.
    pub static ref POST_DELETES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "board_post_deletes_total",
        "Post delete attempts segmented by result",
        &["result"]
    )
    .expect("failed to register board_post_deletes_total");

    /// Feed snapshots handed to subscribers.
    pub static ref SNAPSHOTS_DELIVERED_TOTAL: IntCounter = register_int_counter!(
        "board_snapshots_delivered_total",
        "Complete feed snapshots delivered to subscribers"
    )
    .expect("failed to register board_snapshots_delivered_total");

    /// Live feed subscriptions currently running.
    pub static ref ACTIVE_SUBSCRIPTIONS: IntGauge = register_int_gauge!(
        "board_active_subscriptions",
        "Feed subscriptions currently delivering snapshots"
    )
    .expect("failed to register board_active_subscriptions");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
