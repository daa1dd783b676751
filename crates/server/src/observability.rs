use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static MERCHANTS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "merchant_api_merchants_created_total",
        "Total merchants created"
    )
    .expect("register merchants_created_total")
});

pub static MERCHANTS_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "merchant_api_merchants_deleted_total",
        "Total merchants deleted"
    )
    .expect("register merchants_deleted_total")
});

pub static MEMBERS_ADDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "merchant_api_members_added_total",
        "Total members added to merchants"
    )
    .expect("register members_added_total")
});

pub static MEMBERS_REMOVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "merchant_api_members_removed_total",
        "Total members removed from merchants"
    )
    .expect("register members_removed_total")
});

pub static REQUEST_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "merchant_api_request_errors_total",
        "Requests answered with an error status",
        &["status"]
    )
    .expect("register request_errors_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    // touch every metric so the exposition lists them before the first event
    Lazy::force(&MERCHANTS_CREATED_TOTAL);
    Lazy::force(&MERCHANTS_DELETED_TOTAL);
    Lazy::force(&MEMBERS_ADDED_TOTAL);
    Lazy::force(&MEMBERS_REMOVED_TOTAL);
    Lazy::force(&REQUEST_ERRORS_TOTAL);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
