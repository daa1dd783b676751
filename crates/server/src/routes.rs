pub mod merchants;

use std::sync::Arc;

use axum::{http::StatusCode, routing::{delete, get, post}, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::merchant::{MerchantRepository, MerchantService};

use crate::{observability, openapi::ApiDoc};

/// Shared handler state: the merchant service and the member page size.
#[derive(Clone)]
pub struct ServerState {
    pub merchants: Arc<MerchantService<dyn MerchantRepository>>,
    pub per_page: u32,
}

impl ServerState {
    pub fn new(repo: Arc<dyn MerchantRepository>, per_page: u32) -> Self {
        Self { merchants: Arc::new(MerchantService::new(repo)), per_page }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    observability::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    let merchant_routes = Router::new()
        .route("/merchant", get(merchants::list_merchants).post(merchants::create_merchant))
        .route("/merchant/:code", delete(merchants::delete_merchant))
        .route("/merchant/:code/addmember", post(merchants::add_member))
        .route("/merchant/:code/members", get(merchants::list_members))
        .route("/merchant/:code/:email", delete(merchants::remove_member));

    public
        .merge(merchant_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
