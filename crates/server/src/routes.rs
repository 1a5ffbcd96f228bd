use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::observability;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod subscriptions;

/// Liveness check
#[utoipa::path(get, path = "/health", responses((status = 200, body = crate::openapi::HealthResponse)), tag = "health")]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn metrics() -> (StatusCode, String) {
    observability::encode_metrics()
}

/// Subscription routes, relative to `/api/v1`. Each path is registered with and without a trailing slash.
fn api_routes() -> Router<AppState> {
    use subscriptions::*;

    Router::new()
        .route("/subscription", get(list_subscriptions).post(create_subscription))
        .route("/subscription/", get(list_subscriptions).post(create_subscription))
        .route(
            "/subscription/:id",
            get(get_subscription).put(update_subscription).delete(delete_subscription),
        )
        .route(
            "/subscription/:id/",
            get(get_subscription).put(update_subscription).delete(delete_subscription),
        )
        .route("/summ", get(total_spend))
        .route("/summ/", get(total_spend))
        .route_layer(middleware::from_fn(observability::track_requests))
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let docs = SwaggerUi::new("/api/v1/swagger").url("/api/v1/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api_routes())
        .merge(docs)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
