use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    state::AppState,
};

pub mod auth;
pub mod connections;
pub mod form;
pub mod recommendations;
pub mod users;
pub mod videos;

/// Default request body cap when none is configured
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with_limit(state, DEFAULT_BODY_LIMIT)
}

pub fn create_router_with_limit(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors)
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users", get(users::list))
        .route("/users/:user_id", get(users::get))
        .route("/videos", get(videos::list).post(videos::upload))
        .route("/videos/:video_id", get(videos::get))
        .route("/videos/:video_id/like", post(videos::like))
        .route("/connections", post(connections::create))
        .route("/connections/:user_id", get(connections::list))
        .route(
            "/connections/:connection_id/respond",
            post(connections::respond),
        )
        .route(
            "/recommendations/:user_id",
            get(recommendations::recommend),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Parses an identifier taken from a path or form field. Malformed ids
/// cannot name a stored record.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
