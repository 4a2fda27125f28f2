use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{LoginRequest, LoginResponse, RegisterRequest, User},
    services::users,
    state::AppState,
};

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<User>> {
    tracing::info!(
        request_id = %request_id,
        username = %request.username,
        "Processing registration"
    );

    let user = users::register(&state, request).await?;
    Ok(Json(user))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = users::login(&state, request).await?;
    Ok(Json(response))
}
