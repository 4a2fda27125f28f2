use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Connection, ConnectionsResponse, CreateConnectionForm, MessageResponse, RespondForm},
    routes::{form::FormFields, parse_id},
    services::connections,
    state::AppState,
};

/// POST /api/connections (form)
pub async fn create(
    State(state): State<Arc<AppState>>,
    FormFields(form): FormFields<CreateConnectionForm>,
) -> AppResult<Json<Connection>> {
    let user_not_found = || AppError::NotFound("User not found".to_string());
    let from_user_id = parse_id(&form.from_user_id).ok_or_else(user_not_found)?;
    let to_user_id = parse_id(&form.to_user_id).ok_or_else(user_not_found)?;

    let connection = connections::create(&state, from_user_id, to_user_id, form.message).await?;
    Ok(Json(connection))
}

/// GET /api/connections/:user_id
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ConnectionsResponse>> {
    let connections = match parse_id(&user_id) {
        Some(user_id) => connections::list_for_user(&state, user_id).await?,
        None => Vec::new(),
    };
    Ok(Json(ConnectionsResponse { connections }))
}

/// POST /api/connections/:connection_id/respond (form)
pub async fn respond(
    State(state): State<Arc<AppState>>,
    Path(connection_id): Path<String>,
    FormFields(form): FormFields<RespondForm>,
) -> AppResult<Json<MessageResponse>> {
    let response = connections::respond(&state, parse_id(&connection_id), &form.status).await?;
    Ok(Json(response))
}
