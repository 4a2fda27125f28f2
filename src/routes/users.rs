use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Pagination, User},
    routes::parse_id,
    services::users,
    state::AppState,
};

/// GET /api/users/:user_id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<User>> {
    let user_id =
        parse_id(&user_id).ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let user = users::get_user(&state, user_id).await?;
    Ok(Json(user))
}

/// GET /api/users?limit&skip
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<User>>> {
    let users = users::list_users(&state, page).await?;
    Ok(Json(users))
}
