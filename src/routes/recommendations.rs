use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::RecommendationsResponse,
    routes::parse_id,
    services::recommendations,
    state::AppState,
};

/// GET /api/recommendations/:user_id
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<RecommendationsResponse>> {
    let user_id =
        parse_id(&user_id).ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let recommended_videos = recommendations::get_recommendations(&state, user_id).await?;
    Ok(Json(RecommendationsResponse { recommended_videos }))
}
