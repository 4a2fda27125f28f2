use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        LikeForm, LikeResponse, NewVideo, Pagination, UploadVideoForm, Video, VideoResponse,
    },
    routes::{form::FormFields, parse_id},
    services::videos,
    state::AppState,
};

/// POST /api/videos (form)
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    FormFields(form): FormFields<UploadVideoForm>,
) -> AppResult<Json<Video>> {
    let user_id =
        parse_id(&form.user_id).ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        payload_bytes = form.video_data.len(),
        "Processing video upload"
    );

    let video = videos::upload(
        &state,
        NewVideo {
            user_id,
            title: form.title,
            description: form.description,
            category: form.category,
            video_data: form.video_data,
        },
    )
    .await?;

    Ok(Json(video))
}

/// GET /api/videos?limit&skip
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<VideoResponse>>> {
    let videos = videos::list_videos(&state, page).await?;
    Ok(Json(videos))
}

/// GET /api/videos/:video_id. Every successful fetch counts as a view.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> AppResult<Json<VideoResponse>> {
    let video_id =
        parse_id(&video_id).ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    let video = videos::get_video(&state, video_id).await?;
    Ok(Json(video))
}

/// POST /api/videos/:video_id/like (form)
pub async fn like(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    FormFields(form): FormFields<LikeForm>,
) -> AppResult<Json<LikeResponse>> {
    let video_id =
        parse_id(&video_id).ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    let user_id = parse_id(&form.user_id)
        .ok_or_else(|| AppError::InvalidInput("Invalid user_id".to_string()))?;

    let response = videos::toggle_like(&state, video_id, user_id).await?;
    Ok(Json(response))
}
