use uuid::Uuid;

use crate::{
    cached_optional,
    db::CacheKey,
    error::{AppError, AppResult},
    models::{LikeResponse, NewVideo, Pagination, UploaderSummary, Video, VideoResponse},
    state::AppState,
};

const UPLOADER_CACHE_TTL: u64 = 3600; // 1 hour

/// Stores a new video for an existing user, with generated tags and rating.
pub async fn upload(state: &AppState, draft: NewVideo) -> AppResult<Video> {
    if state.store.find_user(draft.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let video_id = Uuid::new_v4();
    let (tags, rating) = state.enricher.analyze_video(video_id, &draft).await;
    let video = Video::new(video_id, draft, tags, rating);

    state.store.insert_video(&video).await?;

    tracing::info!(
        video_id = %video.id,
        user_id = %video.user_id,
        category = %video.category,
        tags = video.ai_generated_tags.len(),
        rating = video.ai_skill_rating,
        "Video uploaded"
    );

    Ok(video)
}

pub async fn list_videos(state: &AppState, page: Pagination) -> AppResult<Vec<VideoResponse>> {
    let videos = state.store.list_videos(page).await?;
    with_uploaders(state, videos).await
}

/// Fetches a video for display. Counts as a view.
pub async fn get_video(state: &AppState, video_id: Uuid) -> AppResult<VideoResponse> {
    let video = state
        .store
        .record_view(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let uploader = uploader_summary(state, video.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(VideoResponse::new(video, uploader))
}

/// Likes the video for `user_id`, or removes an existing like.
pub async fn toggle_like(
    state: &AppState,
    video_id: Uuid,
    user_id: Uuid,
) -> AppResult<LikeResponse> {
    let likes_count = state
        .store
        .toggle_like(video_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    tracing::debug!(video_id = %video_id, user_id = %user_id, likes_count, "Like toggled");

    Ok(LikeResponse {
        message: "Like updated".to_string(),
        likes_count,
    })
}

/// Joins each video with its uploader, silently dropping videos whose
/// uploader no longer resolves.
pub async fn with_uploaders(state: &AppState, videos: Vec<Video>) -> AppResult<Vec<VideoResponse>> {
    let mut enriched = Vec::with_capacity(videos.len());

    for video in videos {
        match uploader_summary(state, video.user_id).await? {
            Some(uploader) => enriched.push(VideoResponse::new(video, uploader)),
            None => {
                tracing::debug!(video_id = %video.id, user_id = %video.user_id, "Uploader missing, skipping video");
            }
        }
    }

    Ok(enriched)
}

/// Name and handle of a user, read through the cache when one is configured.
pub async fn uploader_summary(state: &AppState, user_id: Uuid) -> AppResult<Option<UploaderSummary>> {
    let lookup = async {
        Ok::<_, AppError>(state.store.find_user(user_id).await?.map(|u| u.summary()))
    };

    match &state.cache {
        Some(cache) => cached_optional!(cache, CacheKey::Uploader(user_id), UPLOADER_CACHE_TTL, lookup),
        None => lookup.await,
    }
}
