use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::VideoResponse,
    services::videos,
    state::AppState,
};

/// Most videos returned by one recommendation request
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Recommends other users' videos for a user by tag overlap.
///
/// A video qualifies when its generated tags share at least one entry with
/// the user's interest tags and someone else uploaded it. Candidates are not
/// ranked. Candidates whose uploader cannot be resolved are dropped, so fewer
/// than [`MAX_RECOMMENDATIONS`] may come back even when more videos match.
pub async fn get_recommendations(
    state: &AppState,
    user_id: Uuid,
) -> AppResult<Vec<VideoResponse>> {
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.tags.is_empty() {
        return Ok(Vec::new());
    }

    let candidates = state
        .store
        .videos_matching_tags(user.id, &user.tags, MAX_RECOMMENDATIONS)
        .await?;

    tracing::debug!(
        user_id = %user.id,
        interest_tags = user.tags.len(),
        candidates = candidates.len(),
        "Matched recommendation candidates"
    );

    videos::with_uploaders(state, candidates).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::{MemoryStore, Store};
    use crate::models::{NewVideo, ProfileType, RegisterRequest, User, Video, VideoCategory};
    use crate::services::llm::MockLlmClient;

    async fn user(store: &MemoryStore, username: &str, tags: &[&str]) -> User {
        let user = User::new(RegisterRequest {
            email: format!("{username}@x.io"),
            name: format!("{username} name"),
            username: username.to_string(),
            profile_type: ProfileType::Musician,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        store.insert_user(&user).await.unwrap();
        user
    }

    async fn video(store: &MemoryStore, owner: Uuid, tags: &[&str]) -> Video {
        let video = Video::new(
            Uuid::new_v4(),
            NewVideo {
                user_id: owner,
                title: "take".to_string(),
                description: None,
                category: VideoCategory::Performance,
                video_data: "AAAA".to_string(),
            },
            tags.iter().map(|t| t.to_string()).collect(),
            6.0,
        );
        store.insert_video(&video).await.unwrap();
        video
    }

    fn state(store: Arc<MemoryStore>) -> AppState {
        AppState::new(store, Arc::new(MockLlmClient::new()))
    }

    #[tokio::test]
    async fn test_only_overlapping_videos_of_others() {
        let store = Arc::new(MemoryStore::new());
        let me = user(&store, "me", &["jazz", "blues"]).await;
        let other = user(&store, "other", &[]).await;

        video(&store, me.id, &["jazz"]).await;
        let hit = video(&store, other.id, &["blues", "guitar"]).await;
        video(&store, other.id, &["techno"]).await;

        let recommended = get_recommendations(&state(store), me.id).await.unwrap();
        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].video.id, hit.id);
        assert_eq!(recommended[0].user_username, "other");
        assert_eq!(recommended[0].user_name, "other name");
    }

    #[tokio::test]
    async fn test_capped_at_ten() {
        let store = Arc::new(MemoryStore::new());
        let me = user(&store, "me", &["jazz"]).await;
        let other = user(&store, "other", &[]).await;
        for _ in 0..15 {
            video(&store, other.id, &["jazz"]).await;
        }

        let recommended = get_recommendations(&state(store), me.id).await.unwrap();
        assert_eq!(recommended.len(), MAX_RECOMMENDATIONS);
    }

    #[tokio::test]
    async fn test_user_without_tags_gets_nothing() {
        let store = Arc::new(MemoryStore::new());
        let me = user(&store, "me", &[]).await;
        let other = user(&store, "other", &[]).await;
        video(&store, other.id, &["jazz"]).await;

        let recommended = get_recommendations(&state(store), me.id).await.unwrap();
        assert!(recommended.is_empty());
    }

    #[tokio::test]
    async fn test_orphaned_candidates_are_dropped() {
        let store = Arc::new(MemoryStore::new());
        let me = user(&store, "me", &["jazz"]).await;
        video(&store, Uuid::new_v4(), &["jazz"]).await;

        let recommended = get_recommendations(&state(store), me.id).await.unwrap();
        assert!(recommended.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let err = get_recommendations(&state(store), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
