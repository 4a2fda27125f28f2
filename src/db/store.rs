use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Connection, ConnectionStatus, Pagination, User, Video},
};

/// Document store holding the users, videos and connections collections.
///
/// Every mutation is a single-record operation; nothing spans collections.
/// Implementations report uniqueness violations as `AppError::Conflict`.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user; fails with Conflict when the email or username is taken.
    async fn insert_user(&self, user: &User) -> AppResult<()>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn list_users(&self, page: Pagination) -> AppResult<Vec<User>>;

    async fn insert_video(&self, video: &Video) -> AppResult<()>;

    /// Reads a video without touching its view counter.
    async fn find_video(&self, id: Uuid) -> AppResult<Option<Video>>;

    async fn list_videos(&self, page: Pagination) -> AppResult<Vec<Video>>;

    /// Atomically increments the view counter and returns the updated video.
    async fn record_view(&self, id: Uuid) -> AppResult<Option<Video>>;

    /// Atomically adds `user_id` to the likes, or removes it if present.
    /// Returns the resulting like count, or None when the video is unknown.
    async fn toggle_like(&self, video_id: Uuid, user_id: Uuid) -> AppResult<Option<usize>>;

    /// Videos not owned by `exclude_user` whose generated tags share at
    /// least one entry with `tags`.
    async fn videos_matching_tags(
        &self,
        exclude_user: Uuid,
        tags: &[String],
        limit: usize,
    ) -> AppResult<Vec<Video>>;

    /// Inserts a connection; fails with Conflict when the same ordered
    /// (from, to) pair already exists.
    async fn insert_connection(&self, connection: &Connection) -> AppResult<()>;

    async fn find_connection(&self, id: Uuid) -> AppResult<Option<Connection>>;

    async fn find_connection_between(
        &self,
        from_user_id: Uuid,
        to_user_id: Uuid,
    ) -> AppResult<Option<Connection>>;

    /// Connections in either direction involving `user_id`, oldest first.
    async fn connections_for_user(&self, user_id: Uuid, limit: usize)
        -> AppResult<Vec<Connection>>;

    /// Moves a pending connection to `status`. Returns false when the
    /// connection is missing or has already been answered.
    async fn update_connection_status(&self, id: Uuid, status: ConnectionStatus)
        -> AppResult<bool>;
}
