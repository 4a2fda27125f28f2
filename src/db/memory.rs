use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{Connection, ConnectionStatus, Pagination, User, Video},
};

/// In-process store backed by insertion-ordered vectors.
///
/// Each operation takes the lock once, so read-modify-write operations such
/// as `toggle_like` are atomic with respect to each other.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: Vec<User>,
    videos: Vec<Video>,
    connections: Vec<Connection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T: Clone>(items: &[T], page: Pagination) -> Vec<T> {
    items
        .iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self, pagination: Pagination) -> AppResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(page(&inner.users, pagination))
    }

    async fn insert_video(&self, video: &Video) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.videos.push(video.clone());
        Ok(())
    }

    async fn find_video(&self, id: Uuid) -> AppResult<Option<Video>> {
        let inner = self.inner.read().await;
        Ok(inner.videos.iter().find(|v| v.id == id).cloned())
    }

    async fn list_videos(&self, pagination: Pagination) -> AppResult<Vec<Video>> {
        let inner = self.inner.read().await;
        Ok(page(&inner.videos, pagination))
    }

    async fn record_view(&self, id: Uuid) -> AppResult<Option<Video>> {
        let mut inner = self.inner.write().await;
        Ok(inner.videos.iter_mut().find(|v| v.id == id).map(|video| {
            video.views += 1;
            video.clone()
        }))
    }

    async fn toggle_like(&self, video_id: Uuid, user_id: Uuid) -> AppResult<Option<usize>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .videos
            .iter_mut()
            .find(|v| v.id == video_id)
            .map(|video| video.toggle_like(user_id)))
    }

    async fn videos_matching_tags(
        &self,
        exclude_user: Uuid,
        tags: &[String],
        limit: usize,
    ) -> AppResult<Vec<Video>> {
        let inner = self.inner.read().await;
        Ok(inner
            .videos
            .iter()
            .filter(|v| v.user_id != exclude_user && v.shares_tag_with(tags))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_connection(&self, connection: &Connection) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let duplicate = inner.connections.iter().any(|c| {
            c.from_user_id == connection.from_user_id && c.to_user_id == connection.to_user_id
        });
        if duplicate {
            return Err(AppError::Conflict("Connection already exists".to_string()));
        }
        inner.connections.push(connection.clone());
        Ok(())
    }

    async fn find_connection(&self, id: Uuid) -> AppResult<Option<Connection>> {
        let inner = self.inner.read().await;
        Ok(inner.connections.iter().find(|c| c.id == id).cloned())
    }

    async fn find_connection_between(
        &self,
        from_user_id: Uuid,
        to_user_id: Uuid,
    ) -> AppResult<Option<Connection>> {
        let inner = self.inner.read().await;
        Ok(inner
            .connections
            .iter()
            .find(|c| c.from_user_id == from_user_id && c.to_user_id == to_user_id)
            .cloned())
    }

    async fn connections_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> AppResult<Vec<Connection>> {
        let inner = self.inner.read().await;
        Ok(inner
            .connections
            .iter()
            .filter(|c| c.involves(user_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_connection_status(
        &self,
        id: Uuid,
        status: ConnectionStatus,
    ) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.connections.iter_mut().find(|c| c.id == id) {
            Some(connection) if connection.status == ConnectionStatus::Pending => {
                connection.status = status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewVideo, ProfileType, RegisterRequest, VideoCategory};

    fn user(email: &str, username: &str) -> User {
        User::new(RegisterRequest {
            email: email.to_string(),
            name: username.to_string(),
            username: username.to_string(),
            profile_type: ProfileType::Dancer,
            tags: vec![],
        })
    }

    fn video(owner: Uuid, tags: &[&str]) -> Video {
        Video::new(
            Uuid::new_v4(),
            NewVideo {
                user_id: owner,
                title: "clip".to_string(),
                description: None,
                category: VideoCategory::Solo,
                video_data: "AAAA".to_string(),
            },
            tags.iter().map(|t| t.to_string()).collect(),
            7.0,
        )
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username_conflict() {
        let store = MemoryStore::new();
        store.insert_user(&user("a@x.io", "a")).await.unwrap();

        let err = store.insert_user(&user("a@x.io", "b")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = store.insert_user(&user("b@x.io", "a")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        assert_eq!(store.list_users(Pagination::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_users_honours_skip_and_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            let u = user(&format!("{i}@x.io"), &format!("user{i}"));
            store.insert_user(&u).await.unwrap();
        }

        let users = store
            .list_users(Pagination { limit: 2, skip: 3 })
            .await
            .unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["user3", "user4"]);
    }

    #[tokio::test]
    async fn test_record_view_increments_but_find_does_not() {
        let store = MemoryStore::new();
        let v = video(Uuid::new_v4(), &["jazz"]);
        store.insert_video(&v).await.unwrap();

        assert_eq!(store.find_video(v.id).await.unwrap().unwrap().views, 0);
        assert_eq!(store.record_view(v.id).await.unwrap().unwrap().views, 1);
        assert_eq!(store.record_view(v.id).await.unwrap().unwrap().views, 2);
        assert!(store.record_view(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_likes_are_not_lost() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let v = video(Uuid::new_v4(), &[]);
        store.insert_video(&v).await.unwrap();
        let video_id = v.id;

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.toggle_like(video_id, Uuid::new_v4()).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.find_video(video_id).await.unwrap().unwrap().likes.len(), 20);
    }

    #[tokio::test]
    async fn test_videos_matching_tags_excludes_owner_and_caps() {
        let store = MemoryStore::new();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        store.insert_video(&video(me, &["jazz"])).await.unwrap();
        for _ in 0..4 {
            store.insert_video(&video(other, &["jazz", "tap"])).await.unwrap();
        }
        store.insert_video(&video(other, &["salsa"])).await.unwrap();

        let tags = vec!["jazz".to_string()];
        let found = store.videos_matching_tags(me, &tags, 3).await.unwrap();
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|v| v.user_id == other));
    }

    #[tokio::test]
    async fn test_connection_pair_uniqueness_is_directional() {
        let store = MemoryStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        tokio_test::assert_ok!(store.insert_connection(&Connection::new(a, b, None)).await);
        let err = store
            .insert_connection(&Connection::new(a, b, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        tokio_test::assert_ok!(store.insert_connection(&Connection::new(b, a, None)).await);

        assert_eq!(store.connections_for_user(a, 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_connection_status_changes_once() {
        let store = MemoryStore::new();
        let connection = Connection::new(Uuid::new_v4(), Uuid::new_v4(), None);
        store.insert_connection(&connection).await.unwrap();

        assert!(store
            .update_connection_status(connection.id, ConnectionStatus::Accepted)
            .await
            .unwrap());
        assert!(!store
            .update_connection_status(connection.id, ConnectionStatus::Rejected)
            .await
            .unwrap());

        let stored = store.find_connection(connection.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ConnectionStatus::Accepted);
    }
}
