use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{Connection, ConnectionStatus, Pagination, User, Video},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// PostgreSQL-backed store. One table per collection, created by the
/// embedded migrations.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations from `migrations/`
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    username: String,
    bio: Option<String>,
    ai_generated_bio: Option<String>,
    profile_type: String,
    tags: Vec<String>,
    profile_image: Option<String>,
    verification_status: String,
    followers: Vec<Uuid>,
    following: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            username: row.username,
            bio: row.bio,
            ai_generated_bio: row.ai_generated_bio,
            profile_type: row.profile_type.parse().map_err(AppError::Internal)?,
            tags: row.tags,
            profile_image: row.profile_image,
            verification_status: row.verification_status.parse().map_err(AppError::Internal)?,
            followers: row.followers,
            following: row.following,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct VideoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    ai_generated_tags: Vec<String>,
    genre: Option<String>,
    category: String,
    video_data: String,
    thumbnail: Option<String>,
    likes: Vec<Uuid>,
    views: i64,
    ai_skill_rating: f64,
    verification_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VideoRow> for Video {
    type Error = AppError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        Ok(Video {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            ai_generated_tags: row.ai_generated_tags,
            genre: row.genre,
            category: row.category.parse().map_err(AppError::Internal)?,
            video_data: row.video_data,
            thumbnail: row.thumbnail,
            likes: row.likes,
            views: row.views,
            ai_skill_rating: row.ai_skill_rating,
            verification_status: row.verification_status.parse().map_err(AppError::Internal)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ConnectionRow {
    id: Uuid,
    from_user_id: Uuid,
    to_user_id: Uuid,
    status: String,
    message: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ConnectionRow> for Connection {
    type Error = AppError;

    fn try_from(row: ConnectionRow) -> Result<Self, Self::Error> {
        Ok(Connection {
            id: row.id,
            from_user_id: row.from_user_id,
            to_user_id: row.to_user_id,
            status: row.status.parse().map_err(AppError::Internal)?,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Turns unique-constraint violations into Conflict errors carrying the
/// message callers show to users.
fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = match db_err.constraint() {
                Some("users_email_key") => "User already exists",
                Some("users_username_key") => "Username already taken",
                Some("connections_pair_key") => "Connection already exists",
                _ => "Record already exists",
            };
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(err)
}

fn convert_all<R, T>(rows: Vec<R>) -> AppResult<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

const VIDEO_COLUMNS: &str = "id, user_id, title, description, ai_generated_tags, genre, category, \
     video_data, thumbnail, likes, views, ai_skill_rating, verification_status, created_at, updated_at";

#[async_trait::async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, name, username, bio, ai_generated_bio, profile_type, \
             tags, profile_image, verification_status, followers, following, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.bio)
        .bind(&user.ai_generated_bio)
        .bind(user.profile_type.as_str())
        .bind(&user.tags)
        .bind(&user.profile_image)
        .bind(user.verification_status.as_str())
        .bind(&user.followers)
        .bind(&user.following)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn list_users(&self, page: Pagination) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn insert_video(&self, video: &Video) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO videos ({VIDEO_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
        ))
        .bind(video.id)
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.ai_generated_tags)
        .bind(&video.genre)
        .bind(video.category.as_str())
        .bind(&video.video_data)
        .bind(&video.thumbnail)
        .bind(&video.likes)
        .bind(video.views)
        .bind(video.ai_skill_rating)
        .bind(video.verification_status.as_str())
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_video(&self, id: Uuid) -> AppResult<Option<Video>> {
        sqlx::query_as::<_, VideoRow>(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Video::try_from)
            .transpose()
    }

    async fn list_videos(&self, page: Pagination) -> AppResult<Vec<Video>> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos ORDER BY created_at, id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn record_view(&self, id: Uuid) -> AppResult<Option<Video>> {
        sqlx::query_as::<_, VideoRow>(&format!(
            "UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Video::try_from)
        .transpose()
    }

    async fn toggle_like(&self, video_id: Uuid, user_id: Uuid) -> AppResult<Option<usize>> {
        // Single statement: the row lock serializes concurrent toggles.
        let count: Option<i32> = sqlx::query_scalar(
            "UPDATE videos SET \
                likes = CASE WHEN $2 = ANY(likes) THEN array_remove(likes, $2) \
                             ELSE array_append(likes, $2) END, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING cardinality(likes)",
        )
        .bind(video_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.map(|c| c.max(0) as usize))
    }

    async fn videos_matching_tags(
        &self,
        exclude_user: Uuid,
        tags: &[String],
        limit: usize,
    ) -> AppResult<Vec<Video>> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos \
             WHERE user_id <> $1 AND ai_generated_tags && $2 \
             LIMIT $3"
        ))
        .bind(exclude_user)
        .bind(tags)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn insert_connection(&self, connection: &Connection) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO connections (id, from_user_id, to_user_id, status, message, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(connection.id)
        .bind(connection.from_user_id)
        .bind(connection.to_user_id)
        .bind(connection.status.as_str())
        .bind(&connection.message)
        .bind(connection.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_connection(&self, id: Uuid) -> AppResult<Option<Connection>> {
        sqlx::query_as::<_, ConnectionRow>("SELECT * FROM connections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Connection::try_from)
            .transpose()
    }

    async fn find_connection_between(
        &self,
        from_user_id: Uuid,
        to_user_id: Uuid,
    ) -> AppResult<Option<Connection>> {
        sqlx::query_as::<_, ConnectionRow>(
            "SELECT * FROM connections WHERE from_user_id = $1 AND to_user_id = $2",
        )
        .bind(from_user_id)
        .bind(to_user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Connection::try_from)
        .transpose()
    }

    async fn connections_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> AppResult<Vec<Connection>> {
        let rows = sqlx::query_as::<_, ConnectionRow>(
            "SELECT * FROM connections \
             WHERE from_user_id = $1 OR to_user_id = $1 \
             ORDER BY created_at, id LIMIT $2",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn update_connection_status(
        &self,
        id: Uuid,
        status: ConnectionStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE connections SET status = $2 WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
