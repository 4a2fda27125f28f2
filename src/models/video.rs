use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UploaderSummary, VerificationStatus};

/// Kind of performance captured in a video
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoCategory {
    #[default]
    Solo,
    Group,
    Duet,
    Rehearsal,
    Performance,
}

impl VideoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCategory::Solo => "solo",
            VideoCategory::Group => "group",
            VideoCategory::Duet => "duet",
            VideoCategory::Rehearsal => "rehearsal",
            VideoCategory::Performance => "performance",
        }
    }
}

impl Display for VideoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solo" => Ok(VideoCategory::Solo),
            "group" => Ok(VideoCategory::Group),
            "duet" => Ok(VideoCategory::Duet),
            "rehearsal" => Ok(VideoCategory::Rehearsal),
            "performance" => Ok(VideoCategory::Performance),
            other => Err(format!("unknown video category: {}", other)),
        }
    }
}

/// An uploaded performance video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub ai_generated_tags: Vec<String>,
    pub genre: Option<String>,
    pub category: VideoCategory,
    /// Opaque encoded payload, stored as received
    pub video_data: String,
    pub thumbnail: Option<String>,
    /// Users who currently like the video; each at most once
    pub likes: Vec<Uuid>,
    pub views: i64,
    /// Always within [1.0, 10.0]
    pub ai_skill_rating: f64,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the uploader, before enrichment
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: VideoCategory,
    pub video_data: String,
}

impl Video {
    /// Builds the stored record once tags and rating have been generated.
    pub fn new(id: Uuid, draft: NewVideo, tags: Vec<String>, rating: f64) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: draft.user_id,
            title: draft.title,
            description: draft.description,
            ai_generated_tags: tags,
            genre: None,
            category: draft.category,
            video_data: draft.video_data,
            thumbnail: None,
            likes: Vec::new(),
            views: 0,
            ai_skill_rating: rating,
            verification_status: VerificationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds or removes `user_id` from the likes, returning the new count.
    pub fn toggle_like(&mut self, user_id: Uuid) -> usize {
        if let Some(pos) = self.likes.iter().position(|id| *id == user_id) {
            self.likes.remove(pos);
        } else {
            self.likes.push(user_id);
        }
        self.updated_at = Utc::now();
        self.likes.len()
    }

    pub fn shares_tag_with(&self, tags: &[String]) -> bool {
        self.ai_generated_tags.iter().any(|t| tags.contains(t))
    }
}

/// Video joined with its uploader's name and handle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoResponse {
    #[serde(flatten)]
    pub video: Video,
    pub user_name: String,
    pub user_username: String,
}

impl VideoResponse {
    pub fn new(video: Video, uploader: UploaderSummary) -> Self {
        Self {
            video,
            user_name: uploader.name,
            user_username: uploader.username,
        }
    }
}

/// Upload form. `user_id` stays textual so an unparseable id can be
/// reported as an unknown user.
#[derive(Debug, Deserialize)]
pub struct UploadVideoForm {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: VideoCategory,
    pub video_data: String,
}

#[derive(Debug, Deserialize)]
pub struct LikeForm {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub message: String,
    pub likes_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommended_videos: Vec<VideoResponse>,
}
