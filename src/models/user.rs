use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::VerificationStatus;

/// Kind of performer profile
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    #[default]
    Dancer,
    Musician,
    Director,
    Fan,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Dancer => "dancer",
            ProfileType::Musician => "musician",
            ProfileType::Director => "director",
            ProfileType::Fan => "fan",
        }
    }
}

impl Display for ProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dancer" => Ok(ProfileType::Dancer),
            "musician" => Ok(ProfileType::Musician),
            "director" => Ok(ProfileType::Director),
            "fan" => Ok(ProfileType::Fan),
            other => Err(format!("unknown profile type: {}", other)),
        }
    }
}

/// A registered performer or fan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
    pub ai_generated_bio: Option<String>,
    pub profile_type: ProfileType,
    /// Interest tags, kept in the order the user supplied them
    pub tags: Vec<String>,
    pub profile_image: Option<String>,
    pub verification_status: VerificationStatus,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a pending user from a registration request. The generated bio
    /// is filled in by the caller before the record is stored.
    pub fn new(request: RegisterRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: request.email,
            name: request.name,
            username: request.username,
            bio: None,
            ai_generated_bio: None,
            profile_type: request.profile_type,
            tags: dedup_tags(request.tags),
            profile_image: None,
            verification_status: VerificationStatus::Pending,
            followers: Vec::new(),
            following: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> UploaderSummary {
        UploaderSummary {
            name: self.name.clone(),
            username: self.username.clone(),
        }
    }
}

/// Trims tags and drops blanks and repeats, keeping first occurrences in order.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !seen.iter().any(|t| t == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

/// Display name and handle of a video's owner, joined into video responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploaderSummary {
    pub name: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub profile_type: ProfileType,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Login payload. The password is accepted but never checked.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub message: String,
}
