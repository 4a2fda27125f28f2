//! AI enrichment for write paths: profile bios, video tags and skill ratings.
//!
//! Every generator resolves to a usable value. Model failures and unusable
//! responses are logged and replaced by a deterministic fallback, so callers
//! never see an error from this module.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{NewVideo, ProfileType, User, VideoCategory};
use crate::services::llm::{CompletionRequest, LlmClient};

pub const MAX_VIDEO_TAGS: usize = 8;
pub const DEFAULT_SKILL_RATING: f64 = 7.0;
pub const MIN_SKILL_RATING: f64 = 1.0;
pub const MAX_SKILL_RATING: f64 = 10.0;

const BIO_SYSTEM: &str = "You are a creative bio writer for performers. \
    Generate engaging, professional bios for dancers and musicians.";

const TAGS_SYSTEM: &str = "You are an expert in dance and music analysis. \
    Generate relevant tags for performance videos.";

const RATING_SYSTEM: &str = "You are a professional talent evaluator. \
    Rate performances on a scale of 1-10 based on technical skill, creativity, and stage presence.";

/// Tags used when the model cannot tag a video; the category is appended.
const FALLBACK_TAGS: [&str; 2] = ["performance", "talent"];

#[derive(Clone)]
pub struct Enricher {
    llm: Arc<dyn LlmClient>,
}

impl Enricher {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Writes a short bio from the user's name, profile type and tags.
    pub async fn generate_bio(&self, user: &User) -> String {
        let request = CompletionRequest {
            session_id: format!("bio-{}", user.id),
            system: BIO_SYSTEM.to_string(),
            prompt: bio_prompt(user),
        };

        match self.llm.complete(request).await {
            Ok(raw) => parse_bio(&raw).unwrap_or_else(|| {
                tracing::warn!(user_id = %user.id, "Model returned an empty bio, using fallback");
                fallback_bio(user.profile_type, &user.tags)
            }),
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    provider = self.llm.name(),
                    error = %e,
                    "Bio generation failed, using fallback"
                );
                fallback_bio(user.profile_type, &user.tags)
            }
        }
    }

    /// Produces between 1 and [`MAX_VIDEO_TAGS`] tags for a new video.
    pub async fn generate_video_tags(&self, video_id: Uuid, video: &NewVideo) -> Vec<String> {
        let request = CompletionRequest {
            session_id: format!("video-tags-{}", video_id),
            system: TAGS_SYSTEM.to_string(),
            prompt: tags_prompt(video),
        };

        match self.llm.complete(request).await {
            Ok(raw) => parse_tags(&raw).unwrap_or_else(|| {
                tracing::warn!(video_id = %video_id, "Model returned no usable tags, using fallback");
                fallback_tags(video.category)
            }),
            Err(e) => {
                tracing::warn!(
                    video_id = %video_id,
                    provider = self.llm.name(),
                    error = %e,
                    "Tag generation failed, using fallback"
                );
                fallback_tags(video.category)
            }
        }
    }

    /// Rates a new video within [1.0, 10.0].
    pub async fn generate_skill_rating(&self, video_id: Uuid, video: &NewVideo) -> f64 {
        let request = CompletionRequest {
            session_id: format!("skill-rating-{}", video_id),
            system: RATING_SYSTEM.to_string(),
            prompt: rating_prompt(video),
        };

        match self.llm.complete(request).await {
            Ok(raw) => parse_rating(&raw),
            Err(e) => {
                tracing::warn!(
                    video_id = %video_id,
                    provider = self.llm.name(),
                    error = %e,
                    "Skill rating failed, using default"
                );
                DEFAULT_SKILL_RATING
            }
        }
    }

    /// Generates tags and rating for an upload; both calls run concurrently.
    pub async fn analyze_video(&self, video_id: Uuid, video: &NewVideo) -> (Vec<String>, f64) {
        tokio::join!(
            self.generate_video_tags(video_id, video),
            self.generate_skill_rating(video_id, video),
        )
    }
}

pub fn bio_prompt(user: &User) -> String {
    format!(
        "Generate a creative and engaging bio for a {} named {} with tags: {}. \
         Keep it professional but vibrant, around 100-150 words. Focus on their passion and style.",
        user.profile_type,
        user.name,
        user.tags.join(", ")
    )
}

pub fn tags_prompt(video: &NewVideo) -> String {
    format!(
        "Analyze this video titled \"{}\" with description: \"{}\" and category: \"{}\". \
         Generate 5-8 relevant tags for this performance video. \
         Return only the tags separated by commas.",
        video.title,
        video.description.as_deref().unwrap_or_default(),
        video.category
    )
}

pub fn rating_prompt(video: &NewVideo) -> String {
    format!(
        "Rate this {} performance titled \"{}\" on a scale of 1-10. \
         Consider technical skill, creativity, stage presence, and overall performance quality. \
         Return only the numeric rating (e.g., 8.5).",
        video.category, video.title
    )
}

/// Trimmed bio text, or None when the model answered with whitespace.
pub fn parse_bio(raw: &str) -> Option<String> {
    let bio = raw.trim();
    (!bio.is_empty()).then(|| bio.to_string())
}

/// Comma-separated tags, trimmed, blanks dropped, at most [`MAX_VIDEO_TAGS`].
/// None when nothing usable remains.
pub fn parse_tags(raw: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .take(MAX_VIDEO_TAGS)
        .map(str::to_string)
        .collect();

    (!tags.is_empty()).then_some(tags)
}

/// Numeric rating clamped to [1.0, 10.0]; anything unparseable or
/// non-finite yields [`DEFAULT_SKILL_RATING`].
pub fn parse_rating(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(rating) if rating.is_finite() => rating.clamp(MIN_SKILL_RATING, MAX_SKILL_RATING),
        _ => {
            tracing::debug!(response = %raw, "Unparseable skill rating, using default");
            DEFAULT_SKILL_RATING
        }
    }
}

pub fn fallback_bio(profile_type: ProfileType, tags: &[String]) -> String {
    if tags.is_empty() {
        return format!("Passionate {}.", profile_type);
    }
    let expertise: Vec<&str> = tags.iter().take(3).map(String::as_str).collect();
    format!(
        "Passionate {} with expertise in {}.",
        profile_type,
        expertise.join(", ")
    )
}

pub fn fallback_tags(category: VideoCategory) -> Vec<String> {
    FALLBACK_TAGS
        .iter()
        .map(|t| t.to_string())
        .chain(std::iter::once(category.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegisterRequest;
    use crate::services::llm::{LlmError, MockLlmClient};

    fn user(tags: &[&str]) -> User {
        User::new(RegisterRequest {
            email: "lena@example.com".to_string(),
            name: "Lena".to_string(),
            username: "lena".to_string(),
            profile_type: ProfileType::Dancer,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
    }

    fn draft() -> NewVideo {
        NewVideo {
            user_id: Uuid::new_v4(),
            title: "Rooftop Solo".to_string(),
            description: Some("Contemporary piece at dusk".to_string()),
            category: VideoCategory::Rehearsal,
            video_data: "AAAA".to_string(),
        }
    }

    fn enricher_returning(result: fn() -> Result<String, LlmError>) -> Enricher {
        let mut mock = MockLlmClient::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete().returning(move |_| result());
        Enricher::new(Arc::new(mock))
    }

    #[test]
    fn test_parse_tags_trims_and_truncates() {
        let tags = parse_tags(" jazz ,hip hop, , tap,a,b,c,d,e,f,g").unwrap();
        assert_eq!(tags.len(), MAX_VIDEO_TAGS);
        assert_eq!(tags[0], "jazz");
        assert_eq!(tags[1], "hip hop");
        assert_eq!(tags[2], "tap");
    }

    #[test]
    fn test_parse_tags_empty_response_is_none() {
        assert_eq!(parse_tags(""), None);
        assert_eq!(parse_tags(" , ,"), None);
    }

    #[test]
    fn test_parse_rating_clamps() {
        assert_eq!(parse_rating("8.5"), 8.5);
        assert_eq!(parse_rating(" 12 \n"), MAX_SKILL_RATING);
        assert_eq!(parse_rating("-3"), MIN_SKILL_RATING);
        assert_eq!(parse_rating("0.2"), MIN_SKILL_RATING);
    }

    #[test]
    fn test_parse_rating_garbage_uses_default() {
        assert_eq!(parse_rating("eight and a half"), DEFAULT_SKILL_RATING);
        assert_eq!(parse_rating("8.5/10"), DEFAULT_SKILL_RATING);
        assert_eq!(parse_rating("NaN"), DEFAULT_SKILL_RATING);
        assert_eq!(parse_rating("inf"), DEFAULT_SKILL_RATING);
        assert_eq!(parse_rating(""), DEFAULT_SKILL_RATING);
    }

    #[test]
    fn test_fallback_bio_uses_first_three_tags() {
        let tags: Vec<String> = ["salsa", "bachata", "kizomba", "tango"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(
            fallback_bio(ProfileType::Dancer, &tags),
            "Passionate dancer with expertise in salsa, bachata, kizomba."
        );
        assert_eq!(fallback_bio(ProfileType::Fan, &[]), "Passionate fan.");
    }

    #[test]
    fn test_fallback_tags_end_with_category() {
        assert_eq!(
            fallback_tags(VideoCategory::Duet),
            vec!["performance", "talent", "duet"]
        );
    }

    #[test]
    fn test_prompts_interpolate_entity_fields() {
        let user = user(&["jazz", "blues"]);
        let prompt = bio_prompt(&user);
        assert!(prompt.contains("a dancer named Lena"));
        assert!(prompt.contains("jazz, blues"));

        let video = draft();
        assert!(tags_prompt(&video).contains("\"Contemporary piece at dusk\""));
        assert!(rating_prompt(&video).starts_with("Rate this rehearsal performance"));
    }

    #[tokio::test]
    async fn test_bio_uses_session_per_user() {
        let user = user(&["jazz"]);
        let expected_session = format!("bio-{}", user.id);

        let mut mock = MockLlmClient::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete()
            .withf(move |req| req.session_id == expected_session && req.system == BIO_SYSTEM)
            .times(1)
            .returning(|_| Ok("  Lena lights up every stage.\n".to_string()));

        let bio = Enricher::new(Arc::new(mock)).generate_bio(&user).await;
        assert_eq!(bio, "Lena lights up every stage.");
    }

    #[tokio::test]
    async fn test_bio_falls_back_when_model_fails() {
        let enricher = enricher_returning(|| Err(LlmError::Timeout));
        let bio = enricher.generate_bio(&user(&["jazz", "blues"])).await;
        assert_eq!(bio, "Passionate dancer with expertise in jazz, blues.");
    }

    #[tokio::test]
    async fn test_blank_bio_falls_back() {
        let enricher = enricher_returning(|| Ok("   ".to_string()));
        let bio = enricher.generate_bio(&user(&[])).await;
        assert_eq!(bio, "Passionate dancer.");
    }

    #[tokio::test]
    async fn test_analyze_video_with_working_model() {
        let mut mock = MockLlmClient::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete().returning(|req| {
            if req.session_id.starts_with("video-tags-") {
                Ok("contemporary, solo, dusk".to_string())
            } else {
                Ok("9.1".to_string())
            }
        });

        let (tags, rating) = Enricher::new(Arc::new(mock))
            .analyze_video(Uuid::new_v4(), &draft())
            .await;
        assert_eq!(tags, vec!["contemporary", "solo", "dusk"]);
        assert_eq!(rating, 9.1);
    }

    #[tokio::test]
    async fn test_analyze_video_with_unreachable_model() {
        let enricher =
            enricher_returning(|| Err(LlmError::Connection("connection refused".to_string())));
        let (tags, rating) = enricher.analyze_video(Uuid::new_v4(), &draft()).await;

        assert_eq!(tags, vec!["performance", "talent", "rehearsal"]);
        assert_eq!(rating, DEFAULT_SKILL_RATING);
    }
}
