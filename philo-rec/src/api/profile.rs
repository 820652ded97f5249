//! Profile building endpoint

use axum::{extract::State, routing::post, Json, Router};
use philo_common::{EnhancedUserProfile, ExperienceLevel, QuizAnswer, UserProfile};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Shortest accepted answer to an enhanced free-text question, after trimming
pub const MIN_ENHANCED_TEXT_LEN: usize = 30;

/// POST /api/profile request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    /// Answers in the order they were given
    #[serde(default)]
    pub answers: Vec<QuizAnswer>,
    #[serde(default)]
    pub introspection_text: String,
    #[serde(default, alias = "experienceWithPhilosophy")]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub enhanced_profile: Option<EnhancedUserProfile>,
}

/// Reject enhanced profiles whose free-text answers are too short
pub fn validate_enhanced(enhanced: &EnhancedUserProfile) -> ApiResult<()> {
    let fields = [
        ("currentChallenges", &enhanced.current_challenges),
        ("personalityVariability", &enhanced.personality_variability),
        ("lifeBackground", &enhanced.life_background),
    ];

    for (name, text) in fields {
        let len = text.trim().chars().count();
        if len < MIN_ENHANCED_TEXT_LEN {
            return Err(ApiError::BadRequest(format!(
                "{} must be at least {} characters (got {})",
                name, MIN_ENHANCED_TEXT_LEN, len
            )));
        }
    }
    Ok(())
}

/// Validate a client-supplied profile before scoring
pub fn validate_profile(profile: &UserProfile) -> ApiResult<()> {
    match &profile.enhanced_profile {
        Some(enhanced) => validate_enhanced(enhanced),
        None => Ok(()),
    }
}

/// POST /api/profile
///
/// Build a profile from quiz answers and introspection text.
pub async fn build_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    if let Some(enhanced) = &request.enhanced_profile {
        validate_enhanced(enhanced)?;
    }

    let profile = state.builder.build(
        &request.answers,
        &request.introspection_text,
        request.experience_level,
        request.enhanced_profile,
    );

    tracing::info!(
        answers = request.answers.len(),
        contexts = profile.effective_contexts().len(),
        enhanced = profile.enhanced_profile.is_some(),
        "Built profile"
    );

    Ok(Json(profile))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/api/profile", post(build_profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enhanced(text: &str) -> EnhancedUserProfile {
        EnhancedUserProfile {
            current_challenges: text.to_string(),
            personality_variability: text.to_string(),
            life_background: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_enhanced_text_length() {
        let ok = "a".repeat(30);
        assert!(validate_enhanced(&enhanced(&ok)).is_ok());

        // padding does not count
        let padded = format!("   {}   ", "a".repeat(29));
        assert!(matches!(validate_enhanced(&enhanced(&padded)), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_names_first_short_field() {
        let mut profile = enhanced(&"x".repeat(40));
        profile.life_background = "too short".to_string();
        let err = validate_enhanced(&profile).unwrap_err();
        assert!(err.to_string().contains("lifeBackground"));
    }

    #[test]
    fn test_profile_without_enhanced_is_valid() {
        assert!(validate_profile(&UserProfile::default()).is_ok());
    }
}
