//! Per-book compatibility breakdown

use axum::{extract::State, routing::post, Json, Router};
use philo_common::scoring::{compare_traits, MatchQuality, MatchScorer, TraitComparison};
use philo_common::UserProfile;
use serde::{Deserialize, Serialize};

use crate::api::profile::validate_profile;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/compatibility request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRequest {
    pub profile: UserProfile,
    pub book_id: String,
}

/// POST /api/compatibility response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResponse {
    pub book_id: String,
    pub title: String,
    pub match_percentage: u8,
    pub quality: MatchQuality,
    pub label: String,
    /// Traits known on both sides, in trait order
    pub traits: Vec<TraitComparison>,
}

/// POST /api/compatibility
pub async fn compatibility(
    State(state): State<AppState>,
    Json(request): Json<CompatibilityRequest>,
) -> ApiResult<Json<CompatibilityResponse>> {
    validate_profile(&request.profile)?;

    let book = state
        .catalog
        .read()
        .await
        .get(&request.book_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Book not found: {}", request.book_id)))?;

    let profile = &request.profile;
    let traits = profile.effective_traits();
    let contexts = profile.effective_contexts();
    let match_percentage = MatchScorer::new(
        traits,
        &contexts,
        profile.wants_contrast,
        profile.seeking_type(),
    )
    .score(&book);
    let quality = MatchQuality::from_percentage(match_percentage);

    Ok(Json(CompatibilityResponse {
        traits: compare_traits(traits, &book.profile),
        book_id: book.id,
        title: book.title,
        match_percentage,
        quality,
        label: quality.label().to_string(),
    }))
}

pub fn compatibility_routes() -> Router<AppState> {
    Router::new().route("/api/compatibility", post(compatibility))
}
