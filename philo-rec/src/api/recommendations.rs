//! Recommendation endpoint

use axum::{extract::State, routing::post, Json, Router};
use philo_common::recommend::dominant_movement;
use philo_common::{Book, ResultFilter, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::api::profile::validate_profile;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/recommendations request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub profile: UserProfile,
    /// Books per list; the configured default when absent
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub filter: ResultFilter,
    /// Nudge openness at random before ranking
    #[serde(default)]
    pub regenerate: bool,
    /// Overrides the profile's own contrast preference
    #[serde(default)]
    pub wants_contrast: Option<bool>,
}

/// POST /api/recommendations response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub aligned: Vec<Book>,
    pub contrasting: Vec<Book>,
    /// Most common movement among the top aligned books
    pub dominant_movement: Option<String>,
    /// Contexts the ranking used
    pub contexts: BTreeSet<String>,
    pub wants_contrast: bool,
    /// Profile as scored; differs from the request when regenerated
    pub profile: UserProfile,
}

/// POST /api/recommendations
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> ApiResult<Json<RecommendationResponse>> {
    validate_profile(&request.profile)?;

    let limit = request.limit.unwrap_or(state.config.recommendations.limit);
    if limit == 0 {
        return Err(ApiError::BadRequest("limit must be at least 1".to_string()));
    }

    let mut profile = request.profile;
    if let Some(wants_contrast) = request.wants_contrast {
        profile.wants_contrast = wants_contrast;
    }

    let catalog = state.catalog.read().await.snapshot();

    let (profile, recommendations) = if request.regenerate {
        let mut rng = rand::thread_rng();
        state.engine.regenerate(&catalog, &profile, limit, &mut rng)
    } else {
        let recommendations = state.engine.recommend_both(&catalog, &profile, limit);
        (profile, recommendations)
    };

    let dominant = dominant_movement(&recommendations.aligned).map(str::to_string);
    let recommendations = recommendations.filtered(request.filter);

    tracing::info!(
        catalog = catalog.len(),
        limit,
        filter = ?request.filter,
        regenerate = request.regenerate,
        aligned = recommendations.aligned.len(),
        contrasting = recommendations.contrasting.len(),
        "Served recommendations"
    );

    Ok(Json(RecommendationResponse {
        aligned: recommendations.aligned,
        contrasting: recommendations.contrasting,
        dominant_movement: dominant,
        contexts: profile.effective_contexts(),
        wants_contrast: profile.wants_contrast,
        profile,
    }))
}

pub fn recommendation_routes() -> Router<AppState> {
    Router::new().route("/api/recommendations", post(recommend))
}
