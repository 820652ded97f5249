//! Quiz question endpoint

use axum::{extract::State, routing::get, Json, Router};
use philo_common::quiz::QuestionBank;

use crate::AppState;

/// GET /api/questions
///
/// Standard and enhanced question sets with each option's profile effect.
pub async fn get_questions(State(state): State<AppState>) -> Json<QuestionBank> {
    Json(state.builder.bank().clone())
}

pub fn question_routes() -> Router<AppState> {
    Router::new().route("/api/questions", get(get_questions))
}
