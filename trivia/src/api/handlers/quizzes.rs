/*
 * Responsibility
 * - POST /quizzes: 未出題の問題をランダムに 1 問返す
 */
use std::collections::HashSet;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    api::dto::{QuizRequest, QuizResponse},
    error::AppError,
    repos::question_repo,
    services::quiz,
    state::AppState,
};

pub async fn play_quiz(
    State(state): State<AppState>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let category = req
        .category_filter()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let candidates = match category {
        Some(category_id) => question_repo::list_by_category(&state.db, category_id).await?,
        None => question_repo::list(&state.db).await?,
    };
    if candidates.is_empty() {
        return Err(AppError::NotFound);
    }

    let previous: HashSet<i32> = req.previous_questions.iter().copied().collect();
    let question = quiz::next_question(&candidates, &previous, |q| q.id, &mut rand::thread_rng())
        .cloned();

    Ok(Json(QuizResponse {
        success: question.is_some(),
        question,
    }))
}
