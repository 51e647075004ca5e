/*
 * Responsibility
 * - trivia API の URL 構造
 * - 未定義 path / method も JSON error body で返す
 */
use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use crate::api::handlers::{
    categories::{list_categories, questions_by_category},
    questions::{create_question, delete_question, list_questions, search_questions},
    quizzes::play_quiz,
};
use crate::error::AppError;
use crate::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(list_categories))
        .route(
            "/categories/{category_id}/questions",
            get(questions_by_category),
        )
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{question_id}", delete(delete_question))
        .route("/search", post(search_questions))
        .route("/quizzes", post(play_quiz))
        .fallback(|| async { AppError::NotFound })
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
}
