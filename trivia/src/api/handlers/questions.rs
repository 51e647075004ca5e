/*
 * Responsibility
 * - /questions 系 handler (一覧・作成・削除・検索)
 * - 一覧は空ページなら 404
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};

use crate::{
    api::dto::{
        CreateQuestionRequest, CreatedResponse, DeletedResponse, PageParams, QuestionsPage,
        SearchRequest,
    },
    error::AppError,
    repos::{
        category_repo,
        question_repo::{self, NewQuestion},
    },
    services::pagination::{page_number, paginate},
    state::AppState,
};

pub async fn list_questions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<QuestionsPage>, AppError> {
    let Query(params) = params?;

    let selection = question_repo::list(&state.db).await?;
    let questions = paginate(&selection, page_number(params.page.as_deref()));
    if questions.is_empty() {
        return Err(AppError::NotFound);
    }
    let categories = category_repo::map(&state.db).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions: selection.len(),
        current_category: None,
        categories: Some(categories),
    }))
}

pub async fn delete_question(
    State(state): State<AppState>,
    question_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(question_id) = question_id?;

    if !question_repo::delete(&state.db, question_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(question_id, "question deleted");

    Ok(Json(DeletedResponse {
        success: true,
        id: question_id,
    }))
}

pub async fn create_question(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, AppError> {
    let Query(params) = params?;
    let Json(req) = body?;
    let valid = req
        .validate()
        .map_err(|e| AppError::Unprocessable(e.to_string()))?;

    let row = question_repo::create(
        &state.db,
        NewQuestion {
            question: &valid.question,
            answer: &valid.answer,
            category: valid.category,
            difficulty: valid.difficulty,
        },
    )
    .await?;
    tracing::info!(question_id = row.id, category = row.category, "question created");

    let selection = question_repo::list(&state.db).await?;

    Ok(Json(CreatedResponse {
        success: true,
        created: row.id,
        questions: paginate(&selection, page_number(params.page.as_deref())),
        total_questions: selection.len(),
    }))
}

pub async fn search_questions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<QuestionsPage>, AppError> {
    let Query(params) = params?;
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let term = req
        .search_term
        .ok_or_else(|| AppError::BadRequest("searchTerm is required".to_string()))?;

    let selection = question_repo::search(&state.db, &term).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: paginate(&selection, page_number(params.page.as_deref())),
        total_questions: selection.len(),
        current_category: None,
        categories: None,
    }))
}
