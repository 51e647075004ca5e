/*
 * Responsibility
 * - GET /categories
 * - GET /categories/{id}/questions (paginate, 問題が無ければ 404)
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};

use crate::{
    api::dto::{CategoriesResponse, PageParams, QuestionsPage},
    error::AppError,
    repos::{category_repo, question_repo},
    services::pagination::{page_number, paginate},
    state::AppState,
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = category_repo::map(&state.db).await?;

    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

pub async fn questions_by_category(
    State(state): State<AppState>,
    category_id: Result<Path<i32>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<QuestionsPage>, AppError> {
    let Path(category_id) = category_id?;
    let Query(params) = params?;

    let selection = question_repo::list_by_category(&state.db, category_id).await?;
    if selection.is_empty() {
        return Err(AppError::NotFound);
    }
    let category = category_repo::get(&state.db, category_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: paginate(&selection, page_number(params.page.as_deref())),
        total_questions: selection.len(),
        current_category: Some(category),
        categories: None,
    }))
}
