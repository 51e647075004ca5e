/*
 * Responsibility
 * - /drinks 系 handler
 * - 認可は route_layer (PermissionGate) で済んでいる前提。ここでは AuthClaims を受けるだけ
 * - Path/Json の rejection は AppError (404/422) に寄せる
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::AuthClaims,
    },
    error::AppError,
    repos::drink_repo,
    state::AppState,
};

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;

    Ok(Json(DrinksResponse::new(
        rows.into_iter().map(DrinkShort::from).collect(),
    )))
}

pub async fn list_drink_details(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;

    Ok(Json(DrinksResponse::new(
        rows.into_iter().map(DrinkLong::from).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    body: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let Json(req) = body?;
    let (title, recipe) = req.validate().map_err(AppError::unprocessable)?;

    let row = drink_repo::create(&state.db, &title, &recipe).await?;
    tracing::info!(
        drink_id = row.id,
        sub = claims.subject().unwrap_or_default(),
        "drink created"
    );

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(row)])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    drink_id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let Path(drink_id) = drink_id?;
    let Json(req) = body?;
    let (title, recipe) = req.validate().map_err(AppError::unprocessable)?;

    let row = drink_repo::update(&state.db, drink_id, title.as_deref(), recipe.as_deref())
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(
        drink_id,
        sub = claims.subject().unwrap_or_default(),
        "drink updated"
    );

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(row)])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    drink_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    let Path(drink_id) = drink_id?;

    if !drink_repo::delete(&state.db, drink_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(
        drink_id,
        sub = claims.subject().unwrap_or_default(),
        "drink deleted"
    );

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink_id,
    }))
}
