/*
 * Responsibility
 * - drinks API の URL 構造を定義
 * - endpoint ごとの permission を route 登録時に明示する (guarded)
 * - 未定義 path は JSON の 404、未対応 method は JSON の 405
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, list_drink_details, list_drinks, update_drink},
    health::health,
};
use crate::error::AppError;
use crate::middleware::auth::{PermissionGate, guarded};
use crate::state::AppState;

pub mod permissions {
    pub const GET_DRINK_DETAIL: &str = "get:drink-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let gate = |permission| PermissionGate::from_state(state, permission);

    Router::new()
        .route("/health", get(health))
        .route(
            "/drinks",
            get(list_drinks).merge(guarded(post(create_drink), gate(permissions::POST_DRINKS))),
        )
        .route(
            "/drinks-detail",
            guarded(get(list_drink_details), gate(permissions::GET_DRINK_DETAIL)),
        )
        .route(
            "/drinks/{drink_id}",
            guarded(patch(update_drink), gate(permissions::PATCH_DRINKS)).merge(guarded(
                delete(delete_drink),
                gate(permissions::DELETE_DRINKS),
            )),
        )
        .fallback(|| async { AppError::NotFound })
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
}
