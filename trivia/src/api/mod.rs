/*
 * Responsibility
 * - trivia API の公開ポイント
 */
pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;
