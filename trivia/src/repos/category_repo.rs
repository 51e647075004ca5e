/*
 * Responsibility
 * - categories テーブル向け SQLx 操作
 */
use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CategoryRow {
    pub id: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
}

pub async fn list(db: &PgPool) -> RepoResult<Vec<CategoryRow>> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, type
        FROM categories
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// `{id: type}`, the shape the frontend keys its category menu by.
pub async fn map(db: &PgPool) -> RepoResult<BTreeMap<i32, String>> {
    Ok(list(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}

pub async fn get(db: &PgPool, category_id: i32) -> RepoResult<Option<CategoryRow>> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, type
        FROM categories
        WHERE id = $1
        "#,
    )
    .bind(category_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
