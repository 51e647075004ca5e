/*
 * Responsibility
 * - questions テーブル向け SQLx 操作
 * - pagination はここではしない (全件を id 順で返し、services::pagination で切る)
 * - category の FK 違反は RepoError::InvalidReference に変換
 */
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct QuestionRow {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

pub struct NewQuestion<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub category: i32,
    pub difficulty: i32,
}

pub async fn list(db: &PgPool) -> RepoResult<Vec<QuestionRow>> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_by_category(db: &PgPool, category_id: i32) -> RepoResult<Vec<QuestionRow>> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE category = $1
        ORDER BY id
        "#,
    )
    .bind(category_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Case-insensitive substring match on the question text.
pub async fn search(db: &PgPool, term: &str) -> RepoResult<Vec<QuestionRow>> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE question ILIKE '%' || $1 || '%' ESCAPE '\'
        ORDER BY id
        "#,
    )
    .bind(escape_like(term))
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(db: &PgPool, new: NewQuestion<'_>) -> RepoResult<QuestionRow> {
    let row = sqlx::query_as::<_, QuestionRow>(
        r#"
        INSERT INTO questions (question, answer, category, difficulty)
        VALUES ($1, $2, $3, $4)
        RETURNING id, question, answer, category, difficulty
        "#,
    )
    .bind(new.question)
    .bind(new.answer)
    .bind(new.category)
    .bind(new.difficulty)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, question_id: i32) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM questions
        WHERE id = $1
        "#,
    )
    .bind(question_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

// `%` and `_` in the search term are literal characters.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
