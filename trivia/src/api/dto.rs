/*
 * Responsibility
 * - trivia API の request/response DTO
 * - 数値は int でも数値文字列でも受ける (frontend が両方送ってくる)
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::repos::category_repo::CategoryRow;
use crate::repos::question_repo::QuestionRow;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    Str(String),
}

impl IntOrString {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            IntOrString::Int(n) => i32::try_from(*n).ok(),
            IntOrString::Str(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<IntOrString>,
    pub difficulty: Option<IntOrString>,
}

#[derive(Debug, PartialEq)]
pub struct ValidQuestion {
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

impl CreateQuestionRequest {
    pub fn validate(self) -> Result<ValidQuestion, &'static str> {
        let question = self
            .question
            .filter(|s| !s.trim().is_empty())
            .ok_or("question is required")?;
        let answer = self
            .answer
            .filter(|s| !s.trim().is_empty())
            .ok_or("answer is required")?;
        let category = self
            .category
            .and_then(|c| c.as_i32())
            .filter(|c| *c >= 1)
            .ok_or("category must be a positive integer")?;
        let difficulty = self
            .difficulty
            .and_then(|d| d.as_i32())
            .filter(|d| (1..=5).contains(d))
            .ok_or("difficulty must be between 1 and 5")?;

        Ok(ValidQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    pub id: IntOrString,
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<i32>,
    pub quiz_category: Option<QuizCategory>,
}

impl QuizRequest {
    /// `None` means every category.
    pub fn category_filter(&self) -> Result<Option<i32>, &'static str> {
        let id = self
            .quiz_category
            .as_ref()
            .ok_or("quiz_category is required")?
            .id
            .as_i32()
            .ok_or("quiz_category.id must be an integer")?;

        Ok((id != 0).then_some(id))
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: BTreeMap<i32, String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsPage {
    pub success: bool,
    pub questions: Vec<QuestionRow>,
    pub total_questions: usize,
    pub current_category: Option<CategoryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<i32, String>>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub created: i32,
    pub questions: Vec<QuestionRow>,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub success: bool,
    pub question: Option<QuestionRow>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_strings_are_accepted() {
        let req: CreateQuestionRequest = serde_json::from_value(json!({
            "question": "Who discovered penicillin?",
            "answer": "Alexander Fleming",
            "category": "1",
            "difficulty": 3
        }))
        .unwrap();

        assert_eq!(
            req.validate().unwrap(),
            ValidQuestion {
                question: "Who discovered penicillin?".into(),
                answer: "Alexander Fleming".into(),
                category: 1,
                difficulty: 3,
            }
        );
    }

    #[test]
    fn incomplete_questions_are_rejected() {
        let missing_answer: CreateQuestionRequest =
            serde_json::from_value(json!({"question": "q", "category": 1, "difficulty": 1}))
                .unwrap();
        assert_eq!(missing_answer.validate().unwrap_err(), "answer is required");

        let bad_difficulty: CreateQuestionRequest = serde_json::from_value(
            json!({"question": "q", "answer": "a", "category": 1, "difficulty": "hard"}),
        )
        .unwrap();
        assert!(bad_difficulty.validate().is_err());
    }

    #[test]
    fn quiz_category_zero_means_all() {
        let all: QuizRequest = serde_json::from_value(json!({
            "previous_questions": [],
            "quiz_category": {"type": "click", "id": 0}
        }))
        .unwrap();
        assert_eq!(all.category_filter().unwrap(), None);

        let science: QuizRequest = serde_json::from_value(json!({
            "quiz_category": {"type": "Science", "id": "1"}
        }))
        .unwrap();
        assert_eq!(science.category_filter().unwrap(), Some(1));
        assert!(science.previous_questions.is_empty());
    }

    #[test]
    fn questions_page_omits_categories_when_absent() {
        let page = QuestionsPage {
            success: true,
            questions: vec![],
            total_questions: 0,
            current_category: None,
            categories: None,
        };
        assert_eq!(
            serde_json::to_value(page).unwrap(),
            json!({"success": true, "questions": [], "total_questions": 0, "current_category": null})
        );
    }
}
