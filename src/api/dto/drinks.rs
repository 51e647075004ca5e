/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short (public: color/parts のみ) と long (name を含む) の 2 つの表現
 * - validation (形式チェック) 用の validate()
 */
use serde::{Deserialize, Serialize};

use crate::repos::drink_repo::{DrinkRow, Ingredient};

/// Clients send either one ingredient or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(items) => items,
            RecipeInput::One(item) => vec![item],
        }
    }
}

/// `drinks.title` is VARCHAR(80).
const TITLE_MAX_CHARS: usize = 80;

fn validate_title_length(title: &str) -> Result<(), &'static str> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err("title must be at most 80 characters");
    }
    Ok(())
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), &'static str> {
    if recipe.is_empty() {
        return Err("recipe needs at least one ingredient");
    }
    if recipe.iter().any(|i| i.name.trim().is_empty()) {
        return Err("ingredient name is required");
    }
    if recipe.iter().any(|i| i.parts < 1) {
        return Err("ingredient parts must be >= 1");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

impl CreateDrinkRequest {
    pub fn validate(self) -> Result<(String, Vec<Ingredient>), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        validate_title_length(&self.title)?;
        let recipe = self.recipe.into_vec();
        validate_recipe(&recipe)?;

        Ok((self.title, recipe))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn validate(self) -> Result<(Option<String>, Option<Vec<Ingredient>>), &'static str> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("title cannot be empty");
            }
            validate_title_length(title)?;
        }
        let recipe = self.recipe.map(RecipeInput::into_vec);
        if let Some(recipe) = &recipe {
            validate_recipe(recipe)?;
        }

        Ok((self.title, recipe))
    }
}

#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i64,
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<DrinkRow> for DrinkShort {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row
                .recipe
                .0
                .into_iter()
                .map(|i| ShortIngredient {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<DrinkRow> for DrinkLong {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i32,
}
