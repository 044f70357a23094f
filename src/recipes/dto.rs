use serde::{Deserialize, Serialize};

use crate::{auth::dto::PublicUser, recipes::repo_types::Recipe};

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub minutes_to_complete: Option<i32>,
}

/// A recipe with its owner embedded. The owner is the public user form,
/// which never carries recipes back.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user_id: Option<i64>,
    pub user: PublicUser,
}

impl RecipeResponse {
    pub fn new(recipe: Recipe, owner: PublicUser) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            instructions: recipe.instructions,
            minutes_to_complete: recipe.minutes_to_complete,
            user_id: recipe.user_id,
            user: owner,
        }
    }
}
