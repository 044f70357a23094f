use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::{
    db::StoreError,
    recipes::repo_types::{NewRecipe, Recipe},
};

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Recipes owned by `user_id`, oldest first.
    async fn list_for_user(&self, user_id: i64) -> anyhow::Result<Vec<Recipe>>;
    /// Insert a recipe; short instructions surface as [`StoreError::CheckViolation`].
    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;
}

#[derive(Clone)]
pub struct PgRecipeStore {
    db: PgPool,
}

impl PgRecipeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list_for_user(&self, user_id: i64) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, instructions, minutes_to_complete, user_id
            FROM recipes
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut tx = self.db.begin().await?;
        let inserted = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (title, instructions, minutes_to_complete, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, instructions, minutes_to_complete, user_id
            "#,
        )
        .bind(&recipe.title)
        .bind(&recipe.instructions)
        .bind(recipe.minutes_to_complete)
        .bind(recipe.user_id)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(row)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback after failed recipe insert");
                }
                Err(e.into())
            }
        }
    }
}
