use tracing::warn;

use crate::{
    error::{ApiError, ApiResult, ValidationError},
    recipes::{
        dto::CreateRecipeRequest,
        repo::RecipeStore,
        repo_types::{NewRecipe, Recipe},
    },
};

/// Required-field check. Zero minutes counts as missing, like an empty title.
/// Instruction length is left to the `recipes` check constraint.
pub fn validate(user_id: i64, req: CreateRecipeRequest) -> Result<NewRecipe, ValidationError> {
    let title = req.title.filter(|t| !t.is_empty());
    let instructions = req.instructions.filter(|i| !i.is_empty());
    let minutes = req.minutes_to_complete.filter(|m| *m != 0);

    match (title, instructions, minutes) {
        (Some(title), Some(instructions), Some(minutes)) => Ok(NewRecipe {
            user_id,
            title,
            instructions,
            minutes_to_complete: Some(minutes),
        }),
        _ => Err(ValidationError::IncompleteRecipe),
    }
}

pub async fn create_recipe(
    recipes: &dyn RecipeStore,
    user_id: i64,
    req: CreateRecipeRequest,
) -> ApiResult<Recipe> {
    let new_recipe = validate(user_id, req)?;
    recipes.create(new_recipe).await.map_err(|e| {
        warn!(user_id, error = %e, "recipe insert rejected");
        ApiError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn request(title: &str, instructions: &str, minutes: Option<i32>) -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: Some(title.into()),
            instructions: Some(instructions.into()),
            minutes_to_complete: minutes,
        }
    }

    #[test]
    fn validate_requires_every_field() {
        let long = "a".repeat(51);
        assert!(validate(1, request("T", &long, Some(10))).is_ok());

        for req in [
            request("", &long, Some(10)),
            request("T", "", Some(10)),
            request("T", &long, None),
            request("T", &long, Some(0)),
            CreateRecipeRequest {
                title: None,
                instructions: Some(long.clone()),
                minutes_to_complete: Some(10),
            },
        ] {
            assert!(matches!(
                validate(1, req),
                Err(ValidationError::IncompleteRecipe)
            ));
        }
    }

    #[tokio::test]
    async fn instructions_must_exceed_fifty_characters() {
        let store = MemoryStore::default();
        let owner = store.seed_user("ana");

        for len in [1, 49, 50] {
            let err = create_recipe(&store, owner, request("T", &"a".repeat(len), Some(10)))
                .await
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    ApiError::Validation(ValidationError::ConstraintViolation)
                ),
                "length {len} should be rejected"
            );
        }

        for len in [51, 52, 500] {
            let recipe = create_recipe(&store, owner, request("T", &"a".repeat(len), Some(10)))
                .await
                .unwrap_or_else(|e| panic!("length {len} should be accepted: {e}"));
            assert_eq!(recipe.instructions.chars().count(), len);
            assert_eq!(recipe.user_id, Some(owner));
        }
    }

    #[tokio::test]
    async fn rejected_recipes_leave_nothing_behind() {
        let store = MemoryStore::default();
        let owner = store.seed_user("ana");
        let err = create_recipe(&store, owner, request("T", "too short", Some(5)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::ConstraintViolation)
        ));
        assert!(store.list_for_user(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_per_user_in_insertion_order() {
        let store = MemoryStore::default();
        let ana = store.seed_user("ana");
        let bob = store.seed_user("bob");
        let long = "b".repeat(60);

        let first = create_recipe(&store, ana, request("first", &long, Some(1)))
            .await
            .unwrap();
        create_recipe(&store, bob, request("other", &long, Some(1)))
            .await
            .unwrap();
        let second = create_recipe(&store, ana, request("second", &long, Some(2)))
            .await
            .unwrap();

        let listed = store.list_for_user(ana).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
