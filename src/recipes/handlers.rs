use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{dto::PublicUser, extractors::CurrentUser},
    error::{json_body, ApiResult, ValidationError},
    recipes::{
        dto::{CreateRecipeRequest, RecipeResponse},
        services::create_recipe,
    },
    state::AppState,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new().route("/recipes", get(list_recipes).post(post_recipe))
}

#[instrument(skip(state, current), fields(user_id = current.id))]
pub async fn list_recipes(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let recipes = state.recipes.list_for_user(current.id).await?;
    let owner = PublicUser::from(current);
    let items = recipes
        .into_iter()
        .map(|r| RecipeResponse::new(r, owner.clone()))
        .collect();
    Ok(Json(items))
}

// The guard runs before the body is parsed, so anonymous callers get 401
// whatever they send.
#[instrument(skip(state, current, payload), fields(user_id = current.id))]
pub async fn post_recipe(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RecipeResponse>)> {
    let payload = json_body(payload, ValidationError::IncompleteRecipe.into())?;
    let recipe = create_recipe(state.recipes.as_ref(), current.id, payload).await?;
    info!(recipe_id = recipe.id, "recipe created");
    Ok((
        StatusCode::CREATED,
        Json(RecipeResponse::new(recipe, PublicUser::from(current))),
    ))
}
