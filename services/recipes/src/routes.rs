//! Recipes service routes

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    forms::{RecipeSubmission, UploadedImage},
    middleware::login_required,
    models::{Account, Recipe},
    state::AppState,
    validation::validate_recipe,
    views::{CREATE_RECIPE_TITLE, EDIT_RECIPE_TITLE, RecipeForm, RecipeFormView, RecipePageView},
};

/// Create the router for the recipes service
pub fn create_router(state: AppState) -> Router {
    let recipe_routes = Router::new()
        .route("/create/", get(create_recipe_form).post(create_recipe))
        .route("/:recipe_id/", get(recipe_page))
        .route("/:recipe_id/edit/", get(edit_recipe_form).post(edit_recipe))
        .route("/:recipe_id/like/", get(like_recipe).post(like_recipe))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_required,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(recipe_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "recipes-service"
    }))
}

/// Empty recipe creation form
pub async fn create_recipe_form(Extension(user): Extension<Account>) -> Json<RecipeFormView> {
    Json(RecipeFormView {
        title: CREATE_RECIPE_TITLE.to_string(),
        user,
        form: RecipeForm::empty(),
        recipe_id: None,
    })
}

/// Create a recipe from a multipart submission
pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(user): Extension<Account>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let submission = RecipeSubmission::from_multipart(multipart).await?;

    let input = match validate_recipe(&submission) {
        Ok(input) => input,
        Err(errors) => {
            info!(
                "Rejected recipe submission from {}: invalid {:?}",
                user.username,
                errors.keys().collect::<Vec<_>>()
            );
            return Ok(rejected(RecipeFormView {
                title: CREATE_RECIPE_TITLE.to_string(),
                user,
                form: RecipeForm::new(submission, errors, None),
                recipe_id: None,
            }));
        }
    };

    let category_ids = ensure_categories(&state, &input.categories).await?;
    let image = save_image(&state, input.image.as_ref()).await?;

    let new_recipe = input.into_new_recipe(image.clone(), user.id);
    let recipe = match state.recipes.create(&new_recipe, &category_ids).await {
        Ok(recipe) => recipe,
        Err(e) => {
            error!("Failed to create recipe: {}", e);
            discard_image(&state, image.as_deref()).await;
            return Err(ApiError::InternalServerError);
        }
    };

    info!("Recipe {} created by {}", recipe.id, user.username);
    Ok(Redirect::to(&state.config.home_url).into_response())
}

/// Edit form pre-populated from the stored recipe
pub async fn edit_recipe_form(
    State(state): State<AppState>,
    Extension(user): Extension<Account>,
    Path(recipe_id): Path<String>,
) -> ApiResult<Json<RecipeFormView>> {
    let recipe = load_recipe(&state, &recipe_id).await?;
    authorize_edit(&state, &user, &recipe)?;

    Ok(Json(RecipeFormView {
        title: EDIT_RECIPE_TITLE.to_string(),
        user,
        form: RecipeForm::for_recipe(&recipe),
        recipe_id: Some(recipe.id),
    }))
}

/// Update a recipe from a multipart submission
pub async fn edit_recipe(
    State(state): State<AppState>,
    Extension(user): Extension<Account>,
    Path(recipe_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let recipe = load_recipe(&state, &recipe_id).await?;
    authorize_edit(&state, &user, &recipe)?;

    let submission = RecipeSubmission::from_multipart(multipart).await?;

    let input = match validate_recipe(&submission) {
        Ok(input) => input,
        Err(errors) => {
            info!(
                "Rejected edit of recipe {} from {}: invalid {:?}",
                recipe.id,
                user.username,
                errors.keys().collect::<Vec<_>>()
            );
            return Ok(rejected(RecipeFormView {
                title: EDIT_RECIPE_TITLE.to_string(),
                user,
                form: RecipeForm::new(submission, errors, recipe.image.clone()),
                recipe_id: Some(recipe.id),
            }));
        }
    };

    let category_ids = ensure_categories(&state, &input.categories).await?;
    let image = save_image(&state, input.image.as_ref()).await?;

    let update = input.into_update(image.clone());
    let error = match state.recipes.update(recipe.id, &update, &category_ids).await {
        Ok(Some(_)) => None,
        Ok(None) => Some(recipe_not_found(&recipe_id)),
        Err(e) => {
            error!("Failed to update recipe {}: {}", recipe.id, e);
            Some(ApiError::InternalServerError)
        }
    };
    if let Some(error) = error {
        discard_image(&state, image.as_deref()).await;
        return Err(error);
    }

    info!("Recipe {} edited by {}", recipe.id, user.username);
    Ok(Redirect::to(&state.config.personal_recipes_url).into_response())
}

/// Like a recipe
pub async fn like_recipe(
    State(state): State<AppState>,
    Extension(user): Extension<Account>,
    Path(recipe_id): Path<String>,
) -> ApiResult<Redirect> {
    let id = parse_recipe_id(&recipe_id)?;

    let outcome = state
        .likes
        .like(id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to like recipe {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| recipe_not_found(&recipe_id))?;

    info!(
        "Recipe {} liked by {} (like {}, {} total)",
        id, user.username, outcome.like.id, outcome.likes
    );
    Ok(Redirect::to(&state.config.home_url))
}

/// Recipe page
pub async fn recipe_page(
    State(state): State<AppState>,
    Extension(user): Extension<Account>,
    Path(recipe_id): Path<String>,
) -> ApiResult<Json<RecipePageView>> {
    let recipe = load_recipe(&state, &recipe_id).await?;

    Ok(Json(RecipePageView {
        title: recipe.name.clone(),
        user,
        recipe,
    }))
}

fn rejected(view: RecipeFormView) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response()
}

fn recipe_not_found(recipe_id: &str) -> ApiError {
    ApiError::NotFound(format!("Recipe '{}' not found", recipe_id))
}

/// Only plain ASCII digits identify a recipe; `+5` or ` 5` do not
fn parse_recipe_id(recipe_id: &str) -> ApiResult<i64> {
    if recipe_id.is_empty() || !recipe_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(recipe_not_found(recipe_id));
    }

    recipe_id
        .parse()
        .map_err(|_| recipe_not_found(recipe_id))
}

async fn load_recipe(state: &AppState, recipe_id: &str) -> ApiResult<Recipe> {
    let id = parse_recipe_id(recipe_id)?;

    state
        .recipes
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load recipe {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| recipe_not_found(recipe_id))
}

fn authorize_edit(state: &AppState, user: &Account, recipe: &Recipe) -> ApiResult<()> {
    if state.config.edit_policy.permits(user, recipe) {
        return Ok(());
    }

    warn!(
        "{} may not edit recipe {} under {:?}",
        user.username, recipe.id, state.config.edit_policy
    );
    Err(ApiError::Forbidden)
}

async fn ensure_categories(state: &AppState, names: &[String]) -> ApiResult<Vec<i64>> {
    let categories = state.categories.ensure(names).await.map_err(|e| {
        error!("Failed to register categories {:?}: {}", names, e);
        ApiError::InternalServerError
    })?;

    Ok(categories.into_iter().map(|category| category.id).collect())
}

async fn save_image(state: &AppState, image: Option<&UploadedImage>) -> ApiResult<Option<String>> {
    let Some(image) = image else {
        return Ok(None);
    };

    let path = state.images.save(image).await.map_err(|e| {
        error!("Failed to store recipe image: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Some(path))
}

/// Drop an image stored for a write that did not go through
async fn discard_image(state: &AppState, path: Option<&str>) {
    let Some(path) = path else {
        return;
    };

    if let Err(e) = state.images.remove(path).await {
        warn!("Failed to discard orphaned image {}: {}", path, e);
    }
}
