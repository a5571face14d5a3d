//! View models handed to the rendering layer, serialized as JSON

use serde::Serialize;

use crate::{
    forms::RecipeSubmission,
    models::{Account, Recipe},
    validation::FieldErrors,
};

pub const CREATE_RECIPE_TITLE: &str = "Create Recipe";
pub const EDIT_RECIPE_TITLE: &str = "Recipe";

/// Recipe form state: field values, field errors and the current image
#[derive(Debug, Serialize)]
pub struct RecipeForm {
    pub fields: RecipeSubmission,
    pub errors: FieldErrors,
    pub image: Option<String>,
    pub is_multipart: bool,
}

impl RecipeForm {
    /// Blank form
    pub fn empty() -> Self {
        Self::new(RecipeSubmission::default(), FieldErrors::new(), None)
    }

    /// Form pre-populated from a stored recipe
    pub fn for_recipe(recipe: &Recipe) -> Self {
        Self::new(
            RecipeSubmission::from_recipe(recipe),
            FieldErrors::new(),
            recipe.image.clone(),
        )
    }

    /// Form with the given values, errors and current image
    pub fn new(fields: RecipeSubmission, errors: FieldErrors, image: Option<String>) -> Self {
        Self {
            fields,
            errors,
            image,
            is_multipart: true,
        }
    }
}

/// Context of the create and edit pages
#[derive(Debug, Serialize)]
pub struct RecipeFormView {
    pub title: String,
    pub user: Account,
    pub form: RecipeForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<i64>,
}

/// Context of the recipe page
#[derive(Debug, Serialize)]
pub struct RecipePageView {
    pub title: String,
    pub user: Account,
    pub recipe: Recipe,
}
