//! Recipe submission form: raw multipart fields as the caller sent them

use axum::{body::Bytes, extract::Multipart, http::StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::{error::ApiError, models::Recipe};

/// Image file part of a submission
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Unvalidated recipe form fields
///
/// Serialized back into the form view model so a rejected submission is
/// re-rendered with the caller's input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecipeSubmission {
    pub name: String,
    pub servings: String,
    pub prep_time: String,
    pub cook_time: String,
    /// Comma separated category names
    pub categories: String,
    pub ingredients: String,
    pub steps: String,
    #[serde(skip)]
    pub image: Option<UploadedImage>,
}

impl RecipeSubmission {
    /// Read a submission from a `multipart/form-data` body
    ///
    /// Unknown fields are ignored. An image part without a file name and
    /// without content is treated as no upload.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut submission = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "image" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;

                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                submission.image = Some(UploadedImage {
                    file_name,
                    content_type,
                    bytes,
                });
                continue;
            }

            let value = field.text().await.map_err(malformed)?;
            match name.as_str() {
                "name" => submission.name = value,
                "servings" => submission.servings = value,
                "prep_time" => submission.prep_time = value,
                "cook_time" => submission.cook_time = value,
                "categories" => submission.categories = value,
                "ingredients" => submission.ingredients = value,
                "steps" => submission.steps = value,
                other => debug!("Ignoring unknown form field: {}", other),
            }
        }

        Ok(submission)
    }

    /// Form fields pre-populated from a stored recipe
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            servings: recipe.servings.to_string(),
            prep_time: recipe.prep_time.to_string(),
            cook_time: recipe.cook_time.to_string(),
            categories: recipe
                .categories
                .iter()
                .map(|category| category.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
            image: None,
        }
    }
}

fn malformed(e: axum::extract::multipart::MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(e.body_text());
    }

    ApiError::BadRequest(format!("Malformed multipart payload: {}", e))
}
