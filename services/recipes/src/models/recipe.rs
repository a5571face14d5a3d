//! Recipe model and its write payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Account, Category};

/// Recipe entity, loaded with its author and categories
///
/// Durations are whole minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub servings: i32,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    /// Asset path relative to the media root
    pub image: Option<String>,
    pub ingredients: String,
    pub steps: String,
    pub likes: i64,
    pub author: Account,
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New recipe creation payload
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub servings: i32,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub image: Option<String>,
    pub ingredients: String,
    pub steps: String,
    pub author_id: i64,
}

/// Recipe update payload
///
/// `image` replaces the stored asset when set and keeps it otherwise.
#[derive(Debug, Clone)]
pub struct RecipeUpdate {
    pub name: String,
    pub servings: i32,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub image: Option<String>,
    pub ingredients: String,
    pub steps: String,
}
