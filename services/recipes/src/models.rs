//! Domain records shared by the repositories, handlers and view models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub mod like;
pub mod recipe;

pub use like::{LikeOutcome, LikedRecipe};
pub use recipe::{NewRecipe, Recipe, RecipeUpdate};

/// Authenticated account, owned by the external identity subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
}

/// Named tag grouping recipes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
