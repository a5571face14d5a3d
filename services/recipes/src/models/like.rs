//! Like records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One like action by an account on a recipe
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LikedRecipe {
    pub id: i64,
    pub recipe_id: i64,
    pub liked_by_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Result of a like: the new record and the recipe's counter after it
#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub like: LikedRecipe,
    pub likes: i64,
}
