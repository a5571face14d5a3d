//! Repositories for database operations
//!
//! Each store the handlers talk to is a trait so the router can be exercised
//! without a database; the PostgreSQL implementations live next to them.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::{Account, Category, LikeOutcome, NewRecipe, Recipe, RecipeUpdate};

pub mod category;
pub mod like;
#[cfg(test)]
pub mod memory;
pub mod recipe;

pub use category::PgCategoryRepository;
pub use like::PgLikeRepository;
pub use recipe::PgRecipeRepository;

/// Read access to the externally managed accounts
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;
}

/// Category registry
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert the names that do not exist yet and return the categories for
    /// every name, ordered by name
    async fn ensure(&self, names: &[String]) -> Result<Vec<Category>>;
}

/// Recipe store
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Create a recipe associated with exactly `category_ids`
    async fn create(&self, new_recipe: &NewRecipe, category_ids: &[i64]) -> Result<Recipe>;

    /// Find a recipe by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>>;

    /// Replace a recipe's fields and category association
    ///
    /// Returns `None` when the recipe does not exist.
    async fn update(
        &self,
        id: i64,
        update: &RecipeUpdate,
        category_ids: &[i64],
    ) -> Result<Option<Recipe>>;
}

/// Like tracker
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Record a like and increment the recipe's counter in one unit of work
    ///
    /// Returns `None`, writing nothing, when the recipe does not exist.
    async fn like(&self, recipe_id: i64, account_id: i64) -> Result<Option<LikeOutcome>>;
}

/// Account repository backed by the `accounts` table
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        info!("Finding account by username: {}", username);

        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
