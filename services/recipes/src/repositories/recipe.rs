//! Recipe repository for database operations

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::info;

use super::RecipeRepository;
use crate::models::{Account, Category, NewRecipe, Recipe, RecipeUpdate};

/// Recipe repository backed by the `recipes` and `recipe_categories` tables
#[derive(Clone)]
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    /// Create a new recipe repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace the category association of a recipe
    async fn set_categories(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: i64,
        category_ids: &[i64],
    ) -> Result<()> {
        sqlx::query("DELETE FROM recipe_categories WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO recipe_categories (recipe_id, category_id)
            SELECT $1, UNNEST($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(recipe_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn create(&self, new_recipe: &NewRecipe, category_ids: &[i64]) -> Result<Recipe> {
        info!("Creating new recipe: {}", new_recipe.name);

        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO recipes (name, servings, prep_time, cook_time, total_time, image,
                                 ingredients, steps, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&new_recipe.name)
        .bind(new_recipe.servings)
        .bind(new_recipe.prep_time)
        .bind(new_recipe.cook_time)
        .bind(new_recipe.total_time)
        .bind(&new_recipe.image)
        .bind(&new_recipe.ingredients)
        .bind(&new_recipe.steps)
        .bind(new_recipe.author_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_categories(&mut tx, id, category_ids).await?;
        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .with_context(|| format!("Recipe {} missing after insert", id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        info!("Finding recipe by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT r.id, r.name, r.servings, r.prep_time, r.cook_time, r.total_time, r.image,
                   r.ingredients, r.steps, r.likes, r.created_at, r.updated_at,
                   a.id AS author_id, a.username AS author_username
            FROM recipes r
            JOIN accounts a ON a.id = r.author_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN recipe_categories rc ON rc.category_id = c.id
            WHERE rc.recipe_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let recipe = Recipe {
            id: row.get("id"),
            name: row.get("name"),
            servings: row.get("servings"),
            prep_time: row.get("prep_time"),
            cook_time: row.get("cook_time"),
            total_time: row.get("total_time"),
            image: row.get("image"),
            ingredients: row.get("ingredients"),
            steps: row.get("steps"),
            likes: row.get("likes"),
            author: Account {
                id: row.get("author_id"),
                username: row.get("author_username"),
            },
            categories,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        };

        Ok(Some(recipe))
    }

    async fn update(
        &self,
        id: i64,
        update: &RecipeUpdate,
        category_ids: &[i64],
    ) -> Result<Option<Recipe>> {
        info!("Updating recipe: {}", id);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET name = $2, servings = $3, prep_time = $4, cook_time = $5, total_time = $6,
                image = COALESCE($7, image), ingredients = $8, steps = $9, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.servings)
        .bind(update.prep_time)
        .bind(update.cook_time)
        .bind(update.total_time)
        .bind(&update.image)
        .bind(&update.ingredients)
        .bind(&update.steps)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::set_categories(&mut tx, id, category_ids).await?;
        tx.commit().await?;

        self.find_by_id(id).await
    }
}
