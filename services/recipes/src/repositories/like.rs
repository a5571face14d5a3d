//! Like repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::LikeRepository;
use crate::models::{LikeOutcome, LikedRecipe};

/// Like repository backed by the `liked_recipes` table and the recipe counter
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    /// Create a new like repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn like(&self, recipe_id: i64, account_id: i64) -> Result<Option<LikeOutcome>> {
        info!("Account {} likes recipe {}", account_id, recipe_id);

        let mut tx = self.pool.begin().await?;

        // The row lock taken here serializes concurrent likes on one recipe.
        let likes: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE recipes
            SET likes = likes + 1
            WHERE id = $1
            RETURNING likes
            "#,
        )
        .bind(recipe_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(likes) = likes else {
            return Ok(None);
        };

        let like = sqlx::query_as::<_, LikedRecipe>(
            r#"
            INSERT INTO liked_recipes (recipe_id, liked_by_id)
            VALUES ($1, $2)
            RETURNING id, recipe_id, liked_by_id, created_at
            "#,
        )
        .bind(recipe_id)
        .bind(account_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(LikeOutcome { like, likes }))
    }
}
