//! Category repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::CategoryRepository;
use crate::models::Category;

/// Category repository backed by the `categories` table
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    /// Create a new category repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn ensure(&self, names: &[String]) -> Result<Vec<Category>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        // The unique index on name makes concurrent inserts of one name collapse.
        let inserted = sqlx::query(
            r#"
            INSERT INTO categories (name)
            SELECT UNNEST($1::text[])
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(names)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() > 0 {
            info!("Created {} new categories", inserted.rows_affected());
        }

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name
            FROM categories
            WHERE name = ANY($1)
            ORDER BY name
            "#,
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}
