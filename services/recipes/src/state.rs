//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    config::ServiceConfig,
    media::ImageStore,
    middleware::TokenVerifier,
    repositories::{
        AccountRepository, CategoryRepository, LikeRepository, PgAccountRepository,
        PgCategoryRepository, PgLikeRepository, PgRecipeRepository, RecipeRepository,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub token_verifier: TokenVerifier,
    pub accounts: Arc<dyn AccountRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub images: ImageStore,
}

impl AppState {
    /// State backed by PostgreSQL repositories
    pub fn postgres(config: ServiceConfig, pool: PgPool) -> Self {
        Self {
            token_verifier: TokenVerifier::new(&config.jwt_secret),
            images: ImageStore::new(config.media_root.clone()),
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            recipes: Arc::new(PgRecipeRepository::new(pool.clone())),
            likes: Arc::new(PgLikeRepository::new(pool)),
            config: Arc::new(config),
        }
    }
}
