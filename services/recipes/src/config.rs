//! Service configuration loaded from `RECIPES_*` environment variables

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::models::{Account, Recipe};

/// Who may edit a recipe through the edit endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPolicy {
    /// Only the recipe's author
    AuthorOnly,
    /// Any authenticated account
    AnyAuthenticated,
}

impl EditPolicy {
    /// Whether `account` may edit `recipe` under this policy
    pub fn permits(&self, account: &Account, recipe: &Recipe) -> bool {
        match self {
            EditPolicy::AuthorOnly => recipe.author.id == account.id,
            EditPolicy::AnyAuthenticated => true,
        }
    }
}

/// Recipes service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to
    pub bind_address: String,
    /// HS256 secret used to verify session tokens
    pub jwt_secret: String,
    /// Where unauthenticated callers are sent
    pub login_url: String,
    /// Redirect target after creating or liking a recipe
    pub home_url: String,
    /// Redirect target after editing a recipe
    pub personal_recipes_url: String,
    /// Directory uploaded images are written under
    pub media_root: PathBuf,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
    pub edit_policy: EditPolicy,
}

impl ServiceConfig {
    /// Load the configuration from the environment
    ///
    /// # Environment Variables
    /// - `RECIPES_BIND_ADDRESS` (default: "0.0.0.0:3002")
    /// - `RECIPES_JWT_SECRET` (required)
    /// - `RECIPES_LOGIN_URL` (default: "/")
    /// - `RECIPES_HOME_URL` (default: "/")
    /// - `RECIPES_PERSONAL_RECIPES_URL` (default: "/recipes/personal/")
    /// - `RECIPES_MEDIA_ROOT` (default: "media")
    /// - `RECIPES_MAX_UPLOAD_BYTES` (default: 10 MiB)
    /// - `RECIPES_EDIT_POLICY`: `author_only` or `any_authenticated` (default: `author_only`)
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("bind_address", "0.0.0.0:3002")?
            .set_default("login_url", "/")?
            .set_default("home_url", "/")?
            .set_default("personal_recipes_url", "/recipes/personal/")?
            .set_default("media_root", "media")?
            .set_default("max_upload_bytes", 10 * 1024 * 1024_i64)?
            .set_default("edit_policy", "author_only")?
            .add_source(config::Environment::with_prefix("RECIPES").try_parsing(true))
            .build()
            .context("Failed to read service configuration")?;

        settings
            .try_deserialize()
            .context("Invalid service configuration")
    }
}
