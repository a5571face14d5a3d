//! In-memory store implementing every repository, used by the handler tests

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{AccountRepository, CategoryRepository, LikeRepository, RecipeRepository};
use crate::models::{
    Account, Category, LikeOutcome, LikedRecipe, NewRecipe, Recipe, RecipeUpdate,
};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    accounts: Vec<Account>,
    categories: BTreeMap<String, Category>,
    recipes: BTreeMap<i64, Recipe>,
    likes: Vec<LikedRecipe>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn categories_for(&self, ids: &[i64]) -> Vec<Category> {
        // BTreeMap iteration keeps the result ordered by name.
        self.categories
            .values()
            .filter(|category| ids.contains(&category.id))
            .cloned()
            .collect()
    }
}

/// Shared in-memory store; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_account(&self, username: &str) -> Account {
        let mut state = self.state.lock().await;
        let account = Account {
            id: state.next_id(),
            username: username.to_string(),
        };
        state.accounts.push(account.clone());
        account
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.state.lock().await.categories.values().cloned().collect()
    }

    pub async fn recipes(&self) -> Vec<Recipe> {
        self.state.lock().await.recipes.values().cloned().collect()
    }

    pub async fn liked_recipes(&self, recipe_id: i64) -> Vec<LikedRecipe> {
        self.state
            .lock()
            .await
            .likes
            .iter()
            .filter(|like| like.recipe_id == recipe_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn ensure(&self, names: &[String]) -> Result<Vec<Category>> {
        let mut state = self.state.lock().await;

        for name in names {
            if !state.categories.contains_key(name) {
                let category = Category {
                    id: state.next_id(),
                    name: name.clone(),
                };
                state.categories.insert(name.clone(), category);
            }
        }

        Ok(state
            .categories
            .values()
            .filter(|category| names.contains(&category.name))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn create(&self, new_recipe: &NewRecipe, category_ids: &[i64]) -> Result<Recipe> {
        let mut state = self.state.lock().await;

        let author = state
            .accounts
            .iter()
            .find(|account| account.id == new_recipe.author_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown author {}", new_recipe.author_id))?;

        let now = Utc::now();
        let recipe = Recipe {
            id: state.next_id(),
            name: new_recipe.name.clone(),
            servings: new_recipe.servings,
            prep_time: new_recipe.prep_time,
            cook_time: new_recipe.cook_time,
            total_time: new_recipe.total_time,
            image: new_recipe.image.clone(),
            ingredients: new_recipe.ingredients.clone(),
            steps: new_recipe.steps.clone(),
            likes: 0,
            author,
            categories: state.categories_for(category_ids),
            created_at: now,
            updated_at: now,
        };

        state.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        Ok(self.state.lock().await.recipes.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i64,
        update: &RecipeUpdate,
        category_ids: &[i64],
    ) -> Result<Option<Recipe>> {
        let mut state = self.state.lock().await;
        let categories = state.categories_for(category_ids);

        let Some(recipe) = state.recipes.get_mut(&id) else {
            return Ok(None);
        };

        recipe.name = update.name.clone();
        recipe.servings = update.servings;
        recipe.prep_time = update.prep_time;
        recipe.cook_time = update.cook_time;
        recipe.total_time = update.total_time;
        if let Some(image) = &update.image {
            recipe.image = Some(image.clone());
        }
        recipe.ingredients = update.ingredients.clone();
        recipe.steps = update.steps.clone();
        recipe.categories = categories;
        recipe.updated_at = Utc::now();

        Ok(Some(recipe.clone()))
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn like(&self, recipe_id: i64, account_id: i64) -> Result<Option<LikeOutcome>> {
        let mut state = self.state.lock().await;
        let id = state.next_id();

        let Some(recipe) = state.recipes.get_mut(&recipe_id) else {
            return Ok(None);
        };
        recipe.likes += 1;
        let likes = recipe.likes;

        let like = LikedRecipe {
            id,
            recipe_id,
            liked_by_id: account_id,
            created_at: Utc::now(),
        };
        state.likes.push(like.clone());

        Ok(Some(LikeOutcome { like, likes }))
    }
}
