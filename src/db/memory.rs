//! In-memory stand-in for Postgres used by tests. Enforces the same
//! constraints as the schema in `migrations/`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    auth::{
        password::PasswordDigest,
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    db::StoreError,
    recipes::{
        repo::RecipeStore,
        repo_types::{NewRecipe, Recipe},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    recipes: Vec<Recipe>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    /// Insert a user directly, skipping the signup path. Returns the new id.
    pub fn seed_user(&self, username: &str) -> i64 {
        let mut t = self.tables.lock().unwrap();
        let id = t.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        t.users.push(User {
            id,
            username: username.to_string(),
            password_hash: PasswordDigest::from_plaintext("seeded").unwrap(),
            image_url: None,
            bio: None,
        });
        id
    }

    pub fn delete_user(&self, id: i64) {
        self.tables.lock().unwrap().users.retain(|u| u.id != id);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation);
        }
        let id = t.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let row = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            image_url: user.image_url,
            bio: user.bio,
        };
        t.users.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_for_user(&self, user_id: i64) -> anyhow::Result<Vec<Recipe>> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes
            .iter()
            .filter(|r| r.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if recipe.instructions.chars().count() <= 50 {
            return Err(StoreError::CheckViolation);
        }
        if !t.users.iter().any(|u| u.id == recipe.user_id) {
            return Err(StoreError::ForeignKeyViolation);
        }
        let row = Recipe {
            id: t.recipes.len() as i64 + 1,
            title: recipe.title,
            instructions: recipe.instructions,
            minutes_to_complete: recipe.minutes_to_complete,
            user_id: Some(recipe.user_id),
        };
        t.recipes.push(row.clone());
        Ok(row)
    }
}
