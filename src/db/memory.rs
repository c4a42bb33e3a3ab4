use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{StoreError, UserStore};
use crate::models::{NewUser, User};

/// Process-local store keyed by telegram id.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user(&self, telegram_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(telegram_id).cloned())
    }

    async fn find_or_create_user(&self, new: NewUser) -> Result<(User, bool), StoreError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get(&new.telegram_id) {
            return Ok((user.clone(), false));
        }
        let user = User::from_new(new);
        users.insert(user.telegram_id.clone(), user.clone());
        Ok((user, true))
    }

    async fn save_tasks(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(&user.telegram_id).ok_or_else(|| {
            StoreError::Inconsistent(format!("user {} vanished before save", user.telegram_id))
        })?;
        stored.tasks = user.tasks.clone();
        Ok(())
    }
}
