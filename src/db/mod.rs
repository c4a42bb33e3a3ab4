//! Per-user document storage.
//!
//! Each user is one record holding the profile, counters and the full task
//! list. Task mutations read the record, change it in memory and write the
//! task list back.

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("inconsistent store: {0}")]
    Inconsistent(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, telegram_id: &str) -> Result<Option<User>, StoreError>;

    /// Returns the stored user for `new.telegram_id`, creating it with default
    /// counters when absent. The flag is true when a record was created.
    async fn find_or_create_user(&self, new: NewUser) -> Result<(User, bool), StoreError>;

    /// Persists `user.tasks` for an existing user.
    async fn save_tasks(&self, user: &User) -> Result<(), StoreError>;
}
