use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::models::{NewUser, Task, User};

const USER_COLUMNS: &str = "id, telegram_id, first_name, last_name, username, photo_url, \
                            balance, referral_count, referral_bonus, tasks";

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    telegram_id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    photo_url: Option<String>,
    balance: i64,
    referral_count: i64,
    referral_bonus: i64,
    tasks: Json<Vec<Task>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            telegram_id: row.telegram_id,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            photo_url: row.photo_url,
            balance: row.balance,
            referral_count: row.referral_count,
            referral_bonus: row.referral_bonus,
            tasks: row.tasks.0,
        }
    }
}

/// Users table with the task list kept as a JSONB document.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_user(&self, telegram_id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE telegram_id = $1",
            USER_COLUMNS
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_or_create_user(&self, new: NewUser) -> Result<(User, bool), StoreError> {
        if let Some(user) = self.find_user(&new.telegram_id).await? {
            return Ok((user, false));
        }

        let user = User::from_new(new);
        let inserted = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, telegram_id, first_name, last_name, username, photo_url, tasks)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (telegram_id) DO NOTHING
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.telegram_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.photo_url)
        .bind(Json(user.tasks.clone()))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok((row.into(), true));
        }

        // Lost a race with a concurrent first login.
        let existing = self.find_user(&user.telegram_id).await?.ok_or_else(|| {
            StoreError::Inconsistent(format!(
                "user {} conflicted on insert but was not found",
                user.telegram_id
            ))
        })?;
        Ok((existing, false))
    }

    async fn save_tasks(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET tasks = $1 WHERE telegram_id = $2")
            .bind(Json(user.tasks.clone()))
            .bind(&user.telegram_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Inconsistent(format!(
                "user {} vanished before save",
                user.telegram_id
            )));
        }
        Ok(())
    }
}
