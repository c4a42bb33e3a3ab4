use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use super::task::Task;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task {0} already exists")]
    AlreadyExists(String),

    #[error("task {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub telegram_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    pub balance: i64,
    pub referral_count: i64,
    pub referral_bonus: i64,
    pub tasks: Vec<Task>,
}

/// Identity fields taken from a verified Telegram login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub telegram_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
}

impl NewUser {
    /// Returns `None` when the payload carries no `id`.
    pub fn from_login_fields(fields: &BTreeMap<String, String>) -> Option<Self> {
        let telegram_id = fields.get("id").filter(|id| !id.is_empty())?.clone();
        Some(NewUser {
            telegram_id,
            first_name: fields.get("first_name").cloned(),
            last_name: fields.get("last_name").cloned(),
            username: fields.get("username").cloned(),
            photo_url: fields.get("photo_url").cloned(),
        })
    }
}

impl User {
    pub fn from_new(new: NewUser) -> Self {
        User {
            id: Uuid::new_v4(),
            telegram_id: new.telegram_id,
            first_name: new.first_name,
            last_name: new.last_name,
            username: new.username,
            photo_url: new.photo_url,
            balance: 0,
            referral_count: 0,
            referral_bonus: 0,
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    /// Appends a task. The list is left untouched if the id is taken.
    pub fn add_task(&mut self, task_id: &str, description: &str) -> Result<&Task, TaskError> {
        if self.task(task_id).is_some() {
            return Err(TaskError::AlreadyExists(task_id.to_string()));
        }
        self.tasks.push(Task::new(task_id, description));
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn complete_task(&mut self, task_id: &str) -> Result<&Task, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
        task.completed = true;
        Ok(&*task)
    }
}
