//! Typed request bodies, validated at the handler boundary.

use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Accepts `"123"` or `123`. Telegram ids are numeric, clients send either.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
    }))
}

/// Treats empty strings the same as absent fields.
fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub telegram_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct ValidAddTask<'a> {
    pub telegram_id: &'a str,
    pub task_id: &'a str,
    pub description: &'a str,
}

impl AddTaskRequest {
    pub fn validate(&self) -> Result<ValidAddTask<'_>, AppError> {
        match (
            required(&self.telegram_id),
            required(&self.task_id),
            required(&self.description),
        ) {
            (Some(telegram_id), Some(task_id), Some(description)) => Ok(ValidAddTask {
                telegram_id,
                task_id,
                description,
            }),
            _ => Err(AppError::bad_request("Invalid task data")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub telegram_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub task_id: Option<String>,
}

impl CompleteTaskRequest {
    /// Returns `(telegram_id, task_id)`.
    pub fn validate(&self) -> Result<(&str, &str), AppError> {
        match (required(&self.telegram_id), required(&self.task_id)) {
            (Some(telegram_id), Some(task_id)) => Ok((telegram_id, task_id)),
            _ => Err(AppError::bad_request("Invalid task data")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksQuery {
    pub telegram_id: Option<String>,
}

impl TasksQuery {
    pub fn validate(&self) -> Result<&str, AppError> {
        required(&self.telegram_id).ok_or_else(|| AppError::bad_request("Telegram ID is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn add_request_accepts_numeric_ids() {
        let req: AddTaskRequest =
            serde_json::from_str(r#"{"telegramId": 12345, "taskId": 7, "description": "d"}"#)
                .unwrap();
        let valid = req.validate().unwrap();
        assert_eq!(valid.telegram_id, "12345");
        assert_eq!(valid.task_id, "7");
    }

    #[test]
    fn add_request_missing_description_is_invalid() {
        let req: AddTaskRequest =
            serde_json::from_str(r#"{"telegramId": "1", "taskId": "t1"}"#).unwrap();
        let err = req.validate().err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid task data");
    }

    #[test]
    fn add_request_empty_strings_are_invalid() {
        let req = AddTaskRequest {
            telegram_id: Some("1".into()),
            task_id: Some(String::new()),
            description: Some("d".into()),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn add_request_null_fields_are_missing() {
        let req: AddTaskRequest =
            serde_json::from_str(r#"{"telegramId": null, "taskId": "t1", "description": "d"}"#)
                .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn complete_request_requires_both_ids() {
        let req: CompleteTaskRequest = serde_json::from_str(r#"{"telegramId": "1"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CompleteTaskRequest =
            serde_json::from_str(r#"{"telegramId": "1", "taskId": "t1"}"#).unwrap();
        assert_eq!(req.validate().unwrap(), ("1", "t1"));
    }

    #[test]
    fn tasks_query_requires_id() {
        let err = TasksQuery::default().validate().unwrap_err();
        assert_eq!(err.message, "Telegram ID is required");

        let query = TasksQuery {
            telegram_id: Some("9".into()),
        };
        assert_eq!(query.validate().unwrap(), "9");
    }
}
