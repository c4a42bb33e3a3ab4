use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(task_id: impl Into<String>, description: impl Into<String>) -> Self {
        Task {
            task_id: task_id.into(),
            description: description.into(),
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(Task::new("t1", "Join the channel")).unwrap();
        assert_eq!(json["taskId"], "t1");
        assert_eq!(json["description"], "Join the channel");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn completed_defaults_to_false_when_absent() {
        let task: Task = serde_json::from_str(r#"{"taskId":"t1","description":"d"}"#).unwrap();
        assert!(!task.completed);
    }
}
