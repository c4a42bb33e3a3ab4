pub mod requests;
pub mod task;
pub mod user;

pub use requests::{AddTaskRequest, CompleteTaskRequest, TasksQuery};
pub use task::Task;
pub use user::{NewUser, TaskError, User};
