/// Entity models
///
/// # Models
///
/// - `user`: Registered accounts
/// - `task`: Tasks with status/priority enumerations and list filters
/// - `comment`: Comments attached to tasks
///
/// Persistence lives in [`crate::store`]; these types are plain data.

pub mod comment;
pub mod task;
pub mod user;

pub use comment::{Comment, NewComment};
pub use task::{NewTask, Task, TaskChanges, TaskFilter, TaskPriority, TaskStatus};
pub use user::{NewUser, User, UserProfile};

/// A string that is not one of an enumeration's values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} '{value}': expected one of {allowed}")]
pub struct InvalidValue {
    /// Name of the enumerated field
    pub field: &'static str,

    /// The rejected input
    pub value: String,

    /// Comma-separated accepted values
    pub allowed: String,
}

impl InvalidValue {
    pub fn new(field: &'static str, value: &str, allowed: &[&str]) -> Self {
        Self {
            field,
            value: value.to_string(),
            allowed: allowed.join(", "),
        }
    }
}
