/// Comment model
///
/// A comment belongs to a task and is written by the task's owner. Only its
/// author may delete it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY,
///     task_id UUID NOT NULL,
///     author_id UUID NOT NULL,
///     text TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE INDEX comments_task_id_idx ON comments (task_id);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored comment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub task_id: Uuid,

    /// Taken from the verified caller
    pub author_id: Uuid,

    pub text: String,
}

impl NewComment {
    pub fn into_comment(self) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            task_id: self.task_id,
            author_id: self.author_id,
            text: self.text,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_serializes_camel_case() {
        let comment = NewComment {
            task_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            text: "Looks good".to_string(),
        }
        .into_comment();

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["taskId"], comment.task_id.to_string());
        assert_eq!(json["authorId"], comment.author_id.to_string());
        assert_eq!(json["text"], "Looks good");
    }
}
