/// Task model
///
/// Tasks are created by an authenticated user and may be assigned to anyone.
/// Only the creator may change or delete a task; `created_by` never changes
/// after insert.
///
/// # Status
///
/// ```text
/// pending → in_progress → completed
/// ```
///
/// The arrow is the intended workflow only. Any status may be set from any
/// other at any time.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     assigned_to UUID NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     created_by UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::InvalidValue;

/// Task progress
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidValue::new("status", s, &TaskStatus::ALL.map(|v| v.as_str())))
    }
}

/// Task urgency
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| {
                InvalidValue::new("priority", s, &TaskPriority::ALL.map(|v| v.as_str()))
            })
    }
}

/// Stored task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub assigned_to: Uuid,
    pub status: TaskStatus,
    pub priority: TaskPriority,

    /// Owner; the only user allowed to change or delete the task
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: Uuid,
    pub status: TaskStatus,
    pub priority: TaskPriority,

    /// Taken from the verified caller, never from the request body
    pub created_by: Uuid,
}

impl NewTask {
    /// Assigns an id and timestamps
    pub fn into_task(self) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            assigned_to: self.assigned_to,
            status: self.status,
            priority: self.priority,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Mutable fields of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskChanges {
    pub status: TaskStatus,

    /// Left unchanged when None
    pub priority: Option<TaskPriority>,
}

impl TaskChanges {
    /// Applies the changes and bumps `updated_at`
    pub fn apply(&self, task: &mut Task) {
        task.status = self.status;
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        task.updated_at = Utc::now();
    }
}

/// Equality filters for listing tasks
///
/// Every populated field must match. `owner` is the ownership scope applied by
/// the server and is independent of the client-supplied `created_by` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub owner: Option<Uuid>,
}

impl TaskFilter {
    /// Whether `task` passes every populated filter
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self.assigned_to.map_or(true, |user| task.assigned_to == user)
            && self.created_by.map_or(true, |user| task.created_by == user)
            && self.owner.map_or(true, |user| task.created_by == user)
    }
}
